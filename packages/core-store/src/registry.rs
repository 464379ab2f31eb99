//! The feature-structure class registry.
//!
//! Bridges raw heap addresses to language-level wrapper objects. Two
//! responsibilities:
//!
//! - map a live record's type code to a generator (the per-type factory
//!   that builds its wrapper), and
//! - cache already-built wrappers by address, so the same address resolves
//!   to the *same* wrapper object until the next flush.
//!
//! Each store owns its own registry; there is no process-wide registry
//! state, so independent stores coexist safely.

use std::sync::Arc;

use fstore_heap_store::{Address, FsHeap, NULL};

use crate::error::Error;
use crate::types::{TypeCode, TypeSystem};

/// A language-level wrapper around a feature structure.
///
/// Wrappers are handles: they carry the address and type code of the record
/// they stand for, and typed views (annotations, arrays, ...) layer their
/// accessors on top. Identity matters - resolving the same address twice
/// without an intervening flush yields the same wrapper object.
pub trait FeatureStructure: Send + Sync {
    /// The record's address in the main heap.
    fn address(&self) -> Address;
    /// The record's type code.
    fn type_code(&self) -> TypeCode;
}

/// The plain wrapper produced when a type has no dedicated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseFs {
    addr: Address,
    type_code: TypeCode,
}

impl BaseFs {
    /// Wrap the record at `addr` with type `type_code`.
    pub fn new(addr: Address, type_code: TypeCode) -> Self {
        Self { addr, type_code }
    }
}

impl FeatureStructure for BaseFs {
    fn address(&self) -> Address {
        self.addr
    }

    fn type_code(&self) -> TypeCode {
        self.type_code
    }
}

/// A per-type wrapper factory.
///
/// # Object Safety
///
/// This trait is object-safe: the registry stores `Arc<dyn FsGenerator>`.
pub trait FsGenerator: Send + Sync {
    /// Build a wrapper for the record at `addr` with type `type_code`.
    fn generate(&self, addr: Address, type_code: TypeCode) -> Arc<dyn FeatureStructure>;
}

/// The fallback generator: wraps everything in [`BaseFs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGenerator;

impl FsGenerator for DefaultGenerator {
    fn generate(&self, addr: Address, type_code: TypeCode) -> Arc<dyn FeatureStructure> {
        Arc::new(BaseFs::new(addr, type_code))
    }
}

// A generator table entry. `dedicated` marks entries installed for exactly
// this type; propagation from a supertype only ever replaces non-dedicated
// entries, so a subtype-specific registration survives regardless of
// registration order.
#[derive(Clone)]
struct Slot {
    generator: Arc<dyn FsGenerator>,
    dedicated: bool,
}

/// Per-store registry: generator table plus wrapper identity cache.
pub struct FsClassRegistry {
    type_system: Arc<dyn TypeSystem>,
    // Indexed by type code; entry 0 is the NULL code and stays empty.
    generators: Vec<Option<Slot>>,
    // Indexed by address; grown on demand.
    cache: Vec<Option<Arc<dyn FeatureStructure>>>,
    cache_enabled: bool,
}

impl FsClassRegistry {
    /// Create a registry over `type_system` with every defined type bound
    /// to [`DefaultGenerator`], so any live record resolves to at least a
    /// [`BaseFs`] from the start.
    pub fn new(type_system: Arc<dyn TypeSystem>) -> Self {
        let max = type_system.max_type_code() as usize;
        let mut generators: Vec<Option<Slot>> = vec![None; max + 1];
        let fallback: Arc<dyn FsGenerator> = Arc::new(DefaultGenerator);
        for (code, slot) in generators.iter_mut().enumerate().skip(1) {
            if type_system.type_code_is_valid(code as TypeCode) {
                *slot = Some(Slot {
                    generator: fallback.clone(),
                    dedicated: false,
                });
            }
        }
        Self {
            type_system,
            generators,
            cache: Vec::new(),
            cache_enabled: true,
        }
    }

    // === Registration ===

    /// Install `generator` for `type_code` and every current subtype.
    ///
    /// Register supertypes before subtypes - propagation runs over the
    /// subtypes that exist at call time. A dedicated registration already
    /// made for a subtype is left untouched; propagation only replaces
    /// inherited entries.
    pub fn add_class_for_type(
        &mut self,
        type_code: TypeCode,
        generator: Arc<dyn FsGenerator>,
    ) -> Result<(), Error> {
        self.slot_index(type_code)?;
        for sub in self.type_system.subtypes(type_code) {
            if let Some(Some(slot)) = self.generators.get_mut(sub as usize) {
                if !slot.dedicated {
                    slot.generator = generator.clone();
                }
            }
        }
        self.generators[type_code as usize] = Some(Slot {
            generator,
            dedicated: true,
        });
        Ok(())
    }

    /// Install `generator` for exactly `type_code`, no propagation.
    pub fn add_generator_for_type(
        &mut self,
        type_code: TypeCode,
        generator: Arc<dyn FsGenerator>,
    ) -> Result<(), Error> {
        self.slot_index(type_code)?;
        self.generators[type_code as usize] = Some(Slot {
            generator,
            dedicated: true,
        });
        Ok(())
    }

    /// Alias `target`'s generator to `source`'s.
    ///
    /// Used when a type has no dedicated wrapper and should fall back to
    /// its nearest ancestor's; the aliased entry counts as inherited.
    pub fn copy_generator_for_type(
        &mut self,
        target: TypeCode,
        source: TypeCode,
    ) -> Result<(), Error> {
        let source_idx = self.slot_index(source)?;
        self.slot_index(target)?;
        let generator = self.generators[source_idx]
            .as_ref()
            .map(|slot| slot.generator.clone())
            .ok_or(Error::UnknownTypeCode { code: source })?;
        self.generators[target as usize] = Some(Slot {
            generator,
            dedicated: false,
        });
        Ok(())
    }

    // === Resolution ===

    /// Resolve the record at `addr` to its wrapper.
    ///
    /// `NULL` resolves to no value. With caching enabled, a second call for
    /// the same address before any [`flush`](Self::flush) returns the same
    /// wrapper object; the cache array grows on demand and a miss is
    /// detected by an explicit bounds check, never a fault.
    pub fn create_fs(
        &mut self,
        heap: &FsHeap,
        addr: Address,
    ) -> Result<Option<Arc<dyn FeatureStructure>>, Error> {
        if addr == NULL {
            return Ok(None);
        }
        if self.cache_enabled {
            if let Some(Some(cached)) = self.cache.get(addr as usize) {
                return Ok(Some(cached.clone()));
            }
        }

        let code = heap
            .type_code(addr)
            .ok_or(Error::InvalidAddress { addr })?;
        let slot = self
            .generators
            .get(code as usize)
            .and_then(|s| s.as_ref())
            .ok_or(Error::UnknownTypeCode { code })?;
        let wrapper = slot.generator.generate(addr, code);

        if self.cache_enabled {
            if self.cache.len() <= addr as usize {
                self.cache.resize(addr as usize + 1, None);
            }
            self.cache[addr as usize] = Some(wrapper.clone());
        }
        Ok(Some(wrapper))
    }

    // === Cache control ===

    /// Invalidate every cached wrapper; the generator table is untouched.
    ///
    /// Must accompany every heap reset: addresses are reused afterwards,
    /// and a stale wrapper would alias new data.
    pub fn flush(&mut self) {
        log::debug!("flushing {} cached wrappers", self.cache.len());
        self.cache.clear();
    }

    /// Whether wrapper caching is on.
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Turn wrapper caching off, dropping all cached wrappers.
    pub fn disable_cache(&mut self) {
        self.flush();
        self.cache_enabled = false;
    }

    /// Turn wrapper caching back on, starting from a clean cache.
    pub fn enable_cache(&mut self) {
        self.flush();
        self.cache_enabled = true;
    }

    fn slot_index(&self, code: TypeCode) -> Result<usize, Error> {
        if self.type_system.type_code_is_valid(code) && (code as usize) < self.generators.len() {
            Ok(code as usize)
        } else {
            Err(Error::UnknownTypeCode { code })
        }
    }
}
