//! The feature store: heaps + registry behind one handle.

use std::sync::Arc;

use fstore_heap_store::{Address, ByteHeap, FsHeap, LongHeap, ShortHeap, StringHeap, NULL};

use crate::error::Error;
use crate::registry::{FeatureStructure, FsClassRegistry};
use crate::types::{TypeCode, TypeSystem};

/// An analysis store: the unit the pipeline creates, recycles and resets.
///
/// Owns the main heap, the byte/short/long auxiliary heaps, the string
/// heap, and the class registry, all over one shared type system. One
/// store is used by exactly one thread at a time; there is no internal
/// locking.
///
/// Feature slots are addressed by `(address, offset)` where the offset is
/// the feature's cell offset within the record as assigned by the type
/// system (offset 0 is the type code cell and is never a feature slot).
pub struct FeatureStore {
    type_system: Arc<dyn TypeSystem>,
    heap: FsHeap,
    byte_heap: ByteHeap,
    short_heap: ShortHeap,
    long_heap: LongHeap,
    string_heap: StringHeap,
    registry: FsClassRegistry,
}

impl FeatureStore {
    /// Create an empty store over `type_system`.
    pub fn new(type_system: Arc<dyn TypeSystem>) -> Self {
        Self {
            heap: FsHeap::new(),
            byte_heap: ByteHeap::new(),
            short_heap: ShortHeap::new(),
            long_heap: LongHeap::new(),
            string_heap: StringHeap::new(),
            registry: FsClassRegistry::new(type_system.clone()),
            type_system,
        }
    }

    /// The type system this store was built over.
    pub fn type_system(&self) -> &Arc<dyn TypeSystem> {
        &self.type_system
    }

    // === Record creation ===

    /// Allocate a record of type `type_code` and return its address.
    ///
    /// The block size comes from the type system; the type code is written
    /// at the base of the block, feature slots start zeroed (NULL).
    pub fn create_fs(&mut self, type_code: TypeCode) -> Result<Address, Error> {
        if !self.type_system.type_code_is_valid(type_code) {
            return Err(Error::UnknownTypeCode { code: type_code });
        }
        let size = self.type_system.fs_size(type_code);
        let addr = self.heap.reserve(size);
        self.heap.set_cell(addr, type_code as i32);
        Ok(addr)
    }

    /// Resolve the record at `addr` to its wrapper via the registry.
    pub fn fs(&mut self, addr: Address) -> Result<Option<Arc<dyn FeatureStructure>>, Error> {
        self.registry.create_fs(&self.heap, addr)
    }

    // === Feature slots ===

    /// Read an integer slot.
    pub fn int_value(&self, addr: Address, offset: u32) -> i32 {
        self.heap.cell(addr + offset)
    }

    /// Write an integer slot.
    pub fn set_int_value(&mut self, addr: Address, offset: u32, value: i32) {
        self.heap.set_cell(addr + offset, value);
    }

    /// Read a float slot (stored as its bit pattern).
    pub fn float_value(&self, addr: Address, offset: u32) -> f32 {
        f32::from_bits(self.heap.cell(addr + offset) as u32)
    }

    /// Write a float slot as its bit pattern.
    pub fn set_float_value(&mut self, addr: Address, offset: u32, value: f32) {
        self.heap.set_cell(addr + offset, value.to_bits() as i32);
    }

    /// Read a reference slot (an address into this or an auxiliary heap).
    pub fn ref_value(&self, addr: Address, offset: u32) -> Address {
        self.heap.cell(addr + offset) as Address
    }

    /// Write a reference slot.
    pub fn set_ref_value(&mut self, addr: Address, offset: u32, target: Address) {
        self.heap.set_cell(addr + offset, target as i32);
    }

    /// Read a string slot, resolving through the string heap.
    pub fn str_value(&self, addr: Address, offset: u32) -> Option<String> {
        self.string_heap.string(self.ref_value(addr, offset))
    }

    /// Write a string slot.
    ///
    /// A NULL slot takes the inline path and stores a fresh reference;
    /// overwriting a non-NULL slot re-targets the existing reference
    /// through the string heap's overflow list, so other slots sharing the
    /// reference observe the new value.
    pub fn set_str_value(&mut self, addr: Address, offset: u32, value: &str) {
        let existing = self.ref_value(addr, offset);
        if existing == NULL {
            let r = self.string_heap.add_string(value);
            self.set_ref_value(addr, offset, r);
        } else {
            self.string_heap.set_string(existing, value);
        }
    }

    // === Auxiliary data ===

    /// Copy `data` into the byte heap; returns the block address.
    pub fn add_bytes(&mut self, data: &[u8]) -> Address {
        let addr = self.byte_heap.reserve(data.len());
        self.byte_heap.block_mut(addr, data.len()).copy_from_slice(data);
        addr
    }

    /// Copy `data` into the short heap; returns the block address.
    pub fn add_shorts(&mut self, data: &[i16]) -> Address {
        let addr = self.short_heap.reserve(data.len());
        self.short_heap.block_mut(addr, data.len()).copy_from_slice(data);
        addr
    }

    /// Copy `data` into the long heap; returns the block address.
    pub fn add_longs(&mut self, data: &[i64]) -> Address {
        let addr = self.long_heap.reserve(data.len());
        self.long_heap.block_mut(addr, data.len()).copy_from_slice(data);
        addr
    }

    // === Heap and registry access ===

    /// The main heap.
    pub fn heap(&self) -> &FsHeap {
        &self.heap
    }

    /// The main heap, mutably (bulk-load path).
    pub fn heap_mut(&mut self) -> &mut FsHeap {
        &mut self.heap
    }

    /// The byte heap.
    pub fn byte_heap(&self) -> &ByteHeap {
        &self.byte_heap
    }

    /// The byte heap, mutably.
    pub fn byte_heap_mut(&mut self) -> &mut ByteHeap {
        &mut self.byte_heap
    }

    /// The short heap.
    pub fn short_heap(&self) -> &ShortHeap {
        &self.short_heap
    }

    /// The short heap, mutably.
    pub fn short_heap_mut(&mut self) -> &mut ShortHeap {
        &mut self.short_heap
    }

    /// The long heap.
    pub fn long_heap(&self) -> &LongHeap {
        &self.long_heap
    }

    /// The long heap, mutably.
    pub fn long_heap_mut(&mut self) -> &mut LongHeap {
        &mut self.long_heap
    }

    /// The string heap.
    pub fn string_heap(&self) -> &StringHeap {
        &self.string_heap
    }

    /// The string heap, mutably.
    pub fn string_heap_mut(&mut self) -> &mut StringHeap {
        &mut self.string_heap
    }

    /// The class registry.
    pub fn registry(&self) -> &FsClassRegistry {
        &self.registry
    }

    /// The class registry, mutably (registration, cache control).
    pub fn registry_mut(&mut self) -> &mut FsClassRegistry {
        &mut self.registry
    }

    // === Lifecycle ===

    /// Wipe every heap and flush the registry cache in one step.
    ///
    /// Addresses are reused after a reset; wrappers obtained before it must
    /// not be used again. With `full`, heap backing arrays shrink back to
    /// their base sizes.
    pub fn reset(&mut self, full: bool) {
        log::debug!("resetting store (full: {full})");
        self.heap.reset(full);
        self.byte_heap.reset(full);
        self.short_heap.reset(full);
        self.long_heap.reset(full);
        self.string_heap.reset(full);
        self.registry.flush();
    }
}
