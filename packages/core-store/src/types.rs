//! The type-system bridge.
//!
//! The store never parses type descriptors itself; it consumes a small
//! trait surface from the pipeline's type system: which type codes are
//! defined, how many main-heap cells a record of a type occupies, and the
//! subtype relation (needed for generator propagation). Feature-to-slot
//! offset metadata stays entirely on the collaborator's side.

/// A type code: a small dense integer identifying a runtime type.
///
/// Code 0 is never a valid type; live codes run from 1 to
/// [`TypeSystem::max_type_code`].
pub type TypeCode = u32;

/// The trait surface the store consumes from the pipeline's type system.
pub trait TypeSystem: Send + Sync {
    /// Whether `code` denotes a defined type.
    fn type_code_is_valid(&self, code: TypeCode) -> bool;

    /// The largest defined type code. Codes are dense in `1..=max`.
    fn max_type_code(&self) -> TypeCode;

    /// Main-heap cells a record of this type occupies, including the type
    /// code cell at the base of the block.
    fn fs_size(&self, code: TypeCode) -> usize;

    /// All transitive subtypes of `code`, excluding `code` itself.
    fn subtypes(&self, code: TypeCode) -> Vec<TypeCode>;
}

/// A flat, vector-backed [`TypeSystem`].
///
/// Hosts with a real descriptor machinery implement [`TypeSystem`] on their
/// own model; this implementation covers embedded use and tests. Types are
/// registered under a parent (0 for roots) and receive dense codes in
/// registration order.
///
/// # Example
///
/// ```rust
/// use fstore_core_store::{SimpleTypeSystem, TypeSystem};
///
/// let mut ts = SimpleTypeSystem::new();
/// let annotation = ts.add_type("Annotation", 0, 2);
/// let token = ts.add_type("Token", annotation, 3);
///
/// assert!(ts.type_code_is_valid(token));
/// assert_eq!(ts.fs_size(annotation), 3); // type code + 2 slots
/// assert_eq!(ts.subtypes(annotation), vec![token]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimpleTypeSystem {
    // Indexed by type code; entry 0 is a placeholder for the NULL code.
    types: Vec<TypeInfo>,
}

#[derive(Debug, Clone, Default)]
struct TypeInfo {
    name: String,
    parent: TypeCode,
    slot_count: usize,
}

impl SimpleTypeSystem {
    /// Create a type system with no types.
    pub fn new() -> Self {
        Self {
            types: vec![TypeInfo::default()],
        }
    }

    /// Register a type under `parent` (0 for a root type) with
    /// `slot_count` feature slots. Returns the new type's code.
    pub fn add_type(&mut self, name: &str, parent: TypeCode, slot_count: usize) -> TypeCode {
        debug_assert!(parent == 0 || (parent as usize) < self.types.len());
        self.types.push(TypeInfo {
            name: name.to_owned(),
            parent,
            slot_count,
        });
        (self.types.len() - 1) as TypeCode
    }

    /// The registered name of a type.
    pub fn type_name(&self, code: TypeCode) -> Option<&str> {
        if code == 0 {
            return None;
        }
        self.types.get(code as usize).map(|t| t.name.as_str())
    }

    fn is_descendant(&self, mut code: TypeCode, ancestor: TypeCode) -> bool {
        while let Some(info) = self.types.get(code as usize) {
            if info.parent == ancestor {
                return true;
            }
            if info.parent == 0 {
                return false;
            }
            code = info.parent;
        }
        false
    }
}

impl TypeSystem for SimpleTypeSystem {
    fn type_code_is_valid(&self, code: TypeCode) -> bool {
        code != 0 && (code as usize) < self.types.len()
    }

    fn max_type_code(&self) -> TypeCode {
        (self.types.len() - 1) as TypeCode
    }

    fn fs_size(&self, code: TypeCode) -> usize {
        1 + self.types[code as usize].slot_count
    }

    fn subtypes(&self, code: TypeCode) -> Vec<TypeCode> {
        (1..self.types.len() as TypeCode)
            .filter(|&c| c != code && self.is_descendant(c, code))
            .collect()
    }
}
