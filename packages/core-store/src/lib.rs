//! Core fstore: the semantic store layer.
//!
//! This layer gives meaning to the raw heaps of `fstore-heap-store`:
//! - `TypeSystem`: the trait surface consumed from the pipeline's type
//!   system (type codes, record sizes, subtype relation)
//! - `FsClassRegistry`: per-type generator dispatch plus the
//!   address-indexed wrapper identity cache
//! - `FeatureStore`: heaps + registry behind one handle, the unit the
//!   pipeline creates, recycles and resets
//! - `IndexRepository`: the collaborator that supplies/accepts the
//!   indexed-FS address list around serialization
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fstore_core_store::{FeatureStore, SimpleTypeSystem};
//!
//! let mut ts = SimpleTypeSystem::new();
//! let token = ts.add_type("Token", 0, 2);
//!
//! let mut store = FeatureStore::new(Arc::new(ts));
//! let addr = store.create_fs(token).unwrap();
//! store.set_int_value(addr, 1, 42);
//! assert_eq!(store.int_value(addr, 1), 42);
//! ```

mod error;
mod index;
mod registry;
mod store;
mod types;

pub use error::Error;
pub use index::{FlatIndexRepository, IndexRepository};
pub use registry::{BaseFs, DefaultGenerator, FeatureStructure, FsClassRegistry, FsGenerator};
pub use store::FeatureStore;
pub use types::{SimpleTypeSystem, TypeCode, TypeSystem};

// Re-export heap types for convenience
pub use fstore_heap_store::{
    Address, AuxHeap, ByteHeap, FsHeap, LongHeap, ShortHeap, StringEntry, StringHeap, NULL,
};
