//! fstore: an in-process feature-structure store.
//!
//! The store backing a content-analysis pipeline: typed records ("feature
//! structures") live as contiguous cell blocks in growable heaps, a
//! per-store registry bridges raw addresses to identity-stable wrapper
//! objects, and two serialization artifacts (a bit-exact binary blob and a
//! plain snapshot) move whole stores across processes.
//!
//! The workspace is layered; this crate re-exports the full surface:
//!
//! - `fstore-heap-store`: growable typed heaps, addresses, growth policy
//! - `fstore-core-store`: type-system bridge, class registry, feature store
//! - `fstore-blob-store`: binary blob and snapshot serialization
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fstore::{blob_to_bytes, blob_from_bytes, FeatureStore, SimpleTypeSystem};
//!
//! let mut ts = SimpleTypeSystem::new();
//! let token = ts.add_type("Token", 0, 2);
//! let ts = Arc::new(ts);
//!
//! let mut store = FeatureStore::new(ts.clone());
//! let addr = store.create_fs(token).unwrap();
//! store.set_int_value(addr, 1, 7);
//! store.set_str_value(addr, 2, "surface form");
//!
//! let blob = blob_to_bytes(&store, &[addr]);
//! let mut other = FeatureStore::new(ts);
//! let indexed = blob_from_bytes(&blob, &mut other).unwrap();
//! assert_eq!(indexed, vec![addr]);
//! assert_eq!(other.str_value(addr, 2).as_deref(), Some("surface form"));
//! ```

pub use fstore_heap_store::{
    grown_capacity, Address, AuxHeap, ByteHeap, FsHeap, LongHeap, ShortHeap, StringEntry,
    StringHeap, DEFAULT_BASE_SIZE, DEFAULT_MULT_LIMIT, NULL,
};

pub use fstore_core_store::{
    BaseFs, DefaultGenerator, Error, FeatureStore, FeatureStructure, FlatIndexRepository,
    FsClassRegistry, FsGenerator, IndexRepository, SimpleTypeSystem, TypeCode, TypeSystem,
};

pub use fstore_blob_store::{
    blob_from_bytes, blob_to_bytes, read_blob, write_blob, BlobError, Snapshot, BLOB_KEY,
    BLOB_VERSION,
};
