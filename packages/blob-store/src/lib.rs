//! fstore serialization: binary blobs and plain snapshots.
//!
//! Two independent artifacts over the same store:
//!
//! - [`write_blob`] / [`read_blob`]: the bit-exact binary blob for
//!   cross-process and cross-version transfer. Fixed big-endian layout,
//!   magic key, version field, word-aligned sections.
//! - [`Snapshot`]: a plain copy of the heap arrays, string table and index
//!   list. No byte-level contract; derives `serde` for host persistence.
//!
//! Both are whole-heap operations: they complete and produce a fully
//! consistent artifact, or fail and leave the write-path store unmodified.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fstore_core_store::{FeatureStore, SimpleTypeSystem};
//! use fstore_blob_store::{blob_to_bytes, blob_from_bytes};
//!
//! let mut ts = SimpleTypeSystem::new();
//! let token = ts.add_type("Token", 0, 1);
//! let ts = Arc::new(ts);
//!
//! let mut store = FeatureStore::new(ts.clone());
//! let addr = store.create_fs(token).unwrap();
//! store.set_str_value(addr, 1, "hello");
//!
//! let blob = blob_to_bytes(&store, &[addr]);
//!
//! let mut fresh = FeatureStore::new(ts);
//! let indexed = blob_from_bytes(&blob, &mut fresh).unwrap();
//! assert_eq!(indexed, vec![addr]);
//! assert_eq!(fresh.str_value(addr, 1).as_deref(), Some("hello"));
//! ```

mod blob;
mod error;
mod snapshot;

pub use blob::{blob_from_bytes, blob_to_bytes, read_blob, write_blob, BLOB_KEY, BLOB_VERSION};
pub use error::BlobError;
pub use snapshot::Snapshot;
