//! The plain in-memory snapshot artifact.

use serde::{Deserialize, Serialize};

use fstore_core_store::FeatureStore;
use fstore_heap_store::Address;

/// A direct copy of a store's state: heap arrays, the string table
/// materialized to plain strings, and the indexed-address list.
///
/// Unlike the binary blob there is no byte-level layout contract - the
/// only guarantee is round-trip fidelity with the originating store. The
/// struct derives `serde`, so hosts can persist it with any serde format.
/// A snapshot is immutable once taken.
///
/// String table indexing matches the live heap: entry `r` of the table is
/// the string behind reference `r`, with entry 0 the reserved NULL
/// placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    heap: Vec<i32>,
    byte_heap: Vec<u8>,
    short_heap: Vec<i16>,
    long_heap: Vec<i64>,
    strings: Vec<String>,
    indexed: Vec<Address>,
}

impl Snapshot {
    /// Copy the state of `store` and its indexed addresses.
    pub fn take(store: &FeatureStore, indexed: &[Address]) -> Self {
        let string_heap = store.string_heap();
        let mut strings = Vec::with_capacity(string_heap.entry_count() + 1);
        strings.push(String::new());
        for r in 1..=string_heap.entry_count() as Address {
            strings.push(string_heap.string(r).unwrap_or_default());
        }
        Self {
            heap: store.heap().used().to_vec(),
            byte_heap: store.byte_heap().used().to_vec(),
            short_heap: store.short_heap().used().to_vec(),
            long_heap: store.long_heap().used().to_vec(),
            strings,
            indexed: indexed.to_vec(),
        }
    }

    /// Load this snapshot into `store`, replacing its contents.
    ///
    /// The registry cache comes back clean and enabled; the indexed
    /// addresses are returned for the caller's index repository.
    pub fn restore(&self, store: &mut FeatureStore) -> Vec<Address> {
        store.heap_mut().replace(&self.heap);
        store.byte_heap_mut().replace(&self.byte_heap);
        store.short_heap_mut().replace(&self.short_heap);
        store.long_heap_mut().replace(&self.long_heap);

        let string_heap = store.string_heap_mut();
        string_heap.reset(false);
        for s in self.strings.iter().skip(1) {
            string_heap.add_string(s);
        }

        store.registry_mut().enable_cache();
        self.indexed.clone()
    }

    /// The copied main-heap cells.
    pub fn heap(&self) -> &[i32] {
        &self.heap
    }

    /// The materialized string table (entry 0 reserved).
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// The copied indexed-address list.
    pub fn indexed(&self) -> &[Address] {
        &self.indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fstore_core_store::{SimpleTypeSystem, TypeCode};

    fn store_with_type() -> (FeatureStore, TypeCode) {
        let mut ts = SimpleTypeSystem::new();
        let t = ts.add_type("T", 0, 2);
        (FeatureStore::new(Arc::new(ts)), t)
    }

    #[test]
    fn snapshot_round_trips() {
        let (mut store, t) = store_with_type();
        let a = store.create_fs(t).unwrap();
        store.set_int_value(a, 1, 41);
        store.set_str_value(a, 2, "alpha");
        let b = store.create_fs(t).unwrap();
        store.set_str_value(b, 2, "draft");
        store.set_str_value(b, 2, "final"); // overflow path
        store.add_longs(&[7]);

        let snapshot = Snapshot::take(&store, &[a, b]);

        let (mut target, _) = store_with_type();
        let indexed = snapshot.restore(&mut target);

        assert_eq!(indexed, vec![a, b]);
        assert_eq!(target.heap().used(), store.heap().used());
        assert_eq!(target.int_value(a, 1), 41);
        assert_eq!(target.str_value(a, 2).as_deref(), Some("alpha"));
        assert_eq!(target.str_value(b, 2).as_deref(), Some("final"));
        assert_eq!(target.long_heap().get(1), 7);
    }

    #[test]
    fn snapshot_is_a_copy_not_a_view() {
        let (mut store, t) = store_with_type();
        let a = store.create_fs(t).unwrap();
        store.set_int_value(a, 1, 1);

        let snapshot = Snapshot::take(&store, &[a]);
        store.set_int_value(a, 1, 2);

        assert_eq!(snapshot.heap()[a as usize + 1], 1);
    }

    #[test]
    fn snapshot_serializes_with_serde() {
        let (mut store, t) = store_with_type();
        let a = store.create_fs(t).unwrap();
        store.set_str_value(a, 1, "persisted");

        let snapshot = Snapshot::take(&store, &[a]);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
