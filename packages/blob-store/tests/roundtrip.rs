//! End-to-end serialization tests over a populated store.

use std::sync::Arc;

use fstore_blob_store::{blob_from_bytes, blob_to_bytes, read_blob, write_blob, Snapshot};
use fstore_core_store::{
    FeatureStore, FlatIndexRepository, IndexRepository, SimpleTypeSystem, TypeCode,
};

struct Fixture {
    ts: Arc<SimpleTypeSystem>,
    label: TypeCode,
    payload: TypeCode,
}

impl Fixture {
    // Two types: Label carries one string slot, Payload carries a byte
    // block as (start address, length).
    fn new() -> Self {
        let mut ts = SimpleTypeSystem::new();
        let label = ts.add_type("Label", 0, 1);
        let payload = ts.add_type("Payload", 0, 2);
        Self {
            ts: Arc::new(ts),
            label,
            payload,
        }
    }

    fn store(&self) -> FeatureStore {
        FeatureStore::new(self.ts.clone())
    }
}

fn take_i32(buf: &mut &[u8]) -> i32 {
    let v = i32::from_be_bytes(buf[..4].try_into().unwrap());
    *buf = &buf[4..];
    v
}

fn skip(buf: &mut &[u8], n: usize) {
    *buf = &buf[n..];
}

#[test]
fn scenario_blob_sections() {
    let fixture = Fixture::new();
    let mut store = fixture.store();

    let a = store.create_fs(fixture.label).unwrap();
    store.set_str_value(a, 1, "alpha");
    let b = store.create_fs(fixture.label).unwrap();
    store.set_str_value(b, 1, "beta");

    let c = store.create_fs(fixture.payload).unwrap();
    let block = store.add_bytes(&[1, 2, 3, 4]);
    store.set_ref_value(c, 1, block);
    store.set_int_value(c, 2, 4);

    let mut index = FlatIndexRepository::new();
    index.add(a);
    index.add(b);
    index.add(c);

    let blob = blob_to_bytes(&store, index.indexed());
    let mut cursor: &[u8] = &blob;

    // Key and version.
    assert_eq!(take_i32(&mut cursor), 0x414D4955);
    assert_eq!(take_i32(&mut cursor), 1);

    // Main heap: two 2-cell records plus one 3-cell record plus cell 0.
    let heap_len = take_i32(&mut cursor);
    assert_eq!(heap_len, 8);
    skip(&mut cursor, heap_len as usize * 4);

    // String region: "alpha" + "beta" inline is 9 chars, padded to 10.
    let char_len = take_i32(&mut cursor);
    assert_eq!(char_len, 10);
    let region: Vec<u16> = (0..char_len)
        .map(|_| {
            let v = u16::from_be_bytes(cursor[..2].try_into().unwrap());
            skip(&mut cursor, 2);
            v
        })
        .collect();
    assert_eq!(String::from_utf16_lossy(&region[0..5]), "alpha");
    assert_eq!(String::from_utf16_lossy(&region[5..9]), "beta");
    assert_eq!(region[9], 0);

    // Ref table: reserved 0, then (offset, length) per string.
    assert_eq!(take_i32(&mut cursor), 5);
    assert_eq!(take_i32(&mut cursor), 0);
    assert_eq!((take_i32(&mut cursor), take_i32(&mut cursor)), (0, 5));
    assert_eq!((take_i32(&mut cursor), take_i32(&mut cursor)), (5, 4));

    // Indexed addresses.
    assert_eq!(take_i32(&mut cursor), 3);
    assert_eq!(take_i32(&mut cursor), a as i32);
    assert_eq!(take_i32(&mut cursor), b as i32);
    assert_eq!(take_i32(&mut cursor), c as i32);

    // Byte heap: reserved cell plus the 4 data bytes, rounded up to 8.
    let byte_len = take_i32(&mut cursor);
    assert_eq!(byte_len, 8);
    assert_eq!(byte_len % 4, 0);
    assert_eq!(&cursor[..8], &[0, 1, 2, 3, 4, 0, 0, 0]);
}

#[test]
fn populated_store_round_trips() {
    let fixture = Fixture::new();
    let mut store = fixture.store();

    let a = store.create_fs(fixture.label).unwrap();
    store.set_str_value(a, 1, "inline string");

    let b = store.create_fs(fixture.label).unwrap();
    store.set_str_value(b, 1, "draft");
    store.set_str_value(b, 1, "rewritten"); // overflow-list path

    let c = store.create_fs(fixture.payload).unwrap();
    let block = store.add_bytes(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01]);
    store.set_ref_value(c, 1, block);
    store.set_int_value(c, 2, 5);
    store.add_shorts(&[-1, 2, -3]);
    store.add_longs(&[i64::MIN, 0, i64::MAX]);

    let indexed_in = vec![a, b, c];
    let blob = blob_to_bytes(&store, &indexed_in);

    let mut target = fixture.store();
    let indexed_out = blob_from_bytes(&blob, &mut target).unwrap();

    assert_eq!(indexed_out, indexed_in);
    assert_eq!(target.heap().used(), store.heap().used());
    assert_eq!(target.str_value(a, 1).as_deref(), Some("inline string"));
    assert_eq!(target.str_value(b, 1).as_deref(), Some("rewritten"));
    assert_eq!(
        target.byte_heap().block(block, 5),
        &[0xDE, 0xAD, 0xBE, 0xEF, 0x01]
    );
    assert_eq!(target.short_heap().block(1, 3), &[-1, 2, -3]);
    assert_eq!(target.long_heap().block(1, 3), &[i64::MIN, 0, i64::MAX]);

    // A deserialized store is fully usable: allocate and resolve wrappers.
    let d = target.create_fs(fixture.label).unwrap();
    let fs = target.fs(d).unwrap().unwrap();
    assert_eq!(fs.type_code(), fixture.label);
}

#[test]
fn reserialized_blob_is_stable() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    let a = store.create_fs(fixture.label).unwrap();
    store.set_str_value(a, 1, "stable");
    store.add_bytes(&[9, 8, 7]);

    let first = blob_to_bytes(&store, &[a]);
    let mut target = fixture.store();
    let indexed = blob_from_bytes(&first, &mut target).unwrap();
    let second = blob_to_bytes(&target, &indexed);

    assert_eq!(first, second);
}

#[test]
fn blob_file_round_trip() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    let a = store.create_fs(fixture.label).unwrap();
    store.set_str_value(a, 1, "on disk");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.blob");

    let mut file = std::fs::File::create(&path).unwrap();
    write_blob(&store, &[a], &mut file).unwrap();
    drop(file);

    let mut file = std::fs::File::open(&path).unwrap();
    let mut target = fixture.store();
    let indexed = read_blob(&mut file, &mut target).unwrap();

    assert_eq!(indexed, vec![a]);
    assert_eq!(target.str_value(a, 1).as_deref(), Some("on disk"));
}

#[test]
fn snapshot_and_blob_agree() {
    let fixture = Fixture::new();
    let mut store = fixture.store();
    let a = store.create_fs(fixture.label).unwrap();
    store.set_str_value(a, 1, "same either way");

    let snapshot = Snapshot::take(&store, &[a]);
    let blob = blob_to_bytes(&store, &[a]);

    let mut from_snapshot = fixture.store();
    snapshot.restore(&mut from_snapshot);
    let mut from_blob = fixture.store();
    blob_from_bytes(&blob, &mut from_blob).unwrap();

    assert_eq!(from_snapshot.heap().used(), from_blob.heap().used());
    assert_eq!(
        from_snapshot.str_value(a, 1),
        from_blob.str_value(a, 1)
    );
}
