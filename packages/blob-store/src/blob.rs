//! The bit-exact binary blob format.
//!
//! The blob snapshots a store's heaps, string table and indexed-address
//! list for cross-process transfer. Every multi-byte value is big-endian;
//! the layout is fixed and versioned, and every variable-length section is
//! length-prefixed and padded to a 32-bit word boundary so readers can walk
//! it without interpreting cell contents.
//!
//! Section order: key, version, main-heap cells, string region, string
//! ref-table, indexed addresses, byte heap, short heap, long heap.
//!
//! Writing first materializes the string heap's overflow-list entries into
//! the serialized char region (null-terminated, after the inline buffer)
//! and rewrites their ref-table offsets, so a reader sees one contiguous
//! string region and an all-inline table.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use fstore_core_store::FeatureStore;
use fstore_heap_store::Address;

use crate::error::BlobError;

/// The blob magic key.
///
/// The exact literal from the wire format: its big-endian byte sequence
/// reads "AMIU", not "UIMA". Kept verbatim for compatibility with existing
/// blobs - do not "fix" the byte order.
pub const BLOB_KEY: i32 = 0x414D4955;

/// The blob format version this crate writes and accepts.
pub const BLOB_VERSION: i32 = 1;

// === Writing ===

/// Serialize `store` and its indexed addresses as a blob into `w`.
///
/// The store is not modified; an I/O failure surfaces as
/// [`BlobError::Serialize`] with the underlying message.
pub fn write_blob(
    store: &FeatureStore,
    indexed: &[Address],
    w: &mut impl Write,
) -> Result<(), BlobError> {
    let buf = encode(store, indexed);
    w.write_all(&buf)
        .map_err(|e| BlobError::serialize(e.to_string()))
}

/// Serialize `store` and its indexed addresses to an in-memory blob.
pub fn blob_to_bytes(store: &FeatureStore, indexed: &[Address]) -> Vec<u8> {
    encode(store, indexed).to_vec()
}

fn encode(store: &FeatureStore, indexed: &[Address]) -> BytesMut {
    let (chars, ref_pairs) = materialize_strings(store);
    let heap_cells = store.heap().used();
    let byte_cells = store.byte_heap().used();
    let short_cells = store.short_heap().used();
    let long_cells = store.long_heap().used();

    log::debug!(
        "writing blob: {} heap cells, {} strings, {} indexed",
        heap_cells.len(),
        ref_pairs.len(),
        indexed.len()
    );

    let mut buf = BytesMut::new();
    buf.put_i32(BLOB_KEY);
    buf.put_i32(BLOB_VERSION);

    buf.put_i32(heap_cells.len() as i32);
    for &cell in heap_cells {
        buf.put_i32(cell);
    }

    buf.put_i32(chars.len() as i32);
    for &unit in &chars {
        buf.put_u16(unit);
    }

    buf.put_i32((2 * ref_pairs.len() + 1) as i32);
    buf.put_i32(0);
    for &(offset, len) in &ref_pairs {
        buf.put_i32(offset);
        buf.put_i32(len);
    }

    buf.put_i32(indexed.len() as i32);
    for &addr in indexed {
        buf.put_i32(addr as i32);
    }

    let rounded = round_up(byte_cells.len(), 4);
    buf.put_i32(rounded as i32);
    buf.put_slice(byte_cells);
    buf.put_bytes(0, rounded - byte_cells.len());

    let rounded = round_up(short_cells.len(), 2);
    buf.put_i32(rounded as i32);
    for &v in short_cells {
        buf.put_i16(v);
    }
    buf.put_bytes(0, (rounded - short_cells.len()) * 2);

    buf.put_i32(long_cells.len() as i32);
    for &v in long_cells {
        buf.put_i64(v);
    }

    buf
}

// Flatten the two-tier string storage into one contiguous char region:
// the inline buffer first, then each overflow-list string null-terminated,
// with its ref-table row rewritten to point there. The region is padded to
// an even length so the following section stays word-aligned.
fn materialize_strings(store: &FeatureStore) -> (Vec<u16>, Vec<(i32, i32)>) {
    let string_heap = store.string_heap();
    let mut chars: Vec<u16> = string_heap.chars().to_vec();
    let mut pairs: Vec<(i32, i32)> = Vec::with_capacity(string_heap.entry_count());

    for entry in &string_heap.entries()[1..] {
        if entry.list_ref == 0 {
            pairs.push((entry.char_offset as i32, entry.len as i32));
        } else {
            let s = string_heap.list_string(entry.list_ref).unwrap_or("");
            let offset = chars.len() as i32;
            chars.extend(s.encode_utf16());
            let len = chars.len() as i32 - offset;
            chars.push(0);
            pairs.push((offset, len));
        }
    }
    if chars.len() % 2 == 1 {
        chars.push(0);
    }
    (chars, pairs)
}

fn round_up(n: usize, multiple: usize) -> usize {
    n.div_ceil(multiple) * multiple
}

// === Reading ===

/// Deserialize a blob from `r` into `store`, replacing its contents.
///
/// The blob is parsed and validated in full before anything is committed,
/// so a malformed or truncated input fails with [`BlobError::Deserialize`]
/// and leaves the store untouched. On success the registry cache is
/// re-enabled from a clean, flushed state and the indexed-address list is
/// returned for the caller's index repository.
pub fn read_blob(r: &mut impl Read, store: &mut FeatureStore) -> Result<Vec<Address>, BlobError> {
    let mut data = Vec::new();
    r.read_to_end(&mut data)
        .map_err(|e| BlobError::deserialize(e.to_string()))?;
    blob_from_bytes(&data, store)
}

/// Deserialize an in-memory blob into `store`, replacing its contents.
pub fn blob_from_bytes(data: &[u8], store: &mut FeatureStore) -> Result<Vec<Address>, BlobError> {
    let contents = decode(data)?;

    log::debug!(
        "read blob: {} heap cells, {} strings, {} indexed",
        contents.heap.len(),
        contents.ref_pairs.len(),
        contents.indexed.len()
    );

    store.heap_mut().replace(&contents.heap);
    store.byte_heap_mut().replace(&contents.bytes);
    store.short_heap_mut().replace(&contents.shorts);
    store.long_heap_mut().replace(&contents.longs);
    store
        .string_heap_mut()
        .rebuild(contents.chars, &contents.ref_pairs);
    store.registry_mut().enable_cache();
    Ok(contents.indexed)
}

// Fully parsed blob, held off-store until every section validated.
struct BlobContents {
    heap: Vec<i32>,
    chars: Vec<u16>,
    ref_pairs: Vec<(u32, u32)>,
    indexed: Vec<Address>,
    bytes: Vec<u8>,
    shorts: Vec<i16>,
    longs: Vec<i64>,
}

fn decode(mut buf: &[u8]) -> Result<BlobContents, BlobError> {
    let key = take_i32(&mut buf, "magic key")?;
    if key != BLOB_KEY {
        return Err(BlobError::deserialize(format!(
            "bad magic key 0x{key:08X}, expected 0x{BLOB_KEY:08X}"
        )));
    }
    let version = take_i32(&mut buf, "version")?;
    if version != BLOB_VERSION {
        return Err(BlobError::deserialize(format!(
            "unsupported version {version}, expected {BLOB_VERSION}"
        )));
    }

    let heap_len = take_count(&mut buf, "main heap size")?;
    let heap = take_i32s(&mut buf, heap_len, "main heap cells")?;

    let char_len = take_count(&mut buf, "string region length")?;
    let chars = take_u16s(&mut buf, char_len, "string region")?;

    let ref_len = take_count(&mut buf, "ref-table length")?;
    if ref_len == 0 || ref_len % 2 == 0 {
        return Err(BlobError::deserialize(format!(
            "bad ref-table length {ref_len}"
        )));
    }
    take_i32(&mut buf, "reserved ref-table cell")?;
    let entry_count = (ref_len - 1) / 2;
    let mut ref_pairs = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        let offset = take_count(&mut buf, "string offset")?;
        let len = take_count(&mut buf, "string length")?;
        if offset + len > chars.len() {
            return Err(BlobError::deserialize(format!(
                "string entry ({offset}, {len}) outside region of {} chars",
                chars.len()
            )));
        }
        ref_pairs.push((offset as u32, len as u32));
    }

    let indexed_len = take_count(&mut buf, "indexed-FS count")?;
    let mut indexed = Vec::with_capacity(indexed_len);
    for _ in 0..indexed_len {
        indexed.push(take_count(&mut buf, "indexed-FS address")? as Address);
    }

    let byte_len = take_count(&mut buf, "byte heap size")?;
    let bytes = take_bytes(&mut buf, byte_len, "byte heap")?;

    let short_len = take_count(&mut buf, "short heap size")?;
    let shorts = take_i16s(&mut buf, short_len, "short heap")?;

    let long_len = take_count(&mut buf, "long heap size")?;
    let longs = take_i64s(&mut buf, long_len, "long heap")?;

    Ok(BlobContents {
        heap,
        chars,
        ref_pairs,
        indexed,
        bytes,
        shorts,
        longs,
    })
}

fn truncated(what: &str) -> BlobError {
    BlobError::deserialize(format!("truncated input reading {what}"))
}

fn take_i32(buf: &mut &[u8], what: &str) -> Result<i32, BlobError> {
    if buf.remaining() < 4 {
        return Err(truncated(what));
    }
    Ok(buf.get_i32())
}

fn take_count(buf: &mut &[u8], what: &str) -> Result<usize, BlobError> {
    let v = take_i32(buf, what)?;
    usize::try_from(v).map_err(|_| BlobError::deserialize(format!("negative {what}: {v}")))
}

fn take_i32s(buf: &mut &[u8], n: usize, what: &str) -> Result<Vec<i32>, BlobError> {
    if buf.remaining() < n * 4 {
        return Err(truncated(what));
    }
    Ok((0..n).map(|_| buf.get_i32()).collect())
}

fn take_u16s(buf: &mut &[u8], n: usize, what: &str) -> Result<Vec<u16>, BlobError> {
    if buf.remaining() < n * 2 {
        return Err(truncated(what));
    }
    Ok((0..n).map(|_| buf.get_u16()).collect())
}

fn take_i16s(buf: &mut &[u8], n: usize, what: &str) -> Result<Vec<i16>, BlobError> {
    if buf.remaining() < n * 2 {
        return Err(truncated(what));
    }
    Ok((0..n).map(|_| buf.get_i16()).collect())
}

fn take_i64s(buf: &mut &[u8], n: usize, what: &str) -> Result<Vec<i64>, BlobError> {
    if buf.remaining() < n * 8 {
        return Err(truncated(what));
    }
    Ok((0..n).map(|_| buf.get_i64()).collect())
}

fn take_bytes(buf: &mut &[u8], n: usize, what: &str) -> Result<Vec<u8>, BlobError> {
    if buf.remaining() < n {
        return Err(truncated(what));
    }
    let out = buf[..n].to_vec();
    buf.advance(n);
    Ok(out)
}
