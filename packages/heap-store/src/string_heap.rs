//! String storage: inline char buffer plus a mutation overflow list.

use crate::{Address, NULL};

/// One row of the string reference table.
///
/// Exactly one of the two storage forms is live: `list_ref == 0` means the
/// characters sit inline in the shared char buffer at
/// `[char_offset, char_offset + len)`; `list_ref != 0` means the string
/// lives in the overflow list and the offset/length fields are meaningless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringEntry {
    /// Index into the overflow list, or 0 for inline storage.
    pub list_ref: u32,
    /// Start of the characters in the char buffer (inline form).
    pub char_offset: u32,
    /// Number of UTF-16 code units (inline form).
    pub len: u32,
}

impl StringEntry {
    fn inline(char_offset: u32, len: u32) -> Self {
        Self {
            list_ref: 0,
            char_offset,
            len,
        }
    }
}

/// Two-tier string storage.
///
/// Strings known at allocation time are appended to a shared UTF-16 char
/// buffer ([`StringHeap::add_string`]). Replacing a string later would
/// require shuffling that buffer, so replacements go to a separate overflow
/// list instead ([`StringHeap::set_string`]) and the reference table row is
/// re-targeted. Readers check `list_ref` first and fall back to the char
/// buffer.
///
/// Reference 0 is the reserved NULL string reference.
#[derive(Debug, Clone)]
pub struct StringHeap {
    chars: Vec<u16>,
    refs: Vec<StringEntry>,
    list: Vec<String>,
}

impl StringHeap {
    /// Create an empty string heap.
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            refs: vec![StringEntry::default()],
            list: vec![String::new()],
        }
    }

    // === Writing ===

    /// Store a string inline and return its reference, never [`NULL`].
    pub fn add_string(&mut self, s: &str) -> Address {
        let char_offset = self.chars.len() as u32;
        self.chars.extend(s.encode_utf16());
        let len = self.chars.len() as u32 - char_offset;
        self.refs.push(StringEntry::inline(char_offset, len));
        (self.refs.len() - 1) as Address
    }

    /// Replace the string behind an existing reference.
    ///
    /// The new characters go to the overflow list; the reference itself is
    /// unchanged, so every slot holding it observes the new value. The old
    /// inline characters (if any) stay in the buffer unreferenced until the
    /// next reset.
    pub fn set_string(&mut self, r: Address, s: &str) {
        debug_assert!(r != NULL && (r as usize) < self.refs.len());
        self.list.push(s.to_owned());
        let entry = &mut self.refs[r as usize];
        entry.list_ref = (self.list.len() - 1) as u32;
        entry.char_offset = 0;
        entry.len = 0;
    }

    // === Reading ===

    /// Resolve a reference to its string, or `None` for NULL/invalid refs.
    pub fn string(&self, r: Address) -> Option<String> {
        if r == NULL {
            return None;
        }
        let entry = self.refs.get(r as usize)?;
        if entry.list_ref != 0 {
            return self.list.get(entry.list_ref as usize).cloned();
        }
        let start = entry.char_offset as usize;
        let end = start + entry.len as usize;
        Some(String::from_utf16_lossy(&self.chars[start..end]))
    }

    /// Number of live references, excluding the reserved row 0.
    pub fn entry_count(&self) -> usize {
        self.refs.len() - 1
    }

    /// The full reference table, including the reserved row 0.
    pub fn entries(&self) -> &[StringEntry] {
        &self.refs
    }

    /// The inline char buffer (UTF-16 code units).
    pub fn chars(&self) -> &[u16] {
        &self.chars
    }

    /// An overflow-list entry by index; index 0 is reserved.
    pub fn list_string(&self, list_ref: u32) -> Option<&str> {
        if list_ref == 0 {
            return None;
        }
        self.list.get(list_ref as usize).map(String::as_str)
    }

    // === Bulk load (deserialization) ===

    /// Rebuild the heap from a flat char region and inline
    /// (offset, length) pairs. The overflow list comes back empty: a
    /// deserialized heap is all-inline by construction.
    pub fn rebuild(&mut self, chars: Vec<u16>, entries: &[(u32, u32)]) {
        self.chars = chars;
        self.refs.clear();
        self.refs.push(StringEntry::default());
        self.refs.extend(
            entries
                .iter()
                .map(|&(char_offset, len)| StringEntry::inline(char_offset, len)),
        );
        self.list.clear();
        self.list.push(String::new());
    }

    /// Discard all strings. With `full`, backing storage is reallocated.
    pub fn reset(&mut self, full: bool) {
        if full {
            self.chars = Vec::new();
            self.refs = vec![StringEntry::default()];
            self.list = vec![String::new()];
        } else {
            self.chars.clear();
            self.refs.truncate(1);
            self.list.truncate(1);
        }
    }
}

impl Default for StringHeap {
    fn default() -> Self {
        Self::new()
    }
}
