//! The main feature-structure heap.

use crate::aux_heap::AuxHeap;
use crate::{Address, NULL};

/// The main heap: 32-bit cells holding feature-structure records.
///
/// A record occupies a contiguous block starting at its address. The cell
/// at the base of the block holds the record's type code; the following
/// cells hold feature values - ints, f32 bit patterns, or addresses into
/// this heap, the auxiliary heaps, or the string heap. Which slot means
/// what is decided by the type system collaborator, not by this heap.
#[derive(Debug, Clone, Default)]
pub struct FsHeap {
    cells: AuxHeap<i32>,
}

impl FsHeap {
    /// Create a heap with the default base size and multiplication limit.
    pub fn new() -> Self {
        Self {
            cells: AuxHeap::new(),
        }
    }

    /// Create a heap with an explicit base capacity and multiplication limit.
    pub fn with_sizes(base_size: usize, mult_limit: usize) -> Self {
        Self {
            cells: AuxHeap::with_sizes(base_size, mult_limit),
        }
    }

    /// Allocate a record block of `n` cells; returns its address, never
    /// [`NULL`].
    pub fn reserve(&mut self, n: usize) -> Address {
        self.cells.reserve(n)
    }

    /// Read the cell at `addr`.
    pub fn cell(&self, addr: Address) -> i32 {
        self.cells.get(addr)
    }

    /// Write the cell at `addr`.
    pub fn set_cell(&mut self, addr: Address, value: i32) {
        self.cells.set(addr, value);
    }

    /// The type code stored at the base of the record at `addr`.
    ///
    /// Returns `None` when `addr` is NULL, outside the allocated region, or
    /// holds a negative cell value - callers turn that into an explicit
    /// error instead of reading garbage.
    pub fn type_code(&self, addr: Address) -> Option<u32> {
        if addr == NULL || addr as usize >= self.cells.pos() {
            return None;
        }
        let code = self.cells.get(addr);
        if code < 0 {
            return None;
        }
        Some(code as u32)
    }

    /// All cells up to the allocation cursor, including the reserved cell 0.
    pub fn used(&self) -> &[i32] {
        self.cells.used()
    }

    /// The allocation cursor: one past the last allocated cell.
    pub fn pos(&self) -> usize {
        self.cells.pos()
    }

    /// Replace the heap contents wholesale (deserialization path).
    pub fn replace(&mut self, values: &[i32]) {
        self.cells.replace(values);
    }

    /// Discard all records; see [`AuxHeap::reset`].
    pub fn reset(&mut self, full: bool) {
        self.cells.reset(full);
    }
}
