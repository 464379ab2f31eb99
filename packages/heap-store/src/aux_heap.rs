//! Generic growable heap of typed cells.

use crate::grow::{grown_capacity, DEFAULT_BASE_SIZE, DEFAULT_MULT_LIMIT};
use crate::{Address, NULL};

/// A growable array of cells of type `T` with arena-style allocation.
///
/// Cell 0 is reserved and never handed out, so a returned address is always
/// nonzero and `0` can serve as the NULL sentinel. `reserve` hands out
/// contiguous blocks; there is no per-block reclamation - `reset` discards
/// everything at once.
///
/// # Example
///
/// ```rust
/// use fstore_heap_store::ByteHeap;
///
/// let mut heap = ByteHeap::new();
/// let addr = heap.reserve(4);
/// heap.block_mut(addr, 4).copy_from_slice(&[1, 2, 3, 4]);
/// assert_eq!(heap.block(addr, 4), &[1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct AuxHeap<T> {
    cells: Vec<T>,
    pos: usize,
    base_size: usize,
    mult_limit: usize,
}

/// Auxiliary heap of bytes.
pub type ByteHeap = AuxHeap<u8>;
/// Auxiliary heap of 16-bit values.
pub type ShortHeap = AuxHeap<i16>;
/// Auxiliary heap of 64-bit words.
pub type LongHeap = AuxHeap<i64>;

impl<T: Copy + Default> AuxHeap<T> {
    /// Create a heap with the default base size and multiplication limit.
    pub fn new() -> Self {
        Self::with_sizes(DEFAULT_BASE_SIZE, DEFAULT_MULT_LIMIT)
    }

    /// Create a heap with an explicit base capacity and multiplication
    /// limit. The base is clamped to at least 2 cells (the reserved NULL
    /// cell plus one allocatable cell).
    pub fn with_sizes(base_size: usize, mult_limit: usize) -> Self {
        let base_size = base_size.max(2);
        Self {
            cells: vec![T::default(); base_size],
            pos: 1,
            base_size,
            mult_limit: mult_limit.max(1),
        }
    }

    // === Allocation ===

    /// Allocate `n` contiguous cells and return the address of the first.
    ///
    /// Never returns [`NULL`]. Growth preserves all previously written
    /// cells, so addresses issued earlier stay valid.
    pub fn reserve(&mut self, n: usize) -> Address {
        let addr = self.pos;
        let required = self.pos + n;
        if required > self.cells.len() {
            let capacity = grown_capacity(self.cells.len(), self.mult_limit, required);
            log::trace!(
                "growing heap backing array {} -> {} cells",
                self.cells.len(),
                capacity
            );
            self.cells.resize(capacity, T::default());
        }
        self.pos = required;
        debug_assert_ne!(addr as Address, NULL);
        addr as Address
    }

    /// Discard all allocations and return the cursor to address 1.
    ///
    /// With `full`, the backing array is reallocated at the base size;
    /// otherwise the existing array is zeroed in place.
    pub fn reset(&mut self, full: bool) {
        if full {
            self.cells = vec![T::default(); self.base_size];
        } else {
            self.cells.fill(T::default());
        }
        self.pos = 1;
    }

    // === Cell access ===

    /// Read the cell at `addr`.
    pub fn get(&self, addr: Address) -> T {
        debug_assert!((addr as usize) < self.pos);
        self.cells[addr as usize]
    }

    /// Write the cell at `addr`.
    pub fn set(&mut self, addr: Address, value: T) {
        debug_assert!((addr as usize) < self.pos);
        self.cells[addr as usize] = value;
    }

    /// Borrow `len` cells starting at `addr`.
    pub fn block(&self, addr: Address, len: usize) -> &[T] {
        &self.cells[addr as usize..addr as usize + len]
    }

    /// Mutably borrow `len` cells starting at `addr`.
    pub fn block_mut(&mut self, addr: Address, len: usize) -> &mut [T] {
        &mut self.cells[addr as usize..addr as usize + len]
    }

    /// All cells up to the allocation cursor, including the reserved cell 0.
    pub fn used(&self) -> &[T] {
        &self.cells[..self.pos]
    }

    /// The allocation cursor: one past the last allocated cell.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current capacity of the backing array.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    // === Bulk load (deserialization) ===

    /// Replace the heap contents wholesale, setting the cursor past the
    /// last value. An empty input is equivalent to `reset(false)`.
    pub fn replace(&mut self, values: &[T]) {
        if values.is_empty() {
            self.reset(false);
            return;
        }
        self.cells = values.to_vec();
        self.pos = values.len();
    }
}

impl<T: Copy + Default> Default for AuxHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_never_returns_null() {
        let mut heap = ByteHeap::new();
        for _ in 0..100 {
            assert_ne!(heap.reserve(1), NULL);
        }
    }

    #[test]
    fn blocks_are_contiguous() {
        let mut heap = ShortHeap::new();
        let a = heap.reserve(3);
        let b = heap.reserve(2);
        assert_eq!(a, 1);
        assert_eq!(b, 4);
    }

    #[test]
    fn values_survive_growth() {
        let mut heap = LongHeap::with_sizes(4, 1024);
        let a = heap.reserve(2);
        heap.set(a, 0x0123_4567_89AB_CDEF);
        heap.set(a + 1, -42);

        // Force several growth events.
        let _ = heap.reserve(5000);

        assert_eq!(heap.get(a), 0x0123_4567_89AB_CDEF);
        assert_eq!(heap.get(a + 1), -42);
        assert!(heap.capacity() >= 5002);
    }

    #[test]
    fn reset_zeroes_and_rewinds() {
        let mut heap = ByteHeap::new();
        let a = heap.reserve(4);
        heap.block_mut(a, 4).copy_from_slice(&[9, 9, 9, 9]);

        heap.reset(false);
        assert_eq!(heap.pos(), 1);

        // Addresses are reused from 1 after a reset.
        let b = heap.reserve(4);
        assert_eq!(b, a);
        assert_eq!(heap.block(b, 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn full_reset_shrinks_to_base() {
        let mut heap = ByteHeap::with_sizes(8, 1024);
        let _ = heap.reserve(500);
        assert!(heap.capacity() >= 501);

        heap.reset(true);
        assert_eq!(heap.capacity(), 8);
        assert_eq!(heap.pos(), 1);
    }

    #[test]
    fn replace_loads_contents() {
        let mut heap = ByteHeap::new();
        heap.replace(&[0, 1, 2, 3, 4]);
        assert_eq!(heap.pos(), 5);
        assert_eq!(heap.get(1), 1);
        assert_eq!(heap.get(4), 4);

        heap.replace(&[]);
        assert_eq!(heap.pos(), 1);
    }
}
