//! Low-level fstore heaps.
//!
//! This is the narrow waist of the fstore stack. Everything at this level is
//! typed cells addressed by plain integer offsets - no type system, no
//! wrapper objects, no serialization format.
//!
//! Use this layer for:
//! - Allocating feature-structure records as contiguous cell blocks
//! - Auxiliary byte/short/long storage referenced from record slots
//! - String storage with an inline buffer and a mutation overflow list
//!
//! Addresses are logical offsets into growable backing arrays, never raw
//! pointers. Growth reallocates the backing storage but preserves every
//! previously written cell, so an address handed out before a growth event
//! resolves to the same value after it. Address `0` is the reserved NULL
//! sentinel on every heap; valid data begins at address 1.
//!
//! # Example
//!
//! ```rust
//! use fstore_heap_store::{FsHeap, NULL};
//!
//! let mut heap = FsHeap::new();
//! let addr = heap.reserve(3);
//! assert_ne!(addr, NULL);
//! heap.set_cell(addr, 7); // type code at the base of the block
//! assert_eq!(heap.cell(addr), 7);
//! ```

mod aux_heap;
mod fs_heap;
mod grow;
mod string_heap;

pub use aux_heap::{AuxHeap, ByteHeap, LongHeap, ShortHeap};
pub use fs_heap::FsHeap;
pub use grow::{grown_capacity, DEFAULT_BASE_SIZE, DEFAULT_MULT_LIMIT};
pub use string_heap::{StringEntry, StringHeap};

/// A heap address: an offset into a heap's backing array.
///
/// Addresses fit in 32 bits so they can be stored in main-heap cells and
/// serialized as `int32` fields.
pub type Address = u32;

/// The reserved NULL/invalid address. No heap ever allocates at 0.
pub const NULL: Address = 0;
