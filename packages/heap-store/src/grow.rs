//! Capacity computation shared by every heap.
//!
//! Small heaps double so the number of reallocations stays logarithmic;
//! once a heap is at or past the multiplication limit it grows additively
//! in limit-sized increments so a very large heap never doubles again.

/// Default base (minimum) capacity of a heap, in cells.
pub const DEFAULT_BASE_SIZE: usize = 16;

/// Default capacity at which growth switches from doubling to additive.
pub const DEFAULT_MULT_LIMIT: usize = 1024;

/// Compute the capacity a heap must grow to.
///
/// Starting from `current`, doubles while below `mult_limit`, then adds
/// `mult_limit` per step, until the result is at least `required`. Returns
/// `current` unchanged when it already satisfies the request.
///
/// # Example
///
/// ```rust
/// use fstore_heap_store::grown_capacity;
///
/// assert_eq!(grown_capacity(16, 1024, 20), 32);
/// assert_eq!(grown_capacity(16, 1024, 2000), 2048);
/// ```
pub fn grown_capacity(current: usize, mult_limit: usize, required: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity < required {
        if capacity < mult_limit {
            capacity *= 2;
        } else {
            capacity += mult_limit;
        }
    }
    capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_phase() {
        assert_eq!(grown_capacity(16, 1024, 20), 32);
        assert_eq!(grown_capacity(16, 1024, 33), 64);
        assert_eq!(grown_capacity(16, 1024, 1000), 1024);
    }

    #[test]
    fn additive_phase() {
        // 16 -> ... -> 1024, then +1024 per step
        assert_eq!(grown_capacity(16, 1024, 2000), 2048);
        assert_eq!(grown_capacity(16, 1024, 2049), 3072);
        assert_eq!(grown_capacity(1024, 1024, 5000), 5120);
    }

    #[test]
    fn already_large_enough() {
        assert_eq!(grown_capacity(64, 1024, 10), 64);
        assert_eq!(grown_capacity(64, 1024, 64), 64);
    }

    #[test]
    fn result_is_minimal() {
        // The returned capacity is the smallest value on the
        // double-then-add ladder that satisfies the request.
        let cap = grown_capacity(16, 1024, 2000);
        assert!(cap >= 2000);
        assert!(cap - 1024 < 2000);
    }

    #[test]
    fn zero_current_still_grows() {
        assert_eq!(grown_capacity(0, 1024, 3), 4);
    }
}
