//! The process-wide `tx_id_next` counter.
//!
//! This is the sole mutable resource shared across `assemble` calls.
//! It is injected into the driver rather than baked into engine state,
//! so that concurrent assembly of disjoint loci only ever shares this
//! one atomic.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomically allocates monotonically increasing `tx_id` values.
///
/// Safe to share across threads assembling disjoint loci in parallel;
/// `Ordering::Relaxed` suffices since callers only need uniqueness and
/// monotonicity, not happens-before synchronization with other state.
#[derive(Debug, Default)]
pub struct TxIdAllocator {
    next: AtomicU64,
}

impl TxIdAllocator {
    /// A new allocator whose first call to `alloc` returns `start`.
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Allocate the next `tx_id`.
    pub fn alloc(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_monotonically() {
        let counter = TxIdAllocator::new(0);
        assert_eq!(counter.alloc(), 0);
        assert_eq!(counter.alloc(), 1);
        assert_eq!(counter.alloc(), 2);
    }

    #[test]
    fn respects_configured_start() {
        let counter = TxIdAllocator::new(42);
        assert_eq!(counter.alloc(), 42);
        assert_eq!(counter.alloc(), 43);
    }

    #[test]
    fn concurrent_allocations_are_unique() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(TxIdAllocator::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || (0..100).map(|_| counter.alloc()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
    }
}
