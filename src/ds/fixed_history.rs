//! Bounded access history window.
//!
//! Keeps the last `K` access ticks of a cache entry, with `K` chosen when the
//! cache is built. Storage grows with the ticks actually recorded, so a key
//! seen once costs one tick no matter how large `K` is. Recording into a full
//! window drops the oldest tick.
//!
//! ```text
//!   depth = 3, after recording 10, 20, 30, 40
//!
//!   front (oldest)          back (newest)
//!        ┌────┬────┬────┐
//!        │ 20 │ 30 │ 40 │
//!        └────┴────┴────┘
//!
//!   to_vec_mru() == [40, 30, 20]
//! ```
//!
//! ## Example
//!
//! ```
//! use lrukit::ds::FixedHistory;
//!
//! let mut history = FixedHistory::new(2);
//! history.record(1);
//! assert!(!history.is_full());
//!
//! history.record(2);
//! history.record(3);
//! assert!(history.is_full());
//! assert_eq!(history.to_vec_mru(), vec![3, 2]);
//! ```

use std::collections::VecDeque;

/// Upper bound on the ticks preallocated for a fresh window.
const INITIAL_TICKS: usize = 4;

/// Window of the most recent access ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHistory {
    ticks: VecDeque<u64>,
    depth: usize,
}

impl FixedHistory {
    /// Creates an empty history holding at most `depth` ticks.
    ///
    /// A depth of 0 is raised to 1.
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            ticks: VecDeque::with_capacity(depth.min(INITIAL_TICKS)),
            depth,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// `true` once `depth` ticks have been recorded.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ticks.len() >= self.depth
    }

    /// Appends `tick`, dropping the oldest one if the window is full.
    #[inline]
    pub fn record(&mut self, tick: u64) {
        if self.is_full() {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
    }

    /// Ticks ordered most recent first.
    pub fn to_vec_mru(&self) -> Vec<u64> {
        self.ticks.iter().rev().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_until_full_then_drops_oldest() {
        let mut history = FixedHistory::new(3);
        assert!(history.is_empty());
        assert!(history.to_vec_mru().is_empty());

        history.record(10);
        history.record(20);
        assert_eq!(history.len(), 2);
        assert!(!history.is_full());

        history.record(30);
        assert!(history.is_full());
        history.record(40);
        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec_mru(), vec![40, 30, 20]);
    }

    #[test]
    fn zero_depth_is_raised_to_one() {
        let mut history = FixedHistory::new(0);
        assert!(!history.is_full());
        history.record(5);
        history.record(6);
        assert!(history.is_full());
        assert_eq!(history.to_vec_mru(), vec![6]);
    }

    #[test]
    fn huge_depth_allocates_lazily() {
        let mut history = FixedHistory::new(usize::MAX);
        for tick in 1..=100 {
            history.record(tick);
        }
        assert_eq!(history.len(), 100);
        assert!(!history.is_full());
        assert_eq!(history.to_vec_mru().first(), Some(&100));
    }
}
