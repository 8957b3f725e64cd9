//! Largest-file tracking.
//!
//! A max-heap over `(size, sequence)` with lazy deletion. Removing an
//! arbitrary file only drops it from the live map; stale entries are popped
//! when they surface at the top of the heap, so the heap top is always live
//! and [`LargestFileTracker::largest`] is a plain peek.
//!
//! Ties on size go to the most recently inserted file, because its sequence
//! number is higher.

use crate::node::NodeId;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    size: u64,
    seq: u64,
    id: NodeId,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Tracks which file is largest under insertion and arbitrary removal.
#[derive(Debug, Default)]
pub struct LargestFileTracker {
    heap: BinaryHeap<HeapEntry>,
    /// Live files: handle -> (sequence of its heap entry, size).
    live: HashMap<NodeId, (u64, u64)>,
    next_seq: u64,
}

impl LargestFileTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a file. Re-inserting a tracked handle replaces it.
    pub fn insert(&mut self, id: NodeId, size: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.live.insert(id, (seq, size));
        self.heap.push(HeapEntry { size, seq, id });
        self.prune();
    }

    /// Stop tracking a file. Returns false if it was not tracked.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if self.live.remove(&id).is_none() {
            return false;
        }

        self.prune();
        if self.heap.len() > 2 * self.live.len() + 16 {
            self.rebuild();
        }
        true
    }

    /// Handle of the largest tracked file.
    pub fn largest(&self) -> Option<NodeId> {
        self.heap.peek().map(|entry| entry.id)
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    fn is_live(&self, entry: &HeapEntry) -> bool {
        matches!(self.live.get(&entry.id), Some(&(seq, _)) if seq == entry.seq)
    }

    /// Pop stale entries until the top is live or the heap is empty.
    fn prune(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.is_live(top) {
                break;
            }
            self.heap.pop();
        }
    }

    /// Drop every stale entry at once.
    fn rebuild(&mut self) {
        trace!(
            heap = self.heap.len(),
            live = self.live.len(),
            "rebuilding largest-file heap"
        );
        self.heap = self
            .live
            .iter()
            .map(|(&id, &(seq, size))| HeapEntry { size, seq, id })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let tracker = LargestFileTracker::new();
        assert_eq!(tracker.largest(), None);
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn test_largest_after_inserts() {
        let mut tracker = LargestFileTracker::new();
        tracker.insert(NodeId(1), 100);
        tracker.insert(NodeId(2), 6400);
        tracker.insert(NodeId(3), 1000);

        assert_eq!(tracker.largest(), Some(NodeId(2)));
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_remove_largest() {
        let mut tracker = LargestFileTracker::new();
        tracker.insert(NodeId(1), 100);
        tracker.insert(NodeId(2), 6400);
        tracker.insert(NodeId(3), 1000);

        assert!(tracker.remove(NodeId(2)));
        assert_eq!(tracker.largest(), Some(NodeId(3)));
        assert!(!tracker.remove(NodeId(2)));
    }

    #[test]
    fn test_remove_non_largest() {
        let mut tracker = LargestFileTracker::new();
        tracker.insert(NodeId(1), 100);
        tracker.insert(NodeId(2), 6400);

        assert!(tracker.remove(NodeId(1)));
        assert_eq!(tracker.largest(), Some(NodeId(2)));

        assert!(tracker.remove(NodeId(2)));
        assert_eq!(tracker.largest(), None);
    }

    #[test]
    fn test_tie_favors_newest() {
        let mut tracker = LargestFileTracker::new();
        tracker.insert(NodeId(1), 3000);
        tracker.insert(NodeId(2), 3000);
        assert_eq!(tracker.largest(), Some(NodeId(2)));

        tracker.remove(NodeId(2));
        assert_eq!(tracker.largest(), Some(NodeId(1)));
    }

    #[test]
    fn test_reused_handle_is_not_confused_with_stale_entry() {
        let mut tracker = LargestFileTracker::new();
        tracker.insert(NodeId(1), 5000);
        tracker.insert(NodeId(2), 10);
        tracker.remove(NodeId(1));

        // Handle 1 comes back as a small file; the old 5000 entry must not win.
        tracker.insert(NodeId(1), 5);
        assert_eq!(tracker.largest(), Some(NodeId(2)));
    }

    #[test]
    fn test_rebuild_bounds_heap() {
        let mut tracker = LargestFileTracker::new();
        for i in 0..1000 {
            tracker.insert(NodeId(i), u64::from(i) + 1);
        }
        // Remove small files first so stale entries stay buried.
        for i in 0..990 {
            tracker.remove(NodeId(i));
        }

        assert_eq!(tracker.len(), 10);
        assert!(tracker.heap.len() <= 2 * tracker.len() + 16);
        assert_eq!(tracker.largest(), Some(NodeId(999)));
    }

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Property 4: Tracker agrees with a linear scan after arbitrary removals
        #[test]
        fn prop_largest_matches_scan(
            sizes in prop::collection::vec(1u64..10_000, 1..60),
            removals in prop::collection::vec(any::<prop::sample::Index>(), 0..60),
        ) {
            let mut tracker = LargestFileTracker::new();
            let mut model: Vec<(NodeId, u64, usize)> = Vec::new();
            for (i, &size) in sizes.iter().enumerate() {
                tracker.insert(NodeId(i as u32), size);
                model.push((NodeId(i as u32), size, i));
            }

            for pick in removals {
                if model.is_empty() {
                    break;
                }
                let (id, _, _) = model.remove(pick.index(model.len()));
                prop_assert!(tracker.remove(id));
            }

            // Newest of the largest wins
            let expected = model
                .iter()
                .max_by_key(|(_, size, order)| (*size, *order))
                .map(|(id, _, _)| *id);
            prop_assert_eq!(tracker.largest(), expected);
            prop_assert_eq!(tracker.len(), model.len());
        }
    }
}
