//! Sorted-on-read key index
//!
//! A [`SparseIndex`] is the ordered key set of a sparse container. Writes are
//! cheap and leave the index unsorted: [`SparseIndex::insert`] appends and
//! [`SparseIndex::revoke`] overwrites a slot with a tombstone. Every
//! order-dependent read (iteration, [`SparseIndex::find`],
//! [`SparseIndex::swap`]) first calls [`SparseIndex::sort`], which restores
//! strict ascending order and drops tombstones.
//!
//! The index never validates keys; callers keep them within the container
//! dimension and unique.
//!
//! # Examples
//!
//! ```
//! use difflin_sparse::SparseIndex;
//!
//! let mut index = SparseIndex::new();
//! index.insert(7);
//! index.insert(2);
//! index.insert(4);
//! index.revoke(1);
//!
//! index.sort();
//! assert_eq!(index.keys(), &[4, 7]);
//! assert_eq!(index.find(5), 1);
//! ```

use tracing::trace;

/// Key marking a revoked slot
pub const TOMBSTONE: usize = usize::MAX;

/// Ordered key set with deferred sorting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseIndex {
    keys: Vec<usize>,
    sorted: bool,
}

impl Default for SparseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseIndex {
    /// Empty (and therefore sorted) index
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            sorted: true,
        }
    }

    /// Index over keys that are already strictly ascending
    pub(crate) fn from_sorted(keys: Vec<usize>) -> Self {
        debug_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        Self { keys, sorted: true }
    }

    /// Number of slots, including tombstones while unsorted
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Key at slot `pos`
    pub fn key(&self, pos: usize) -> Option<usize> {
        self.keys.get(pos).copied()
    }

    /// Raw key slots; strictly ascending only after [`SparseIndex::sort`]
    pub fn keys(&self) -> &[usize] {
        &self.keys
    }

    /// Append `key`
    ///
    /// # Complexity
    ///
    /// O(1) amortised
    pub fn insert(&mut self, key: usize) {
        self.keys.push(key);
        self.sorted = false;
    }

    /// Replace the key at slot `pos` with a tombstone
    pub fn revoke(&mut self, pos: usize) {
        if let Some(slot) = self.keys.get_mut(pos) {
            *slot = TOMBSTONE;
            self.sorted = false;
        }
    }

    /// Sort ascending and drop tombstones
    ///
    /// Idempotent; a sorted index is left untouched.
    ///
    /// # Complexity
    ///
    /// O(m log m) for m slots
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        let before = self.keys.len();
        self.keys.sort_unstable();
        let live = self.keys.partition_point(|&k| k != TOMBSTONE);
        self.keys.truncate(live);
        self.sorted = true;

        debug_assert!(
            self.keys.windows(2).all(|w| w[0] < w[1]),
            "duplicate keys in sparse index"
        );
        trace!(
            before,
            after = self.keys.len(),
            tombstones = before - self.keys.len(),
            "sparse index compacted"
        );
    }

    /// First slot whose key is `>= key` (`len()` if none)
    pub fn find(&mut self, key: usize) -> usize {
        self.sort();
        self.keys.partition_point(|&k| k < key)
    }

    /// Slot holding exactly `key`
    pub fn position(&mut self, key: usize) -> Option<usize> {
        self.sort();
        self.keys.binary_search(&key).ok()
    }

    /// Exchange the membership of keys `i` and `j`
    ///
    /// If exactly one of them is present it is rewritten to the other; if
    /// both or neither are present the key set does not change.
    pub fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        match (self.position(i), self.position(j)) {
            (Some(p), None) => {
                self.keys[p] = j;
                self.sorted = false;
            }
            (None, Some(q)) => {
                self.keys[q] = i;
                self.sorted = false;
            }
            _ => {}
        }
    }

    /// Remove all keys
    pub fn clear(&mut self) {
        self.keys.clear();
        self.sorted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_sorted() {
        let mut index = SparseIndex::default();
        assert!(index.is_sorted());
        assert_eq!(index.find(3), 0);
        assert_eq!(index.position(0), None);
    }

    #[test]
    fn test_insert_unsorts() {
        let mut index = SparseIndex::new();
        index.insert(3);
        assert!(!index.is_sorted());
        index.sort();
        assert!(index.is_sorted());
        assert_eq!(index.keys(), &[3]);
    }

    #[test]
    fn test_sort_strips_tombstones() {
        let mut index = SparseIndex::new();
        for k in [9, 1, 5, 3] {
            index.insert(k);
        }
        index.revoke(0);
        index.revoke(3);
        index.sort();
        assert_eq!(index.keys(), &[1, 5]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_revoke_out_of_range_is_ignored() {
        let mut index = SparseIndex::from_sorted(vec![1, 2]);
        index.revoke(5);
        assert!(index.is_sorted());
    }

    #[test]
    fn test_find() {
        let mut index = SparseIndex::new();
        for k in [10, 0, 4] {
            index.insert(k);
        }
        assert_eq!(index.find(0), 0);
        assert_eq!(index.find(4), 1);
        assert_eq!(index.find(5), 2);
        assert_eq!(index.find(11), 3);
    }

    #[test]
    fn test_swap_membership() {
        let mut index = SparseIndex::from_sorted(vec![1, 4]);

        // one present: rewritten
        index.swap(4, 6);
        index.sort();
        assert_eq!(index.keys(), &[1, 6]);

        // both present: unchanged
        index.swap(1, 6);
        assert_eq!(index.keys(), &[1, 6]);

        // neither present: unchanged
        index.swap(2, 3);
        assert_eq!(index.keys(), &[1, 6]);

        index.swap(0, 1);
        index.sort();
        assert_eq!(index.keys(), &[0, 6]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = SparseIndex::from_sorted(vec![2, 3]);
        let b = a.clone();
        a.insert(0);
        a.sort();
        assert_eq!(a.keys(), &[0, 2, 3]);
        assert_eq!(b.keys(), &[2, 3]);
    }
}
