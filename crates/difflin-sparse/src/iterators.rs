//! Cursors and joint merges over sparse containers
//!
//! # Cursor protocol
//!
//! A [`Cursor`] walks the live entries of one container in ascending key
//! order: `ok()` tells whether it points at an entry, `index()` and `get()`
//! read it and `advance()` moves on. Accessors return `None` once the cursor
//! is exhausted.
//!
//! - [`SparseIter`] is the mutating cursor. It holds a unique borrow and
//!   evicts every null entry it steps over, so iteration doubles as
//!   compaction. Keys inserted while it runs land past its end and are
//!   picked up by the next pass.
//! - [`ConstIter`] is read-only. It skips null entries and leaves them in
//!   place.
//!
//! Both translate storage keys through a [`KeyMap`]: [`Linear`] for vectors
//! and [`crate::Window`] for matrix views, which skips keys outside the
//! view.
//!
//! # Joint merges
//!
//! [`JointIter2`] and [`JointIter3`] merge cursors that share an index type.
//! Each step is positioned at the smallest current index; operands stored at
//! that index contribute their value, all others contribute a zero owned by
//! the merge. Operand 1 may be written through: [`JointIter2::get_mut`]
//! yields it only when it is stored, [`JointIter2::entry`] creates it.
//!
//! # Examples
//!
//! ```
//! use difflin_sparse::{Cursor, SparseVector};
//!
//! let mut a = SparseVector::new(&[1, 3], vec![2.0, 5.0], 5).unwrap();
//! let b = SparseVector::new(&[2, 3], vec![4.0, 1.0], 5).unwrap();
//!
//! let mut merged = Vec::new();
//! let mut it = a.joint_iter(&b).unwrap();
//! while it.ok() {
//!     let (x, y) = it.get();
//!     merged.push((it.index().unwrap(), *x, *y));
//!     it.advance();
//! }
//! assert_eq!(merged, vec![(1, 2.0, 0.0), (2, 0.0, 4.0), (3, 5.0, 1.0)]);
//! ```

use crate::index::TOMBSTONE;
use crate::vector::SparseVector;
use difflin_core::Scalar;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// Translation between storage keys and container indices
pub trait KeyMap: Copy {
    type Index: Copy + Ord + Debug;

    /// Index of `key`, or `None` if the key lies outside the container
    fn map(&self, key: usize) -> Option<Self::Index>;

    /// Storage key of `index`
    fn key(&self, index: Self::Index) -> usize;

    /// Half-open key range covering every mapped key
    fn range(&self) -> (usize, usize);
}

/// Identity mapping used by vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl KeyMap for Linear {
    type Index = usize;

    #[inline]
    fn map(&self, key: usize) -> Option<usize> {
        Some(key)
    }

    #[inline]
    fn key(&self, index: usize) -> usize {
        index
    }

    fn range(&self) -> (usize, usize) {
        (0, TOMBSTONE)
    }
}

/// Read side of the cursor protocol
pub trait Cursor {
    type Index: Copy + Ord + Debug;
    type Scalar: Scalar;

    /// Whether the cursor points at an entry
    fn ok(&self) -> bool;

    /// Index of the current entry
    fn index(&self) -> Option<Self::Index>;

    /// Value of the current entry
    fn get(&self) -> Option<&Self::Scalar>;

    /// Move to the next entry
    fn advance(&mut self);
}

/// Write side of the cursor protocol
pub trait CursorMut: Cursor {
    /// Mutable value of the current entry
    fn get_mut(&mut self) -> Option<&mut Self::Scalar>;

    /// Value stored at `index`, created as zero if absent
    ///
    /// Does not move the cursor.
    fn entry(&mut self, index: Self::Index) -> &mut Self::Scalar;
}

// ============================================================================
// Mutating cursor
// ============================================================================

/// Mutating cursor that evicts null entries as it passes them
pub struct SparseIter<T, V, M = Linear> {
    source: V,
    map: M,
    pos: usize,
    end: usize,
    _marker: PhantomData<fn() -> T>,
}

/// Mutating cursor over a vector
pub type VectorIter<'a, T> = SparseIter<T, &'a mut SparseVector<T>>;

impl<T, V, M> SparseIter<T, V, M>
where
    T: Scalar,
    V: DerefMut<Target = SparseVector<T>>,
    M: KeyMap,
{
    /// Cursor at the first live entry with key `>= start`
    ///
    /// The index is sorted once here; the end position is fixed so that
    /// keys appended during iteration are not visited.
    pub(crate) fn new(mut source: V, map: M, start: usize) -> Self {
        let (lo, hi) = map.range();
        let pos = source.index.find(lo.max(start));
        let end = source.index.find(hi);
        let mut it = Self {
            source,
            map,
            pos,
            end,
            _marker: PhantomData,
        };
        it.settle();
        it
    }

    fn current_key(&self) -> Option<usize> {
        if self.pos < self.end {
            self.source.index.key(self.pos)
        } else {
            None
        }
    }

    /// Move forward to a live entry, evicting null and orphaned slots
    fn settle(&mut self) {
        while self.pos < self.end {
            let key = self.source.index.keys()[self.pos];
            if self.map.map(key).is_none() {
                self.pos += 1;
                continue;
            }
            let vector = &mut *self.source;
            match vector.values.get(&key).map(|v| v.is_null()) {
                Some(false) => break,
                Some(true) => {
                    vector.values.remove(&key);
                }
                None => {}
            }
            vector.index.revoke(self.pos);
            self.pos += 1;
        }
    }
}

impl<T, V, M> Cursor for SparseIter<T, V, M>
where
    T: Scalar,
    V: DerefMut<Target = SparseVector<T>>,
    M: KeyMap,
{
    type Index = M::Index;
    type Scalar = T;

    fn ok(&self) -> bool {
        self.pos < self.end
    }

    fn index(&self) -> Option<M::Index> {
        self.current_key().and_then(|k| self.map.map(k))
    }

    fn get(&self) -> Option<&T> {
        let key = self.current_key()?;
        self.source.values.get(&key)
    }

    fn advance(&mut self) {
        if self.pos < self.end {
            self.pos += 1;
            self.settle();
        }
    }
}

impl<T, V, M> CursorMut for SparseIter<T, V, M>
where
    T: Scalar,
    V: DerefMut<Target = SparseVector<T>>,
    M: KeyMap,
{
    fn get_mut(&mut self) -> Option<&mut T> {
        let key = self.current_key()?;
        self.source.values.get_mut(&key)
    }

    fn entry(&mut self, index: M::Index) -> &mut T {
        let key = self.map.key(index);
        self.source.slot(key)
    }
}

// ============================================================================
// Read-only cursor
// ============================================================================

enum Keys {
    /// The source index is sorted; read its keys directly
    Shared,
    /// Sorted copy of an unsorted index
    Owned(Vec<usize>),
}

/// Read-only cursor that skips null entries without evicting them
pub struct ConstIter<T, V, M = Linear> {
    source: V,
    keys: Keys,
    map: M,
    pos: usize,
    end: usize,
    _marker: PhantomData<fn() -> T>,
}

/// Read-only cursor over a vector
pub type VectorConstIter<'a, T> = ConstIter<T, &'a SparseVector<T>>;

impl<T, V, M> ConstIter<T, V, M>
where
    T: Scalar,
    V: Deref<Target = SparseVector<T>>,
    M: KeyMap,
{
    pub(crate) fn new(source: V, map: M, start: usize) -> Self {
        let keys = if source.index.is_sorted() {
            Keys::Shared
        } else {
            let mut keys: Vec<usize> = source
                .index
                .keys()
                .iter()
                .copied()
                .filter(|&k| k != TOMBSTONE)
                .collect();
            keys.sort_unstable();
            Keys::Owned(keys)
        };
        let mut it = Self {
            source,
            keys,
            map,
            pos: 0,
            end: 0,
            _marker: PhantomData,
        };
        let (lo, hi) = map.range();
        let lo = lo.max(start);
        it.pos = it.keys().partition_point(|&k| k < lo);
        it.end = it.keys().partition_point(|&k| k < hi);
        it.settle();
        it
    }

    fn keys(&self) -> &[usize] {
        match &self.keys {
            Keys::Shared => self.source.index.keys(),
            Keys::Owned(keys) => keys,
        }
    }

    fn current_key(&self) -> Option<usize> {
        if self.pos < self.end {
            Some(self.keys()[self.pos])
        } else {
            None
        }
    }

    fn settle(&mut self) {
        while self.pos < self.end {
            let key = self.keys()[self.pos];
            let live = self.map.map(key).is_some()
                && self.source.values.get(&key).is_some_and(|v| !v.is_null());
            if live {
                break;
            }
            self.pos += 1;
        }
    }
}

impl<T, V, M> Cursor for ConstIter<T, V, M>
where
    T: Scalar,
    V: Deref<Target = SparseVector<T>>,
    M: KeyMap,
{
    type Index = M::Index;
    type Scalar = T;

    fn ok(&self) -> bool {
        self.pos < self.end
    }

    fn index(&self) -> Option<M::Index> {
        self.current_key().and_then(|k| self.map.map(k))
    }

    fn get(&self) -> Option<&T> {
        let key = self.current_key()?;
        self.source.values.get(&key)
    }

    fn advance(&mut self) {
        if self.pos < self.end {
            self.pos += 1;
            self.settle();
        }
    }
}

impl<'a, T, M> Iterator for ConstIter<T, &'a SparseVector<T>, M>
where
    T: Scalar,
    M: KeyMap,
{
    type Item = (M::Index, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let source: &'a SparseVector<T> = self.source;
        let key = self.current_key()?;
        let item = (self.map.map(key)?, source.values.get(&key)?);
        Cursor::advance(self);
        Some(item)
    }
}

// ============================================================================
// Joint merges
// ============================================================================

fn contributes<C: Cursor>(cursor: &C, hit: bool) -> bool {
    hit && cursor.get().is_some_and(|v| !v.is_null())
}

fn current<C: Cursor>(cursor: &C) -> Option<C::Index> {
    if cursor.ok() {
        cursor.index()
    } else {
        None
    }
}

/// Merge of two cursors in ascending index order
///
/// Cursors that contributed at a step are advanced when the merge advances,
/// so values read at the current step remain borrowable until then.
pub struct JointIter2<C1: Cursor, C2: Cursor> {
    c1: C1,
    c2: C2,
    index: Option<C1::Index>,
    hit: [bool; 2],
    live: bool,
    zero1: C1::Scalar,
    zero2: C2::Scalar,
}

impl<C1, C2> JointIter2<C1, C2>
where
    C1: Cursor,
    C2: Cursor<Index = C1::Index>,
{
    pub fn new(c1: C1, c2: C2) -> Self {
        let mut it = Self {
            c1,
            c2,
            index: None,
            hit: [false; 2],
            live: false,
            zero1: C1::Scalar::zero(),
            zero2: C2::Scalar::zero(),
        };
        it.step();
        it
    }

    fn step(&mut self) {
        let i1 = current(&self.c1);
        let i2 = current(&self.c2);
        self.index = match (i1, i2) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.hit = [
            i1.is_some() && i1 == self.index,
            i2.is_some() && i2 == self.index,
        ];
        self.live = contributes(&self.c1, self.hit[0]) || contributes(&self.c2, self.hit[1]);
    }

    /// Whether some operand contributes a non-null value at this step
    pub fn ok(&self) -> bool {
        self.live
    }

    /// Index of the current step
    pub fn index(&self) -> Option<C1::Index> {
        self.index
    }

    /// Values at the current step; absent operands read as zero
    pub fn get(&self) -> (&C1::Scalar, &C2::Scalar) {
        let v1 = if self.hit[0] {
            self.c1.get().unwrap_or(&self.zero1)
        } else {
            &self.zero1
        };
        let v2 = if self.hit[1] {
            self.c2.get().unwrap_or(&self.zero2)
        } else {
            &self.zero2
        };
        (v1, v2)
    }

    /// Advance every operand that contributed and position on the next index
    pub fn advance(&mut self) {
        if self.hit[0] {
            self.c1.advance();
        }
        if self.hit[1] {
            self.c2.advance();
        }
        self.step();
    }
}

impl<C1, C2> JointIter2<C1, C2>
where
    C1: CursorMut,
    C2: Cursor<Index = C1::Index>,
{
    /// Operand 1 if it is stored at the current index, with operand 2
    pub fn get_mut(&mut self) -> (Option<&mut C1::Scalar>, &C2::Scalar) {
        let v1 = if self.hit[0] { self.c1.get_mut() } else { None };
        let v2 = if self.hit[1] {
            self.c2.get().unwrap_or(&self.zero2)
        } else {
            &self.zero2
        };
        (v1, v2)
    }

    /// Operand 1 at the current index, created if absent, with operand 2
    ///
    /// Returns `None` once the merge is exhausted.
    pub fn entry(&mut self) -> Option<(&mut C1::Scalar, &C2::Scalar)> {
        let index = self.index?;
        let v1 = self.c1.entry(index);
        let v2 = if self.hit[1] {
            self.c2.get().unwrap_or(&self.zero2)
        } else {
            &self.zero2
        };
        Some((v1, v2))
    }
}

/// Merge of three cursors in ascending index order
pub struct JointIter3<C1: Cursor, C2: Cursor, C3: Cursor> {
    c1: C1,
    c2: C2,
    c3: C3,
    index: Option<C1::Index>,
    hit: [bool; 3],
    live: bool,
    zero1: C1::Scalar,
    zero2: C2::Scalar,
    zero3: C3::Scalar,
}

impl<C1, C2, C3> JointIter3<C1, C2, C3>
where
    C1: Cursor,
    C2: Cursor<Index = C1::Index>,
    C3: Cursor<Index = C1::Index>,
{
    pub fn new(c1: C1, c2: C2, c3: C3) -> Self {
        let mut it = Self {
            c1,
            c2,
            c3,
            index: None,
            hit: [false; 3],
            live: false,
            zero1: C1::Scalar::zero(),
            zero2: C2::Scalar::zero(),
            zero3: C3::Scalar::zero(),
        };
        it.step();
        it
    }

    fn step(&mut self) {
        let idx = [current(&self.c1), current(&self.c2), current(&self.c3)];
        self.index = idx.iter().flatten().min().copied();
        for (hit, i) in self.hit.iter_mut().zip(idx) {
            *hit = i.is_some() && i == self.index;
        }
        self.live = contributes(&self.c1, self.hit[0])
            || contributes(&self.c2, self.hit[1])
            || contributes(&self.c3, self.hit[2]);
    }

    pub fn ok(&self) -> bool {
        self.live
    }

    pub fn index(&self) -> Option<C1::Index> {
        self.index
    }

    /// Values at the current step; absent operands read as zero
    pub fn get(&self) -> (&C1::Scalar, &C2::Scalar, &C3::Scalar) {
        let v1 = if self.hit[0] {
            self.c1.get().unwrap_or(&self.zero1)
        } else {
            &self.zero1
        };
        let v2 = if self.hit[1] {
            self.c2.get().unwrap_or(&self.zero2)
        } else {
            &self.zero2
        };
        let v3 = if self.hit[2] {
            self.c3.get().unwrap_or(&self.zero3)
        } else {
            &self.zero3
        };
        (v1, v2, v3)
    }

    pub fn advance(&mut self) {
        if self.hit[0] {
            self.c1.advance();
        }
        if self.hit[1] {
            self.c2.advance();
        }
        if self.hit[2] {
            self.c3.advance();
        }
        self.step();
    }
}

impl<C1, C2, C3> JointIter3<C1, C2, C3>
where
    C1: CursorMut,
    C2: Cursor<Index = C1::Index>,
    C3: Cursor<Index = C1::Index>,
{
    /// Operand 1 at the current index, created if absent, with operands 2 and 3
    pub fn entry(&mut self) -> Option<(&mut C1::Scalar, &C2::Scalar, &C3::Scalar)> {
        let index = self.index?;
        let v1 = self.c1.entry(index);
        let v2 = if self.hit[1] {
            self.c2.get().unwrap_or(&self.zero2)
        } else {
            &self.zero2
        };
        let v3 = if self.hit[2] {
            self.c3.get().unwrap_or(&self.zero3)
        } else {
            &self.zero3
        };
        Some((v1, v2, v3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(indices: &[usize], values: &[f64], n: usize) -> SparseVector<f64> {
        SparseVector::new(indices, values.to_vec(), n).unwrap()
    }

    #[test]
    fn test_sparse_iter_evicts_nulls() {
        let mut v = vector(&[0, 2, 4], &[1.0, 2.0, 3.0], 5);
        *v.at(2).unwrap() = 0.0;
        assert_eq!(v.stored(), 3);

        let mut seen = Vec::new();
        let mut it = v.iter();
        while it.ok() {
            seen.push(it.index().unwrap());
            it.advance();
        }
        drop(it);

        assert_eq!(seen, vec![0, 4]);
        assert_eq!(v.stored(), 2);
    }

    #[test]
    fn test_const_iter_keeps_nulls() {
        let mut v = vector(&[1, 3], &[1.0, 2.0], 4);
        *v.at(3).unwrap() = 0.0;

        let seen: Vec<usize> = v.const_iter().map(|(i, _)| i).collect();
        assert_eq!(seen, vec![1]);
        assert_eq!(v.stored(), 2);
    }

    #[test]
    fn test_const_iter_on_unsorted_index() {
        let mut v = SparseVector::<i32>::zeros(10);
        for i in [7, 2, 9, 0] {
            *v.at(i).unwrap() = i as i32 + 1;
        }
        let seen: Vec<(usize, i32)> = v.const_iter().map(|(i, x)| (i, *x)).collect();
        assert_eq!(seen, vec![(0, 1), (2, 3), (7, 8), (9, 10)]);
    }

    #[test]
    fn test_insert_during_iteration_not_visited() {
        let mut v = vector(&[1, 3], &[1.0, 1.0], 6);
        let mut visited = Vec::new();
        let mut it = v.iter();
        while it.ok() {
            let i = it.index().unwrap();
            visited.push(i);
            *it.entry(i + 1) = 7.0;
            it.advance();
        }
        drop(it);

        // 2 was created while visiting 1 and lies past the fixed end
        assert_eq!(visited, vec![1, 3]);
        assert_eq!(v.value_at(2).unwrap(), 7.0);
        assert_eq!(v.value_at(4).unwrap(), 7.0);
    }

    #[test]
    fn test_exhausted_cursor_returns_none() {
        let mut v = SparseVector::<f64>::zeros(3);
        let mut it = v.iter();
        assert!(!it.ok());
        assert_eq!(it.index(), None);
        assert!(it.get().is_none());
        assert!(it.get_mut().is_none());
        it.advance();
        assert!(!it.ok());
    }

    #[test]
    fn test_joint_iter_union() {
        let mut a = vector(&[1, 3], &[2.0, 5.0], 5);
        let b = vector(&[2, 3], &[4.0, 1.0], 5);

        let mut steps = Vec::new();
        let mut it = a.joint_iter(&b).unwrap();
        while it.ok() {
            let (x, y) = it.get();
            steps.push((it.index().unwrap(), *x, *y));
            it.advance();
        }
        assert_eq!(
            steps,
            vec![(1, 2.0, 0.0), (2, 0.0, 4.0), (3, 5.0, 1.0)]
        );
    }

    #[test]
    fn test_joint_get_mut_and_entry() {
        let mut a = vector(&[1], &[2.0], 4);
        let b = vector(&[1, 2], &[3.0, 4.0], 4);

        let mut absent = Vec::new();
        let mut it = a.joint_iter(&b).unwrap();
        while it.ok() {
            let missing = it.get_mut().0.is_none();
            if missing {
                absent.extend(it.index());
            }
            if let Some((x, y)) = it.entry() {
                if missing {
                    x.set(y);
                } else {
                    *x += *y;
                }
            }
            it.advance();
        }
        drop(it);

        assert_eq!(absent, vec![2]);
        assert_eq!(a.value_at(1).unwrap(), 5.0);
        assert_eq!(a.value_at(2).unwrap(), 4.0);
    }

    #[test]
    fn test_joint_iter3_union() {
        let mut a = vector(&[0, 4], &[1.0, 1.0], 6);
        let b = vector(&[2], &[2.0], 6);
        let c = SparseVector::new(&[4, 5], vec![3i32, 3], 6).unwrap();

        let mut indices = Vec::new();
        let mut it = a.joint_iter3(&b, &c).unwrap();
        while it.ok() {
            let (x, y, z) = it.get();
            indices.push((it.index().unwrap(), *x, *y, *z));
            it.advance();
        }
        assert_eq!(
            indices,
            vec![
                (0, 1.0, 0.0, 0),
                (2, 0.0, 2.0, 0),
                (4, 1.0, 0.0, 3),
                (5, 0.0, 0.0, 3),
            ]
        );
    }

    #[test]
    fn test_joint_iter_mut_evicts_both() {
        let mut a = vector(&[0, 1], &[1.0, 1.0], 3);
        let mut b = vector(&[1, 2], &[1.0, 1.0], 3);
        *a.at(0).unwrap() = 0.0;
        *b.at(2).unwrap() = 0.0;

        let mut count = 0;
        let mut it = a.joint_iter_mut(&mut b).unwrap();
        while it.ok() {
            count += 1;
            it.advance();
        }
        drop(it);

        assert_eq!(count, 1);
        assert_eq!(a.stored(), 1);
        assert_eq!(b.stored(), 1);
    }
}
