//! Sparse vectors
//!
//! A [`SparseVector`] stores its non-null entries in a hash map keyed by
//! position and keeps the ordered key set in a [`SparseIndex`]. Positions
//! that are not stored read as zero.
//!
//! Writing a zero through [`SparseVector::at`] does not remove the entry
//! right away. Null entries stay in the map until a mutating cursor
//! ([`SparseVector::iter`], [`SparseVector::compact`], the joint merges)
//! steps over them and evicts them.
//!
//! # Examples
//!
//! ```
//! use difflin_sparse::SparseVector;
//!
//! let mut v = SparseVector::new(&[0, 2, 4], vec![1.0, 0.0, 3.0], 5).unwrap();
//! assert_eq!(v.stored(), 2);
//! assert_eq!(*v.const_at(2).unwrap(), 0.0);
//!
//! *v.at(1).unwrap() = 7.0;
//! assert_eq!(v.indices(), vec![0, 1, 4]);
//! assert_eq!(v.to_string(), "5:[0:1, 1:7, 4:3]");
//! ```

use crate::error::{IndexError, SparseError, SparseResult, ValidationError};
use crate::index::SparseIndex;
use crate::iterators::{ConstIter, Cursor, JointIter2, JointIter3, Linear, SparseIter};
use crate::iterators::{VectorConstIter, VectorIter};
use crate::matrix::SparseMatrix;
use difflin_core::permutation::validate_permutation;
use difflin_core::{Real, Scalar};
use scirs2_core::numeric::Float;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// Sparse vector of dimension `n`
#[derive(Debug, Clone)]
pub struct SparseVector<T> {
    pub(crate) index: SparseIndex,
    pub(crate) values: HashMap<usize, T>,
    pub(crate) n: usize,
    /// Returned by [`SparseVector::const_at`] for positions that are not stored
    pub(crate) zero: T,
}

impl<T: Scalar> SparseVector<T> {
    /// Create a vector from a coordinate list
    ///
    /// Null values are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if `indices` and `values` differ in length, if an index
    /// is `>= n`, or if an index appears twice.
    pub fn new(indices: &[usize], values: Vec<T>, n: usize) -> SparseResult<Self> {
        if indices.len() != values.len() {
            return Err(ValidationError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(indices.len());
        let mut map = HashMap::with_capacity(indices.len());
        for (position, (&k, value)) in indices.iter().zip(values).enumerate() {
            if k >= n {
                return Err(SparseError::index_out_of_bounds(vec![k], vec![n]));
            }
            if !seen.insert(k) {
                return Err(SparseError::duplicate_index(vec![k], position));
            }
            if !value.is_null() {
                map.insert(k, value);
            }
        }

        Ok(Self::from_map(map, n))
    }

    /// Vector of `n` zeros; nothing is stored
    pub fn zeros(n: usize) -> Self {
        Self {
            index: SparseIndex::new(),
            values: HashMap::new(),
            n,
            zero: T::zero(),
        }
    }

    /// Sparse copy of a dense value list, dropping nulls
    pub fn from_dense(values: Vec<T>) -> Self {
        let n = values.len();
        let map = values
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .collect();
        Self::from_map(map, n)
    }

    pub(crate) fn from_map(values: HashMap<usize, T>, n: usize) -> Self {
        let mut keys: Vec<usize> = values.keys().copied().collect();
        keys.sort_unstable();
        Self {
            index: SparseIndex::from_sorted(keys),
            values,
            n,
            zero: T::zero(),
        }
    }

    /// Replace the contents with ascending `entries`, keeping allocations
    pub(crate) fn refill(&mut self, n: usize, entries: Vec<(usize, T)>) {
        self.values.clear();
        let keys = entries.iter().map(|(k, _)| *k).collect();
        self.values.extend(entries);
        self.index = SparseIndex::from_sorted(keys);
        self.n = n;
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of stored entries that are not null
    pub fn nnz(&self) -> usize {
        self.values.values().filter(|v| !v.is_null()).count()
    }

    /// Number of stored entries, including nulls awaiting eviction
    pub fn stored(&self) -> usize {
        self.values.len()
    }

    fn check(&self, i: usize) -> SparseResult<()> {
        if i >= self.n {
            return Err(SparseError::index_out_of_bounds(vec![i], vec![self.n]));
        }
        Ok(())
    }

    /// Value stored at `key`, created as zero if absent
    pub(crate) fn slot(&mut self, key: usize) -> &mut T {
        match self.values.entry(key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.index.insert(key);
                e.insert(T::zero())
            }
        }
    }

    /// Stored keys in `[lo, hi)`, ascending
    pub(crate) fn stored_keys(&mut self, lo: usize, hi: usize) -> Vec<usize> {
        let a = self.index.find(lo);
        let b = self.index.find(hi);
        self.index.keys()[a..b].to_vec()
    }

    /// Move the stored entry at each `from` key to its `to` key
    ///
    /// Keys in `moves` that are not stored are skipped. The index is sorted
    /// at most once, however many entries move.
    pub(crate) fn rekey(&mut self, moves: &[(usize, usize)]) {
        let positions: Vec<usize> = moves
            .iter()
            .filter_map(|&(from, _)| self.index.position(from))
            .collect();
        for p in positions {
            self.index.revoke(p);
        }
        let taken: Vec<(usize, T)> = moves
            .iter()
            .filter_map(|&(from, to)| self.values.remove(&from).map(|v| (to, v)))
            .collect();
        for (to, v) in taken {
            match self.values.entry(to) {
                Entry::Occupied(mut e) => {
                    e.insert(v);
                }
                Entry::Vacant(e) => {
                    self.index.insert(to);
                    e.insert(v);
                }
            }
        }
    }

    /// Mutable access to element `i`, storing a zero first if absent
    ///
    /// # Errors
    ///
    /// Returns error if `i >= dim()`.
    pub fn at(&mut self, i: usize) -> SparseResult<&mut T> {
        self.check(i)?;
        Ok(self.slot(i))
    }

    /// Element `i`, or the shared zero if it is not stored
    ///
    /// Never modifies the vector.
    pub fn const_at(&self, i: usize) -> SparseResult<&T> {
        self.check(i)?;
        Ok(self.values.get(&i).unwrap_or(&self.zero))
    }

    /// Numeric value of element `i`
    pub fn value_at(&self, i: usize) -> SparseResult<f64> {
        Ok(self.const_at(i)?.value())
    }

    /// Stored element `i`, if any
    pub fn get(&self, i: usize) -> Option<&T> {
        self.values.get(&i)
    }

    /// Copy `other` into this vector
    ///
    /// # Errors
    ///
    /// Returns error if the dimensions differ.
    pub fn set(&mut self, other: &SparseVector<T>) -> SparseResult<()> {
        let mut it = self.joint_iter(other)?;
        while it.ok() {
            if let Some((x, y)) = it.entry() {
                x.set(y);
            }
            it.advance();
        }
        Ok(())
    }

    /// Reset every stored element to zero
    pub fn reset(&mut self) {
        self.values.values_mut().for_each(|v| v.reset());
    }

    /// Evict all null entries
    pub fn compact(&mut self) {
        let mut it = self.iter();
        while it.ok() {
            it.advance();
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.values.clear();
        self.index.clear();
    }

    /// Copy of elements `[from, to)`
    ///
    /// # Errors
    ///
    /// Returns error if `from > to` or `to > dim()`.
    pub fn slice(&self, from: usize, to: usize) -> SparseResult<Self> {
        if from > to || to > self.n {
            return Err(IndexError::InvalidSlice {
                from,
                to,
                len: self.n,
            }
            .into());
        }
        let entries: Vec<(usize, T)> = self
            .const_iter_from(from)
            .take_while(|(k, _)| *k < to)
            .map(|(k, v)| (k - from, v.clone()))
            .collect();

        let mut out = Self::zeros(to - from);
        out.refill(to - from, entries);
        Ok(out)
    }

    /// Concatenation of this vector and `other`
    pub fn append(&self, other: &SparseVector<T>) -> Self {
        let mut out = self.clone();
        out.n = self.n + other.n;
        for (k, v) in other.const_iter() {
            out.slot(self.n + k).set(v);
        }
        out
    }

    /// Concatenation of this vector and `scalars`
    pub fn append_scalars(&self, scalars: &[T]) -> Self {
        let mut out = self.clone();
        out.n = self.n + scalars.len();
        for (k, v) in scalars.iter().enumerate().filter(|(_, v)| !v.is_null()) {
            out.slot(self.n + k).set(v);
        }
        out
    }

    /// Move element `i` to position `pi[i]`
    ///
    /// # Errors
    ///
    /// Returns error if `pi` is not a permutation of `[0, dim())`.
    pub fn permute(&mut self, pi: &[usize]) -> SparseResult<()> {
        validate_permutation(pi, self.n)?;
        let n = self.n;
        let values: HashMap<usize, T> = self.values.drain().map(|(k, v)| (pi[k], v)).collect();
        debug!(n, stored = values.len(), "sparse vector permutation");
        *self = Self::from_map(values, n);
        Ok(())
    }

    /// Sort by value
    ///
    /// Ascending order places the negative values at the start and the
    /// positive values at the end, with the implicit zeros in between;
    /// `reverse` mirrors this.
    pub fn sort(&mut self, reverse: bool) {
        self.compact();
        let mut live: Vec<T> = self.values.drain().map(|(_, v)| v).collect();
        live.sort_by(|a, b| a.value().total_cmp(&b.value()));
        if reverse {
            live.reverse();
        }

        // one split keeps the placement consistent with `total_cmp`, NaN included
        let split = if reverse {
            live.partition_point(|v| v.value().total_cmp(&0.0).is_gt())
        } else {
            live.partition_point(|v| v.value().total_cmp(&0.0).is_le())
        };
        let gap = self.n - live.len();
        let entries = live
            .into_iter()
            .enumerate()
            .map(|(i, v)| if i < split { (i, v) } else { (i + gap, v) })
            .collect();
        self.refill(self.n, entries);
    }

    /// Reverse the element order: position `i` moves to `n - i - 1`
    pub fn reverse_order(&mut self) {
        let n = self.n;
        let values = self.values.drain().map(|(k, v)| (n - k - 1, v)).collect();
        *self = Self::from_map(values, n);
    }

    /// Exchange elements `i` and `j`
    pub fn swap(&mut self, i: usize, j: usize) -> SparseResult<()> {
        self.check(i)?;
        self.check(j)?;
        if i == j {
            return Ok(());
        }
        let a = self.values.remove(&i);
        let b = self.values.remove(&j);
        if let Some(a) = a {
            self.values.insert(j, a);
        }
        if let Some(b) = b {
            self.values.insert(i, b);
        }
        self.index.swap(i, j);
        Ok(())
    }

    /// Reshape into a `rows x cols` matrix sharing no storage with `self`
    ///
    /// # Errors
    ///
    /// Returns error if `rows * cols != dim()`.
    pub fn into_matrix(self, rows: usize, cols: usize) -> SparseResult<SparseMatrix<T>> {
        SparseMatrix::from_vector(self, rows, cols)
    }

    /// Dense copy
    pub fn to_dense(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.n];
        for (k, v) in self.const_iter() {
            out[k].set(v);
        }
        out
    }

    /// Evicting cursor over all live entries
    pub fn iter(&mut self) -> VectorIter<'_, T> {
        SparseIter::new(self, Linear, 0)
    }

    /// Evicting cursor starting at the first live entry `>= k`
    pub fn iter_from(&mut self, k: usize) -> VectorIter<'_, T> {
        SparseIter::new(self, Linear, k)
    }

    /// Read-only cursor over all live entries
    pub fn const_iter(&self) -> VectorConstIter<'_, T> {
        ConstIter::new(self, Linear, 0)
    }

    /// Read-only cursor starting at the first live entry `>= k`
    pub fn const_iter_from(&self, k: usize) -> VectorConstIter<'_, T> {
        ConstIter::new(self, Linear, k)
    }

    fn check_dim(&self, n: usize) -> SparseResult<()> {
        if self.n != n {
            return Err(SparseError::vector_mismatch(self.n, n));
        }
        Ok(())
    }

    /// Merge with `other`; this vector is the writable operand
    ///
    /// # Errors
    ///
    /// Returns error if the dimensions differ.
    pub fn joint_iter<'a, U: Scalar>(
        &'a mut self,
        other: &'a SparseVector<U>,
    ) -> SparseResult<JointIter2<VectorIter<'a, T>, VectorConstIter<'a, U>>> {
        self.check_dim(other.n)?;
        Ok(JointIter2::new(self.iter(), other.const_iter()))
    }

    /// Merge with `other`, evicting nulls from both operands
    pub fn joint_iter_mut<'a, U: Scalar>(
        &'a mut self,
        other: &'a mut SparseVector<U>,
    ) -> SparseResult<JointIter2<VectorIter<'a, T>, VectorIter<'a, U>>> {
        self.check_dim(other.n)?;
        Ok(JointIter2::new(self.iter(), other.iter()))
    }

    /// Three-way merge; this vector is the writable operand
    pub fn joint_iter3<'a, U: Scalar, W: Scalar>(
        &'a mut self,
        b: &'a SparseVector<U>,
        c: &'a SparseVector<W>,
    ) -> SparseResult<JointIter3<VectorIter<'a, T>, VectorConstIter<'a, U>, VectorConstIter<'a, W>>>
    {
        self.check_dim(b.n)?;
        self.check_dim(c.n)?;
        Ok(JointIter3::new(self.iter(), b.const_iter(), c.const_iter()))
    }

    /// Apply `f` to every stored element
    pub fn map<F>(&mut self, f: F)
    where
        F: FnMut(&mut T),
    {
        self.values.values_mut().for_each(f);
    }

    /// Replace every stored element `x` with `f(x)`
    pub fn map_set<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        for v in self.values.values_mut() {
            let y = f(v);
            v.set(&y);
        }
    }

    /// Fold the live elements in ascending position order
    pub fn reduce<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.const_iter().fold(init, |acc, (_, v)| f(acc, v))
    }

    /// Positions of the live elements, ascending
    pub fn indices(&self) -> Vec<usize> {
        self.const_iter().map(|(k, _)| k).collect()
    }

    /// Copies of the live elements with their positions, ascending
    pub fn entries(&self) -> Vec<(usize, T)> {
        self.const_iter().map(|(k, v)| (k, v.clone())).collect()
    }
}

impl<F: Float + fmt::Debug> SparseVector<Real<F>> {
    /// Seed every stored element `k` as variable `k` out of `dim()`
    ///
    /// Null entries that are still stored are seeded too.
    ///
    /// # Errors
    ///
    /// Returns error if `order > 2`.
    pub fn variables(&mut self, order: usize) -> SparseResult<()> {
        let n = self.n;
        for (&k, v) in self.values.iter_mut() {
            v.set_variable(k, n, order)?;
        }
        debug!(n, stored = self.values.len(), order, "seeded sparse vector variables");
        Ok(())
    }

    /// Zero the derivative state of every stored element, keeping the values
    pub fn reset_derivatives(&mut self) {
        self.values.values_mut().for_each(|v| v.reset_derivatives());
    }
}

impl<T: Scalar> From<Vec<T>> for SparseVector<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_dense(values)
    }
}

impl<T: Scalar> FromIterator<T> for SparseVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_dense(iter.into_iter().collect())
    }
}

impl<T: Scalar + PartialEq> PartialEq for SparseVector<T> {
    /// Equal dimension and equal live entries
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.const_iter().eq(other.const_iter())
    }
}

impl<T: Scalar> fmt::Display for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[", self.n)?;
        let mut it = self.const_iter();
        let mut first = true;
        while it.ok() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            if let (Some(k), Some(v)) = (it.index(), it.get()) {
                write!(f, "{}:{}", k, v.value())?;
            }
            it.advance();
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeMismatchError;
    use difflin_core::{PermutationError, Real64, ScalarError};

    #[test]
    fn test_new_drops_nulls() {
        let v = SparseVector::new(&[0, 2, 4], vec![1.0, 0.0, 3.0], 5).unwrap();
        assert_eq!(v.stored(), 2);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.indices(), vec![0, 4]);
    }

    #[test]
    fn test_new_errors() {
        assert!(matches!(
            SparseVector::new(&[0, 1], vec![1.0], 3),
            Err(SparseError::Validation(ValidationError::LengthMismatch { .. }))
        ));
        assert!(matches!(
            SparseVector::new(&[3], vec![1.0], 3),
            Err(SparseError::Index(IndexError::OutOfBounds { .. }))
        ));
        // duplicates are rejected even when the first occurrence is null
        assert_eq!(
            SparseVector::new(&[1, 1], vec![0.0, 2.0], 3),
            Err(SparseError::duplicate_index(vec![1], 1))
        );
    }

    #[test]
    fn test_const_at_does_not_store() {
        let v = SparseVector::new(&[0, 2, 4], vec![1.0, 0.0, 3.0], 5).unwrap();
        assert_eq!(*v.const_at(1).unwrap(), 0.0);
        assert_eq!(*v.const_at(2).unwrap(), 0.0);
        assert_eq!(v.stored(), 2);
        assert!(v.const_at(5).is_err());
    }

    #[test]
    fn test_at_auto_vivifies() {
        let mut v = SparseVector::<i32>::zeros(4);
        *v.at(3).unwrap() = 5;
        assert_eq!(v.stored(), 1);
        assert_eq!(v.get(3), Some(&5));
        assert!(v.at(4).is_err());
    }

    #[test]
    fn test_lazy_eviction() {
        let mut v = SparseVector::new(&[1, 2], vec![1.0, 2.0], 3).unwrap();
        *v.at(1).unwrap() = 0.0;
        assert_eq!(v.stored(), 2);
        assert_eq!(v.nnz(), 1);

        v.compact();
        assert_eq!(v.stored(), 1);
        assert_eq!(v.get(1), None);
    }

    #[test]
    fn test_set_merges() {
        let mut a = SparseVector::new(&[0, 1], vec![1.0, 2.0], 4).unwrap();
        let b = SparseVector::new(&[1, 3], vec![5.0, 6.0], 4).unwrap();
        a.set(&b).unwrap();
        a.compact();
        assert_eq!(a, b);

        let c = SparseVector::<f64>::zeros(5);
        assert!(matches!(
            a.set(&c),
            Err(SparseError::ShapeMismatch(ShapeMismatchError::Vector {
                expected: 4,
                got: 5
            }))
        ));
    }

    #[test]
    fn test_reset_keeps_dimension() {
        let mut v = SparseVector::new(&[0, 1], vec![1.0, 2.0], 2).unwrap();
        v.reset();
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.dim(), 2);
        v.compact();
        assert_eq!(v.stored(), 0);
    }

    #[test]
    fn test_slice_is_a_copy() {
        let v = SparseVector::new(&[1, 3, 5], vec![1.0, 3.0, 5.0], 6).unwrap();
        let mut s = v.slice(2, 6).unwrap();
        assert_eq!(s.dim(), 4);
        assert_eq!(s.entries(), vec![(1, 3.0), (3, 5.0)]);

        *s.at(1).unwrap() = 9.0;
        assert_eq!(v.value_at(3).unwrap(), 3.0);

        assert!(v.slice(4, 2).is_err());
        assert!(v.slice(0, 7).is_err());
    }

    #[test]
    fn test_append() {
        let a = SparseVector::new(&[0], vec![1.0], 2).unwrap();
        let b = SparseVector::new(&[1], vec![2.0], 3).unwrap();
        let c = a.append(&b);
        assert_eq!(c.dim(), 5);
        assert_eq!(c.entries(), vec![(0, 1.0), (3, 2.0)]);

        let d = a.append_scalars(&[0.0, 4.0]);
        assert_eq!(d.dim(), 4);
        assert_eq!(d.entries(), vec![(0, 1.0), (3, 4.0)]);
    }

    #[test]
    fn test_permute() {
        let mut v = SparseVector::new(&[0, 2], vec![1.0, 3.0], 3).unwrap();
        v.permute(&[2, 0, 1]).unwrap();
        assert_eq!(v.entries(), vec![(1, 3.0), (2, 1.0)]);

        assert!(matches!(
            v.permute(&[0, 1]),
            Err(SparseError::Permutation(PermutationError::LengthMismatch { .. }))
        ));
        assert!(matches!(
            v.permute(&[0, 0, 1]),
            Err(SparseError::Permutation(PermutationError::Duplicate { value: 0 }))
        ));
        // failed permutations leave the vector untouched
        assert_eq!(v.entries(), vec![(1, 3.0), (2, 1.0)]);
    }

    #[test]
    fn test_sort_places_signs() {
        let mut v = SparseVector::new(&[0, 1, 3, 5], vec![3.0, -1.0, -4.0, 2.0], 7).unwrap();
        v.sort(false);
        assert_eq!(
            v.to_dense(),
            vec![-4.0, -1.0, 0.0, 0.0, 0.0, 2.0, 3.0]
        );

        v.sort(true);
        assert_eq!(
            v.to_dense(),
            vec![3.0, 2.0, 0.0, 0.0, 0.0, -1.0, -4.0]
        );
    }

    #[test]
    fn test_sort_keeps_nan_entries() {
        let mut v = SparseVector::new(&[0, 1, 2, 3], vec![1.0, 2.0, 3.0, f64::NAN], 5).unwrap();
        v.sort(false);
        assert_eq!(v.stored(), 4);
        assert_eq!(v.indices(), vec![1, 2, 3, 4]);
        assert_eq!(v.value_at(3).unwrap(), 3.0);
        assert!(v.value_at(4).unwrap().is_nan());

        v.sort(true);
        assert_eq!(v.stored(), 4);
        assert_eq!(v.indices(), vec![0, 1, 2, 3]);
        assert!(v.value_at(0).unwrap().is_nan());
        assert_eq!(v.value_at(1).unwrap(), 3.0);
        assert_eq!(v.value_at(3).unwrap(), 1.0);

        let mut w = SparseVector::new(&[0, 2, 4], vec![-f64::NAN, 5.0, -2.0], 6).unwrap();
        w.sort(false);
        assert_eq!(w.indices(), vec![0, 1, 5]);
        assert!(w.value_at(0).unwrap().is_nan());
        assert_eq!(w.value_at(1).unwrap(), -2.0);
        assert_eq!(w.value_at(5).unwrap(), 5.0);
    }

    #[test]
    fn test_rekey_moves_entries() {
        let mut v = SparseVector::new(&[0, 1, 4], vec![1.0, 2.0, 5.0], 6).unwrap();
        *v.at(2).unwrap() = 0.0;
        assert_eq!(v.stored_keys(1, 5), vec![1, 2, 4]);

        v.rekey(&[(1, 4), (4, 1), (2, 5), (3, 0)]);
        assert_eq!(v.stored(), 4);
        assert_eq!(v.entries(), vec![(0, 1.0), (1, 5.0), (4, 2.0)]);
        assert_eq!(v.get(5), Some(&0.0));

        v.compact();
        assert!(v.index.is_sorted());
        assert_eq!(v.index.keys(), &[0, 1, 4]);
    }

    #[test]
    fn test_reverse_order() {
        let mut v = SparseVector::new(&[0, 3], vec![1.0, 4.0], 5).unwrap();
        v.reverse_order();
        assert_eq!(v.entries(), vec![(1, 4.0), (4, 1.0)]);
    }

    #[test]
    fn test_swap() {
        let mut v = SparseVector::new(&[0, 1], vec![1.0, 2.0], 4).unwrap();
        v.swap(0, 3).unwrap();
        assert_eq!(v.entries(), vec![(1, 2.0), (3, 1.0)]);
        v.swap(1, 3).unwrap();
        assert_eq!(v.entries(), vec![(1, 1.0), (3, 2.0)]);
        assert!(v.swap(0, 4).is_err());
    }

    #[test]
    fn test_into_matrix() {
        let v = SparseVector::new(&[1, 5], vec![1.0, 2.0], 6).unwrap();
        let m = v.clone().into_matrix(2, 3).unwrap();
        assert_eq!(m.value_at(1, 2).unwrap(), 2.0);
        assert!(matches!(
            v.into_matrix(4, 2),
            Err(SparseError::ShapeMismatch(ShapeMismatchError::Reshape { .. }))
        ));
    }

    #[test]
    fn test_map_and_reduce() {
        let mut v = SparseVector::new(&[0, 2], vec![1i64, 3], 3).unwrap();
        v.map(|x| *x *= 2);
        v.map_set(|x| x + 1);
        assert_eq!(v.reduce(0, |acc, x| acc + x), 3 + 7);
    }

    #[test]
    fn test_real_entries_with_gradient_are_kept() {
        let mut v = SparseVector::<Real64>::zeros(3);
        let mut x = Real64::variable(0.0, 1, 2, 1).unwrap();
        v.at(0).unwrap().set(&x);
        x.reset();
        v.at(2).unwrap().set(&x);

        v.compact();
        // zero value with non-zero gradient is not null
        assert_eq!(v.indices(), vec![0]);
    }

    #[test]
    fn test_variables_seed_stored_elements() {
        let mut v = SparseVector::new(
            &[1, 3],
            vec![Real64::new(2.0), Real64::new(5.0)],
            4,
        )
        .unwrap();
        v.variables(2).unwrap();

        let x1 = v.get(1).unwrap();
        assert_eq!(x1.num_variables(), 4);
        assert_eq!(x1.order(), 2);
        assert_eq!(x1.gradient(), &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(v.get(3).unwrap().gradient(), &[0.0, 0.0, 0.0, 1.0]);
        assert_eq!(v.get(3).unwrap().primal(), 5.0);
        // unstored positions stay implicit zeros
        assert_eq!(v.stored(), 2);

        assert_eq!(
            v.variables(3),
            Err(SparseError::Scalar(ScalarError::UnsupportedOrder(3)))
        );
    }

    #[test]
    fn test_variables_revive_stored_zero() {
        let mut v = SparseVector::<Real64>::zeros(3);
        v.at(2).unwrap();
        v.variables(1).unwrap();
        v.compact();
        assert_eq!(v.indices(), vec![2]);
        assert_eq!(v.get(2).unwrap().derivative(2), 1.0);
    }

    #[test]
    fn test_reset_derivatives_keeps_values() {
        let mut v = SparseVector::new(
            &[0, 2],
            vec![Real64::new(1.0), Real64::new(0.0)],
            3,
        )
        .unwrap();
        assert_eq!(v.stored(), 1);
        *v.at(2).unwrap() = Real64::variable(0.0, 2, 3, 1).unwrap();
        v.variables(1).unwrap();
        v.reset_derivatives();

        assert_eq!(v.get(0).unwrap().primal(), 1.0);
        assert_eq!(v.get(0).unwrap().gradient(), &[0.0, 0.0, 0.0]);
        assert!(v.get(2).unwrap().is_null());
        v.compact();
        assert_eq!(v.indices(), vec![0]);
    }

    #[test]
    fn test_display() {
        let v = SparseVector::new(&[1, 3], vec![2, -5], 4).unwrap();
        assert_eq!(v.to_string(), "4:[1:2, 3:-5]");
        assert_eq!(SparseVector::<f64>::zeros(2).to_string(), "2:[]");
    }
}
