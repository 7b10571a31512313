//! Sparse matrices as windows onto a flat sparse vector
//!
//! A [`SparseMatrix`] stores its entries in a [`SparseVector`] of dimension
//! `row_max * col_max`, shared through `Rc<RefCell<_>>`, and looks at it
//! through a [`Window`]. Element `(i, j)` of the window lives at key
//! `(row_offset + i) * col_max + (col_offset + j)`.
//!
//! - [`SparseMatrix::slice`] shares the backing vector and only narrows the
//!   window, O(1).
//! - [`SparseMatrix::t`] writes every live entry to its transposed key in a
//!   new backing vector, O(nnz). Iteration order of the result is then
//!   plain row-major again.
//! - [`SparseMatrix::tip`] does the same re-homing inside the existing
//!   backing vector.
//!
//! # Examples
//!
//! ```
//! use difflin_sparse::SparseMatrix;
//!
//! let m = SparseMatrix::new(&[0, 1], &[2, 0], vec![1.0, 2.0], 2, 3).unwrap();
//! let t = m.t();
//! assert_eq!(t.dims(), (3, 2));
//! assert_eq!(t.value_at(2, 0).unwrap(), 1.0);
//! assert_eq!(t.value_at(0, 1).unwrap(), 2.0);
//! ```

use crate::error::{ShapeMismatchError, SparseError, SparseResult, ValidationError};
use crate::iterators::{ConstIter, Cursor, CursorMut, JointIter2, JointIter3, KeyMap, SparseIter};
use crate::vector::SparseVector;
use difflin_core::permutation::{transpositions, validate_permutation};
use difflin_core::{DenseMatrix, Real, Scalar};
use scirs2_core::numeric::Float;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Rectangular view onto a `row_max x col_max` row-major key space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub rows: usize,
    pub cols: usize,
    pub row_offset: usize,
    pub row_max: usize,
    pub col_offset: usize,
    pub col_max: usize,
}

impl Window {
    /// Window covering a whole `rows x cols` key space
    pub fn full(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_offset: 0,
            row_max: rows,
            col_offset: 0,
            col_max: cols,
        }
    }

    pub fn is_full(&self) -> bool {
        self.row_offset == 0
            && self.col_offset == 0
            && self.rows == self.row_max
            && self.cols == self.col_max
    }

    /// Same key space seen with rows and columns exchanged
    fn transposed(&self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
            row_offset: self.col_offset,
            row_max: self.col_max,
            col_offset: self.row_offset,
            col_max: self.row_max,
        }
    }

    /// Key of `key` after transposing the whole key space
    #[inline]
    fn transpose_key(&self, key: usize) -> usize {
        let (ai, aj) = (key / self.col_max, key % self.col_max);
        aj * self.row_max + ai
    }
}

impl KeyMap for Window {
    type Index = (usize, usize);

    fn map(&self, key: usize) -> Option<(usize, usize)> {
        if self.col_max == 0 {
            return None;
        }
        let (ai, aj) = (key / self.col_max, key % self.col_max);
        let i = ai.checked_sub(self.row_offset)?;
        let j = aj.checked_sub(self.col_offset)?;
        (i < self.rows && j < self.cols).then_some((i, j))
    }

    #[inline]
    fn key(&self, (i, j): (usize, usize)) -> usize {
        (self.row_offset + i) * self.col_max + (self.col_offset + j)
    }

    fn range(&self) -> (usize, usize) {
        if self.rows == 0 || self.cols == 0 {
            return (0, 0);
        }
        (
            self.key((0, 0)),
            self.key((self.rows - 1, self.cols - 1)) + 1,
        )
    }
}

/// Evicting cursor over a matrix view
pub type MatrixIter<'a, T> = SparseIter<T, RefMut<'a, SparseVector<T>>, Window>;

/// Read-only cursor over a matrix view
pub type MatrixConstIter<'a, T> = ConstIter<T, Ref<'a, SparseVector<T>>, Window>;

/// Sparse matrix view
pub struct SparseMatrix<T> {
    values: Rc<RefCell<SparseVector<T>>>,
    window: Window,
    /// Holds the last row returned by [`SparseMatrix::row`]
    scratch_rows: SparseVector<T>,
    /// Holds the last column returned by [`SparseMatrix::col`]
    scratch_cols: SparseVector<T>,
}

impl<T: Scalar> SparseMatrix<T> {
    /// Create a matrix from a coordinate list
    ///
    /// Null values are dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the three lists differ in length, if a coordinate is
    /// outside `rows x cols`, or if a coordinate appears twice.
    pub fn new(
        row_indices: &[usize],
        col_indices: &[usize],
        values: Vec<T>,
        rows: usize,
        cols: usize,
    ) -> SparseResult<Self> {
        if row_indices.len() != col_indices.len() {
            return Err(ValidationError::CoordinateMismatch {
                rows: row_indices.len(),
                cols: col_indices.len(),
            }
            .into());
        }
        if row_indices.len() != values.len() {
            return Err(ValidationError::LengthMismatch {
                indices: row_indices.len(),
                values: values.len(),
            }
            .into());
        }

        let window = Window::full(rows, cols);
        let mut seen = HashSet::with_capacity(values.len());
        let mut map = HashMap::with_capacity(values.len());
        for (position, ((&i, &j), value)) in row_indices
            .iter()
            .zip(col_indices)
            .zip(values)
            .enumerate()
        {
            if i >= rows || j >= cols {
                return Err(SparseError::index_out_of_bounds(
                    vec![i, j],
                    vec![rows, cols],
                ));
            }
            let key = window.key((i, j));
            if !seen.insert(key) {
                return Err(SparseError::duplicate_index(vec![i, j], position));
            }
            if !value.is_null() {
                map.insert(key, value);
            }
        }

        Ok(Self::from_backing(
            SparseVector::from_map(map, rows * cols),
            window,
        ))
    }

    /// `rows x cols` matrix with nothing stored
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_backing(SparseVector::zeros(rows * cols), Window::full(rows, cols))
    }

    /// Reshape a vector of dimension `rows * cols` (row-major)
    ///
    /// # Errors
    ///
    /// Returns error if `rows * cols != v.dim()`.
    pub fn from_vector(v: SparseVector<T>, rows: usize, cols: usize) -> SparseResult<Self> {
        if rows * cols != v.dim() {
            return Err(ShapeMismatchError::Reshape {
                n: v.dim(),
                rows,
                cols,
            }
            .into());
        }
        Ok(Self::from_backing(v, Window::full(rows, cols)))
    }

    /// Sparse copy of a dense matrix, dropping nulls
    pub fn from_dense(dense: &DenseMatrix<T>) -> Self {
        let (rows, cols) = dense.dims();
        let map = dense
            .to_vec()
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .collect();
        Self::from_backing(
            SparseVector::from_map(map, rows * cols),
            Window::full(rows, cols),
        )
    }

    fn from_backing(values: SparseVector<T>, window: Window) -> Self {
        Self {
            values: Rc::new(RefCell::new(values)),
            window,
            scratch_rows: SparseVector::zeros(window.cols),
            scratch_cols: SparseVector::zeros(window.rows),
        }
    }

    /// Dense copy of this view
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let values = self.values.borrow();
        DenseMatrix::from_fn(self.window.rows, self.window.cols, |i, j| {
            values
                .get(self.window.key((i, j)))
                .cloned()
                .unwrap_or_else(T::zero)
        })
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.window.rows, self.window.cols)
    }

    pub fn rows(&self) -> usize {
        self.window.rows
    }

    pub fn cols(&self) -> usize {
        self.window.cols
    }

    /// The view's window onto its backing vector
    pub fn window(&self) -> Window {
        self.window
    }

    /// Whether `other` is a view onto the same backing vector
    pub fn shares_storage<U>(&self, other: &SparseMatrix<U>) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.values) as *const (),
            Rc::as_ptr(&other.values) as *const (),
        )
    }

    /// Number of non-null entries inside the view
    pub fn nnz(&self) -> usize {
        let mut it = self.const_iter();
        let mut count = 0;
        while it.ok() {
            count += 1;
            it.advance();
        }
        count
    }

    fn check(&self, i: usize, j: usize) -> SparseResult<usize> {
        if i >= self.window.rows || j >= self.window.cols {
            return Err(SparseError::index_out_of_bounds(
                vec![i, j],
                vec![self.window.rows, self.window.cols],
            ));
        }
        Ok(self.window.key((i, j)))
    }

    fn check_square(&self) -> SparseResult<()> {
        if self.window.rows != self.window.cols {
            return Err(SparseError::NotSquare {
                rows: self.window.rows,
                cols: self.window.cols,
            });
        }
        Ok(())
    }

    /// Mutable access to element `(i, j)`, storing a zero first if absent
    ///
    /// # Errors
    ///
    /// Returns error if `(i, j)` is outside the view.
    pub fn at(&mut self, i: usize, j: usize) -> SparseResult<RefMut<'_, T>> {
        let key = self.check(i, j)?;
        Ok(RefMut::map(self.values.borrow_mut(), |v| v.slot(key)))
    }

    /// Element `(i, j)`, or zero if it is not stored; never modifies the matrix
    pub fn const_at(&self, i: usize, j: usize) -> SparseResult<Ref<'_, T>> {
        let key = self.check(i, j)?;
        Ok(Ref::map(self.values.borrow(), |v| {
            v.values.get(&key).unwrap_or(&v.zero)
        }))
    }

    /// Numeric value of element `(i, j)`
    pub fn value_at(&self, i: usize, j: usize) -> SparseResult<f64> {
        Ok(self.const_at(i, j)?.value())
    }

    /// Copy `value` into element `(i, j)`
    pub fn set_at(&mut self, i: usize, j: usize, value: &T) -> SparseResult<()> {
        self.at(i, j)?.set(value);
        Ok(())
    }

    /// View onto rows `[r0, r1)` and columns `[c0, c1)`, sharing storage
    ///
    /// # Errors
    ///
    /// Returns error if either range is reversed or exceeds the view.
    pub fn slice(&self, r0: usize, r1: usize, c0: usize, c1: usize) -> SparseResult<Self> {
        if r0 > r1 || r1 > self.window.rows {
            return Err(SparseError::invalid_slice(r0, r1, self.window.rows));
        }
        if c0 > c1 || c1 > self.window.cols {
            return Err(SparseError::invalid_slice(c0, c1, self.window.cols));
        }
        let window = Window {
            rows: r1 - r0,
            cols: c1 - c0,
            row_offset: self.window.row_offset + r0,
            col_offset: self.window.col_offset + c0,
            ..self.window
        };
        Ok(Self {
            values: Rc::clone(&self.values),
            window,
            scratch_rows: SparseVector::zeros(window.cols),
            scratch_cols: SparseVector::zeros(window.rows),
        })
    }

    /// Transpose into a new backing vector
    ///
    /// The whole backing key space is transposed, so entries outside this
    /// view move along and the result keeps the transposed window.
    ///
    /// # Complexity
    ///
    /// O(nnz), one write per live entry
    pub fn t(&self) -> Self {
        let src = self.values.borrow();
        let map: HashMap<usize, T> = src
            .values
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(&k, v)| (self.window.transpose_key(k), v.clone()))
            .collect();
        debug!(
            nnz = map.len(),
            rows = self.window.cols,
            cols = self.window.rows,
            "sparse transpose"
        );

        let backing = SparseVector::from_map(map, src.dim());
        Self {
            values: Rc::new(RefCell::new(backing)),
            window: self.window.transposed(),
            scratch_rows: SparseVector::zeros(self.window.rows),
            scratch_cols: SparseVector::zeros(self.window.cols),
        }
    }

    /// Transpose in place
    ///
    /// # Errors
    ///
    /// Returns [`SparseError::NotContiguous`] for a sliced view and
    /// [`SparseError::SharedStorage`] while other views of the backing
    /// vector exist.
    ///
    /// # Complexity
    ///
    /// O(nnz)
    pub fn tip(&mut self) -> SparseResult<()> {
        if !self.window.is_full() {
            return Err(SparseError::NotContiguous);
        }
        if Rc::strong_count(&self.values) != 1 {
            return Err(SparseError::SharedStorage);
        }

        let window = self.window;
        {
            let mut backing = self.values.borrow_mut();
            let n = backing.dim();
            let map: HashMap<usize, T> = backing
                .values
                .drain()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (window.transpose_key(k), v))
                .collect();
            debug!(nnz = map.len(), "sparse in-place transpose");
            *backing = SparseVector::from_map(map, n);
        }

        self.window = window.transposed();
        std::mem::swap(&mut self.scratch_rows, &mut self.scratch_cols);
        Ok(())
    }

    fn row_entries(&self, i: usize) -> Vec<(usize, T)> {
        let mut entries = Vec::new();
        let mut it = ConstIter::new(
            self.values.borrow(),
            self.window,
            self.window.key((i, 0)),
        );
        while let (Some((r, j)), Some(v)) = (it.index(), it.get()) {
            if r != i {
                break;
            }
            entries.push((j, v.clone()));
            it.advance();
        }
        entries
    }

    fn col_entries(&self, j: usize) -> Vec<(usize, T)> {
        let values = self.values.borrow();
        (0..self.window.rows)
            .filter_map(|i| {
                values
                    .get(self.window.key((i, j)))
                    .filter(|v| !v.is_null())
                    .map(|v| (i, v.clone()))
            })
            .collect()
    }

    /// Row `i`, held in a scratch vector owned by this view
    ///
    /// The returned vector is overwritten by the next call.
    pub fn row(&mut self, i: usize) -> SparseResult<&SparseVector<T>> {
        if i >= self.window.rows {
            return Err(SparseError::index_out_of_bounds(
                vec![i, 0],
                vec![self.window.rows, self.window.cols],
            ));
        }
        let entries = self.row_entries(i);
        self.scratch_rows.refill(self.window.cols, entries);
        Ok(&self.scratch_rows)
    }

    /// Column `j`, held in a scratch vector owned by this view
    pub fn col(&mut self, j: usize) -> SparseResult<&SparseVector<T>> {
        if j >= self.window.cols {
            return Err(SparseError::index_out_of_bounds(
                vec![0, j],
                vec![self.window.rows, self.window.cols],
            ));
        }
        let entries = self.col_entries(j);
        self.scratch_cols.refill(self.window.rows, entries);
        Ok(&self.scratch_cols)
    }

    /// Owned copy of row `i`
    pub fn row_owned(&self, i: usize) -> SparseResult<SparseVector<T>> {
        if i >= self.window.rows {
            return Err(SparseError::index_out_of_bounds(
                vec![i, 0],
                vec![self.window.rows, self.window.cols],
            ));
        }
        let mut v = SparseVector::zeros(self.window.cols);
        v.refill(self.window.cols, self.row_entries(i));
        Ok(v)
    }

    /// Owned copy of column `j`
    pub fn col_owned(&self, j: usize) -> SparseResult<SparseVector<T>> {
        if j >= self.window.cols {
            return Err(SparseError::index_out_of_bounds(
                vec![0, j],
                vec![self.window.rows, self.window.cols],
            ));
        }
        let mut v = SparseVector::zeros(self.window.rows);
        v.refill(self.window.rows, self.col_entries(j));
        Ok(v)
    }

    /// Diagonal of a square matrix
    pub fn diag(&self) -> SparseResult<SparseVector<T>> {
        self.check_square()?;
        let values = self.values.borrow();
        let entries = (0..self.window.rows)
            .filter_map(|i| {
                values
                    .get(self.window.key((i, i)))
                    .filter(|v| !v.is_null())
                    .map(|v| (i, v.clone()))
            })
            .collect();
        let mut v = SparseVector::zeros(self.window.rows);
        v.refill(self.window.rows, entries);
        Ok(v)
    }

    /// Copy `other` into this view
    ///
    /// `other` may be a view onto the same backing vector.
    ///
    /// # Errors
    ///
    /// Returns error if the dimensions differ.
    pub fn set(&mut self, other: &SparseMatrix<T>) -> SparseResult<()> {
        if self.dims() != other.dims() {
            return Err(SparseError::matrix_mismatch(self.dims(), other.dims()));
        }
        if self.shares_storage(other) {
            if self.window == other.window {
                return Ok(());
            }
            let copy = other.clone();
            return self.set(&copy);
        }

        let mut it = self.joint_iter(other)?;
        while it.ok() {
            if let Some((x, y)) = it.entry() {
                x.set(y);
            }
            it.advance();
        }
        Ok(())
    }

    /// Reset every live element of the view
    pub fn reset(&mut self) {
        self.map(|x| x.reset());
    }

    /// Ones on the diagonal, zeros elsewhere
    pub fn set_identity(&mut self) {
        self.reset();
        let one = T::one();
        let mut values = self.values.borrow_mut();
        for i in 0..self.window.rows.min(self.window.cols) {
            values.slot(self.window.key((i, i))).set(&one);
        }
    }

    /// Exchange elements `(i1, j1)` and `(i2, j2)`
    pub fn swap(&mut self, i1: usize, j1: usize, i2: usize, j2: usize) -> SparseResult<()> {
        let a = self.check(i1, j1)?;
        let b = self.check(i2, j2)?;
        self.values.borrow_mut().swap(a, b)
    }

    /// Exchange rows `i1` and `i2`
    pub fn swap_rows(&mut self, i1: usize, i2: usize) -> SparseResult<()> {
        if self.window.cols == 0 {
            return Ok(());
        }
        self.check(i1, 0)?;
        self.check(i2, 0)?;
        if i1 == i2 {
            return Ok(());
        }
        let w = self.window;
        let mut values = self.values.borrow_mut();
        let mut moves = Vec::new();
        for (src, dst) in [(i1, i2), (i2, i1)] {
            // a row of the view is one contiguous run of backing keys
            let lo = w.key((src, 0));
            let hi = lo + w.cols;
            let to = w.key((dst, 0));
            moves.extend(
                values
                    .stored_keys(lo, hi)
                    .into_iter()
                    .map(|k| (k, to + (k - lo))),
            );
        }
        values.rekey(&moves);
        Ok(())
    }

    /// Exchange columns `j1` and `j2`
    pub fn swap_columns(&mut self, j1: usize, j2: usize) -> SparseResult<()> {
        if self.window.rows == 0 {
            return Ok(());
        }
        self.check(0, j1)?;
        self.check(0, j2)?;
        if j1 == j2 {
            return Ok(());
        }
        let w = self.window;
        let mut values = self.values.borrow_mut();
        let mut moves = Vec::new();
        for i in 0..w.rows {
            for (src, dst) in [(j1, j2), (j2, j1)] {
                let k = w.key((i, src));
                if values.get(k).is_some() {
                    moves.push((k, w.key((i, dst))));
                }
            }
        }
        values.rekey(&moves);
        Ok(())
    }

    /// Move row `i` to row `pi[i]`
    ///
    /// # Errors
    ///
    /// Returns error if `pi` is not a permutation of `[0, rows)`.
    pub fn permute_rows(&mut self, pi: &[usize]) -> SparseResult<()> {
        validate_permutation(pi, self.window.rows)?;
        let swaps = transpositions(pi);
        for &(a, b) in &swaps {
            self.swap_rows(a, b)?;
        }
        debug!(swaps = swaps.len(), "sparse row permutation");
        Ok(())
    }

    /// Move column `j` to column `pi[j]`
    pub fn permute_columns(&mut self, pi: &[usize]) -> SparseResult<()> {
        validate_permutation(pi, self.window.cols)?;
        let swaps = transpositions(pi);
        for &(a, b) in &swaps {
            self.swap_columns(a, b)?;
        }
        debug!(swaps = swaps.len(), "sparse column permutation");
        Ok(())
    }

    /// Apply `pi` to rows and columns of a square matrix
    ///
    /// Each transposition swaps the rows first, then the columns.
    pub fn symmetric_permutation(&mut self, pi: &[usize]) -> SparseResult<()> {
        self.check_square()?;
        validate_permutation(pi, self.window.rows)?;
        let swaps = transpositions(pi);
        for &(a, b) in &swaps {
            self.swap_rows(a, b)?;
            self.swap_columns(a, b)?;
        }
        debug!(swaps = swaps.len(), "sparse symmetric permutation");
        Ok(())
    }

    /// Evicting cursor over the live entries of the view, row-major
    pub fn iter(&mut self) -> MatrixIter<'_, T> {
        SparseIter::new(self.values.borrow_mut(), self.window, 0)
    }

    /// Evicting cursor starting at the first live entry at or after `(i, j)`
    pub fn iter_from(&mut self, i: usize, j: usize) -> MatrixIter<'_, T> {
        SparseIter::new(self.values.borrow_mut(), self.window, self.window.key((i, j)))
    }

    /// Read-only cursor over the live entries of the view, row-major
    pub fn const_iter(&self) -> MatrixConstIter<'_, T> {
        ConstIter::new(self.values.borrow(), self.window, 0)
    }

    fn check_joint<U: Scalar>(&self, other: &SparseMatrix<U>) -> SparseResult<()> {
        if self.dims() != other.dims() {
            return Err(SparseError::matrix_mismatch(self.dims(), other.dims()));
        }
        if self.shares_storage(other) {
            return Err(SparseError::AliasedOperands);
        }
        Ok(())
    }

    /// Merge with `other`; this matrix is the writable operand
    ///
    /// # Errors
    ///
    /// Returns error if the dimensions differ or both views share one
    /// backing vector.
    pub fn joint_iter<'a, U: Scalar>(
        &'a mut self,
        other: &'a SparseMatrix<U>,
    ) -> SparseResult<JointIter2<MatrixIter<'a, T>, MatrixConstIter<'a, U>>> {
        self.check_joint(other)?;
        Ok(JointIter2::new(self.iter(), other.const_iter()))
    }

    /// Three-way merge; this matrix is the writable operand
    pub fn joint_iter3<'a, U: Scalar, W: Scalar>(
        &'a mut self,
        b: &'a SparseMatrix<U>,
        c: &'a SparseMatrix<W>,
    ) -> SparseResult<JointIter3<MatrixIter<'a, T>, MatrixConstIter<'a, U>, MatrixConstIter<'a, W>>>
    {
        self.check_joint(b)?;
        self.check_joint(c)?;
        if b.shares_storage(c) {
            return Err(SparseError::AliasedOperands);
        }
        Ok(JointIter3::new(self.iter(), b.const_iter(), c.const_iter()))
    }

    /// Row-major flattening of the view
    pub fn as_vector(&self) -> SparseVector<T> {
        let cols = self.window.cols;
        let mut map = HashMap::new();
        let mut it = self.const_iter();
        while let (Some((i, j)), Some(v)) = (it.index(), it.get()) {
            map.insert(i * cols + j, v.clone());
            it.advance();
        }
        SparseVector::from_map(map, self.window.rows * cols)
    }

    /// Whether the matrix is square and `|a_ij - a_ji| <= epsilon` everywhere
    pub fn is_symmetric(&self, epsilon: f64) -> bool {
        if self.window.rows != self.window.cols {
            return false;
        }
        let values = self.values.borrow();
        let value = |i: usize, j: usize| {
            values
                .get(self.window.key((i, j)))
                .map_or(0.0, |v| v.value())
        };
        let mut it = ConstIter::new(Ref::clone(&values), self.window, 0);
        while let Some((i, j)) = it.index() {
            if (value(i, j) - value(j, i)).abs() > epsilon {
                return false;
            }
            it.advance();
        }
        true
    }

    /// Apply `f` to every live element of the view
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut it = self.iter();
        while it.ok() {
            if let Some(x) = it.get_mut() {
                f(x);
            }
            it.advance();
        }
    }

    /// Replace every live element `x` with `f(x)`
    pub fn map_set<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        self.map(|x| {
            let y = f(x);
            x.set(&y);
        });
    }

    /// Fold the live elements of the view in row-major order
    pub fn reduce<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        let mut acc = init;
        let mut it = self.const_iter();
        while let Some(v) = it.get() {
            acc = f(acc, v);
            it.advance();
        }
        acc
    }
}

impl<F: Float + fmt::Debug> SparseMatrix<Real<F>> {
    /// Seed every stored element `(i, j)` of the view as variable
    /// `i * cols + j` out of `rows * cols`
    ///
    /// # Errors
    ///
    /// Returns error if `order > 2`.
    pub fn variables(&mut self, order: usize) -> SparseResult<()> {
        let w = self.window;
        let n = w.rows * w.cols;
        let mut backing = self.values.borrow_mut();
        let mut seeded = 0usize;
        for (&k, v) in backing.values.iter_mut() {
            if let Some((i, j)) = w.map(k) {
                v.set_variable(i * w.cols + j, n, order)?;
                seeded += 1;
            }
        }
        debug!(n, seeded, order, "seeded sparse matrix variables");
        Ok(())
    }

    /// Zero the derivative state of every live element of the view
    pub fn reset_derivatives(&mut self) {
        self.map(|x| x.reset_derivatives());
    }
}

impl<T: Scalar> Clone for SparseMatrix<T> {
    /// Deep copy of the view into a fresh, unsliced backing vector
    fn clone(&self) -> Self {
        let (rows, cols) = self.dims();
        Self::from_backing(self.as_vector(), Window::full(rows, cols))
    }
}

impl<T: Scalar + PartialEq> PartialEq for SparseMatrix<T> {
    /// Equal dimensions and equal live entries
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims() && self.as_vector() == other.as_vector()
    }
}

impl<T: Scalar> fmt::Debug for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMatrix")
            .field("window", &self.window)
            .field("values", &self.as_vector())
            .finish()
    }
}

impl<T: Scalar> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.borrow();
        write!(f, "[")?;
        for i in 0..self.window.rows {
            if i != 0 {
                write!(f, ",\n ")?;
            }
            write!(f, "[")?;
            for j in 0..self.window.cols {
                if j != 0 {
                    write!(f, ", ")?;
                }
                let v = values
                    .get(self.window.key((i, j)))
                    .map_or(0.0, |v| v.value());
                write!(f, "{}", v)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
