//! Dense matrices with views and in-place transpose
//!
//! A [`DenseMatrix`] is a rectangular window onto a flat `row_max x col_max`
//! buffer shared through `Rc<RefCell<_>>`. Slicing and [`DenseMatrix::t`]
//! produce new windows onto the same buffer in O(1); writes through any
//! window are visible through all of them.
//!
//! # Memory Layout
//!
//! Storage is row-major. A transposed view reads element `(i, j)` at
//! `(col_offset + j) * row_max + (row_offset + i)`, so `t()` only toggles a
//! flag and swaps the row and column bookkeeping.
//!
//! [`DenseMatrix::tip`] instead moves the elements so that the buffer holds
//! the transpose, following permutation cycles with a one-bit-per-element
//! visited set.
//!
//! # Examples
//!
//! ```
//! use difflin_core::DenseMatrix;
//!
//! let mut m = DenseMatrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
//! let view = m.t();
//! assert_eq!(view.dims(), (3, 2));
//! assert_eq!(view.value_at(2, 0).unwrap(), 3.0);
//! drop(view);
//!
//! m.tip().unwrap();
//! assert_eq!(m.dims(), (3, 2));
//! assert_eq!(m.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
//! ```

use crate::error::{DenseError, DenseResult};
use crate::permutation::{transpositions, validate_permutation};
use crate::scalar::Scalar;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Dense matrix window over shared row-major storage
pub struct DenseMatrix<T> {
    values: Rc<RefCell<Vec<T>>>,
    rows: usize,
    cols: usize,
    row_offset: usize,
    row_max: usize,
    col_offset: usize,
    col_max: usize,
    transposed: bool,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Create a `rows x cols` matrix from row-major values
    ///
    /// # Errors
    ///
    /// Returns error if `values.len() != rows * cols`.
    pub fn new(values: Vec<T>, rows: usize, cols: usize) -> DenseResult<Self> {
        if values.len() != rows * cols {
            return Err(DenseError::LengthMismatch {
                rows,
                cols,
                expected: rows * cols,
                got: values.len(),
            });
        }
        Ok(Self::from_storage(values, rows, cols))
    }

    /// Matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_storage(vec![T::zero(); rows * cols], rows, cols)
    }

    /// Matrix with element `(i, j)` set to `f(i, j)`
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                values.push(f(i, j));
            }
        }
        Self::from_storage(values, rows, cols)
    }

    fn from_storage(values: Vec<T>, rows: usize, cols: usize) -> Self {
        Self {
            values: Rc::new(RefCell::new(values)),
            rows,
            cols,
            row_offset: 0,
            row_max: rows,
            col_offset: 0,
            col_max: cols,
            transposed: false,
        }
    }

    /// Dimensions `(rows, cols)` of this view
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether this view reads its storage column-major
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Whether this view covers its whole buffer
    pub fn is_contiguous(&self) -> bool {
        self.row_offset == 0
            && self.col_offset == 0
            && self.rows == self.row_max
            && self.cols == self.col_max
    }

    /// Whether `other` is a view onto the same buffer
    pub fn shares_storage(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        if self.transposed {
            (self.col_offset + j) * self.row_max + (self.row_offset + i)
        } else {
            (self.row_offset + i) * self.col_max + (self.col_offset + j)
        }
    }

    #[inline]
    fn check(&self, i: usize, j: usize) -> DenseResult<usize> {
        if i >= self.rows || j >= self.cols {
            return Err(DenseError::out_of_bounds(i, j, self.rows, self.cols));
        }
        Ok(self.offset(i, j))
    }

    fn check_square(&self) -> DenseResult<()> {
        if self.rows != self.cols {
            return Err(DenseError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Mutable access to element `(i, j)`
    ///
    /// # Errors
    ///
    /// Returns error if `(i, j)` is outside the view.
    pub fn at(&mut self, i: usize, j: usize) -> DenseResult<RefMut<'_, T>> {
        let k = self.check(i, j)?;
        Ok(RefMut::map(self.values.borrow_mut(), |v| &mut v[k]))
    }

    /// Read access to element `(i, j)`
    pub fn const_at(&self, i: usize, j: usize) -> DenseResult<Ref<'_, T>> {
        let k = self.check(i, j)?;
        Ok(Ref::map(self.values.borrow(), |v| &v[k]))
    }

    /// Numeric value of element `(i, j)`
    pub fn value_at(&self, i: usize, j: usize) -> DenseResult<f64> {
        Ok(self.const_at(i, j)?.value())
    }

    /// Copy `value` into element `(i, j)`
    pub fn set_at(&mut self, i: usize, j: usize, value: &T) -> DenseResult<()> {
        self.at(i, j)?.set(value);
        Ok(())
    }

    /// View onto rows `[r0, r1)` and columns `[c0, c1)`, sharing storage
    ///
    /// # Errors
    ///
    /// Returns error if either range is reversed or exceeds the view.
    pub fn slice(&self, r0: usize, r1: usize, c0: usize, c1: usize) -> DenseResult<Self> {
        if r0 > r1 || r1 > self.rows {
            return Err(DenseError::InvalidSlice {
                from: r0,
                to: r1,
                len: self.rows,
            });
        }
        if c0 > c1 || c1 > self.cols {
            return Err(DenseError::InvalidSlice {
                from: c0,
                to: c1,
                len: self.cols,
            });
        }
        Ok(Self {
            values: Rc::clone(&self.values),
            rows: r1 - r0,
            cols: c1 - c0,
            row_offset: self.row_offset + r0,
            row_max: self.row_max,
            col_offset: self.col_offset + c0,
            col_max: self.col_max,
            transposed: self.transposed,
        })
    }

    /// Transposed view sharing storage
    ///
    /// # Complexity
    ///
    /// O(1); no element is moved.
    pub fn t(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
            rows: self.cols,
            cols: self.rows,
            row_offset: self.col_offset,
            row_max: self.col_max,
            col_offset: self.row_offset,
            col_max: self.row_max,
            transposed: !self.transposed,
        }
    }

    /// Transpose in place
    ///
    /// Elements are moved within the buffer so that it holds the transpose;
    /// afterwards the view has dimensions `(cols, rows)`.
    ///
    /// # Errors
    ///
    /// Returns [`DenseError::NotContiguous`] for a sliced view and
    /// [`DenseError::SharedStorage`] while other views of the buffer exist.
    ///
    /// # Complexity
    ///
    /// O(rows * cols) time, `rows * cols` bits of extra memory.
    pub fn tip(&mut self) -> DenseResult<()> {
        if !self.is_contiguous() {
            return Err(DenseError::NotContiguous);
        }
        if Rc::strong_count(&self.values) != 1 {
            return Err(DenseError::SharedStorage);
        }

        // physical row count of the buffer
        let rows = if self.transposed {
            self.col_max
        } else {
            self.row_max
        };
        let cycles = transpose_in_place(&mut self.values.borrow_mut(), rows);

        std::mem::swap(&mut self.rows, &mut self.cols);
        std::mem::swap(&mut self.row_offset, &mut self.col_offset);
        std::mem::swap(&mut self.row_max, &mut self.col_max);

        debug!(
            rows = self.rows,
            cols = self.cols,
            cycles,
            "dense in-place transpose"
        );
        Ok(())
    }

    /// Copy of row `i`
    pub fn row(&self, i: usize) -> DenseResult<Vec<T>> {
        if i >= self.rows {
            return Err(DenseError::out_of_bounds(i, 0, self.rows, self.cols));
        }
        let values = self.values.borrow();
        Ok((0..self.cols)
            .map(|j| values[self.offset(i, j)].clone())
            .collect())
    }

    /// Copy of column `j`
    pub fn col(&self, j: usize) -> DenseResult<Vec<T>> {
        if j >= self.cols {
            return Err(DenseError::out_of_bounds(0, j, self.rows, self.cols));
        }
        let values = self.values.borrow();
        Ok((0..self.rows)
            .map(|i| values[self.offset(i, j)].clone())
            .collect())
    }

    /// Copy of the diagonal of a square matrix
    pub fn diag(&self) -> DenseResult<Vec<T>> {
        self.check_square()?;
        let values = self.values.borrow();
        Ok((0..self.rows)
            .map(|i| values[self.offset(i, i)].clone())
            .collect())
    }

    /// Row-major copy of the view
    pub fn to_vec(&self) -> Vec<T> {
        let values = self.values.borrow();
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.push(values[self.offset(i, j)].clone());
            }
        }
        out
    }

    /// Copy all elements of `other` into this view
    ///
    /// `other` may alias this matrix (e.g. a transposed view of it).
    ///
    /// # Errors
    ///
    /// Returns error if the dimensions differ.
    pub fn set(&mut self, other: &Self) -> DenseResult<()> {
        if self.dims() != other.dims() {
            return Err(DenseError::ShapeMismatch {
                expected: self.dims(),
                got: other.dims(),
            });
        }
        let src = other.to_vec();
        let mut values = self.values.borrow_mut();
        for i in 0..self.rows {
            for j in 0..self.cols {
                values[self.offset(i, j)].set(&src[i * self.cols + j]);
            }
        }
        Ok(())
    }

    /// Reset every element of the view to zero
    pub fn reset(&mut self) {
        self.map(|x| x.reset());
    }

    /// Ones on the diagonal, zeros elsewhere
    pub fn set_identity(&mut self) {
        let one = T::one();
        let mut values = self.values.borrow_mut();
        for i in 0..self.rows {
            for j in 0..self.cols {
                let k = self.offset(i, j);
                if i == j {
                    values[k].set(&one);
                } else {
                    values[k].reset();
                }
            }
        }
    }

    /// Exchange elements `(i1, j1)` and `(i2, j2)`
    pub fn swap(&mut self, i1: usize, j1: usize, i2: usize, j2: usize) -> DenseResult<()> {
        let a = self.check(i1, j1)?;
        let b = self.check(i2, j2)?;
        self.values.borrow_mut().swap(a, b);
        Ok(())
    }

    /// Exchange rows `i1` and `i2`
    pub fn swap_rows(&mut self, i1: usize, i2: usize) -> DenseResult<()> {
        if i1 >= self.rows || i2 >= self.rows {
            return Err(DenseError::out_of_bounds(
                i1.max(i2),
                0,
                self.rows,
                self.cols,
            ));
        }
        let mut values = self.values.borrow_mut();
        for j in 0..self.cols {
            values.swap(self.offset(i1, j), self.offset(i2, j));
        }
        Ok(())
    }

    /// Exchange columns `j1` and `j2`
    pub fn swap_columns(&mut self, j1: usize, j2: usize) -> DenseResult<()> {
        if j1 >= self.cols || j2 >= self.cols {
            return Err(DenseError::out_of_bounds(
                0,
                j1.max(j2),
                self.rows,
                self.cols,
            ));
        }
        let mut values = self.values.borrow_mut();
        for i in 0..self.rows {
            values.swap(self.offset(i, j1), self.offset(i, j2));
        }
        Ok(())
    }

    /// Move row `i` to row `pi[i]`
    ///
    /// # Errors
    ///
    /// Returns error if `pi` is not a permutation of `[0, rows)`.
    pub fn permute_rows(&mut self, pi: &[usize]) -> DenseResult<()> {
        validate_permutation(pi, self.rows)?;
        let swaps = transpositions(pi);
        for &(a, b) in &swaps {
            self.swap_rows(a, b)?;
        }
        debug!(swaps = swaps.len(), "dense row permutation");
        Ok(())
    }

    /// Move column `j` to column `pi[j]`
    pub fn permute_columns(&mut self, pi: &[usize]) -> DenseResult<()> {
        validate_permutation(pi, self.cols)?;
        let swaps = transpositions(pi);
        for &(a, b) in &swaps {
            self.swap_columns(a, b)?;
        }
        debug!(swaps = swaps.len(), "dense column permutation");
        Ok(())
    }

    /// Apply `pi` to rows and columns of a square matrix
    ///
    /// Each transposition swaps the rows first, then the columns.
    pub fn symmetric_permutation(&mut self, pi: &[usize]) -> DenseResult<()> {
        self.check_square()?;
        validate_permutation(pi, self.rows)?;
        let swaps = transpositions(pi);
        for &(a, b) in &swaps {
            self.swap_rows(a, b)?;
            self.swap_columns(a, b)?;
        }
        debug!(swaps = swaps.len(), "dense symmetric permutation");
        Ok(())
    }

    /// Whether the matrix is square and `|a_ij - a_ji| <= epsilon` everywhere
    pub fn is_symmetric(&self, epsilon: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        let values = self.values.borrow();
        for i in 0..self.rows {
            for j in i + 1..self.cols {
                let a = values[self.offset(i, j)].value();
                let b = values[self.offset(j, i)].value();
                if (a - b).abs() > epsilon {
                    return false;
                }
            }
        }
        true
    }

    /// Apply `f` to every element in place
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut values = self.values.borrow_mut();
        for i in 0..self.rows {
            for j in 0..self.cols {
                f(&mut values[self.offset(i, j)]);
            }
        }
    }

    /// Replace every element `x` with `f(x)`
    pub fn map_set<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        self.map(|x| {
            let y = f(x);
            x.set(&y);
        });
    }

    /// Fold all elements in row-major order
    pub fn reduce<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        let values = self.values.borrow();
        let mut acc = init;
        for i in 0..self.rows {
            for j in 0..self.cols {
                acc = f(acc, &values[self.offset(i, j)]);
            }
        }
        acc
    }
}

/// Transpose a row-major buffer with `rows` rows in place
///
/// Element `k` of an `M x N` buffer moves to `k * M mod (M * N - 1)`; the
/// first and last element stay put. Returns the number of cycles followed.
///
/// # Examples
///
/// ```
/// use difflin_core::dense::transpose_in_place;
///
/// let mut v = vec![1, 2, 3, 4, 5, 6];
/// transpose_in_place(&mut v, 2);
/// assert_eq!(v, vec![1, 4, 2, 5, 3, 6]);
/// ```
pub fn transpose_in_place<T>(values: &mut [T], rows: usize) -> usize {
    let mn = values.len();
    if mn < 3 || rows == 0 {
        return 0;
    }
    let q = mn - 1;
    let mut visited = vec![0u64; mn.div_ceil(64)];
    let mut cycles = 0;

    for cycle in 1..q {
        if (visited[cycle / 64] >> (cycle % 64)) & 1 == 1 {
            continue;
        }
        cycles += 1;
        let mut k = cycle;
        loop {
            k = ((k as u128 * rows as u128) % q as u128) as usize;
            visited[k / 64] |= 1 << (k % 64);
            values.swap(k, cycle);
            if k == cycle {
                break;
            }
        }
    }

    cycles
}

impl<T: Scalar> Clone for DenseMatrix<T> {
    /// Deep copy of the view into fresh, unsliced storage
    fn clone(&self) -> Self {
        Self::from_storage(self.to_vec(), self.rows, self.cols)
    }
}

impl<T: Scalar + PartialEq> PartialEq for DenseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims() && self.to_vec() == other.to_vec()
    }
}

impl<T: Scalar> fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("transposed", &self.transposed)
            .field("values", &self.to_vec())
            .finish()
    }
}

impl<T: Scalar> fmt::Display for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.borrow();
        write!(f, "[")?;
        for i in 0..self.rows {
            if i != 0 {
                write!(f, ",\n ")?;
            }
            write!(f, "[")?;
            for j in 0..self.cols {
                if j != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", values[self.offset(i, j)].value())?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
