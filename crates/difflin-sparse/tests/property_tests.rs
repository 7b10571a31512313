//! Property-based tests for sparse containers
//!
//! These tests compare the sparse merges, transposes and permutations
//! against the same operations on plain dense data.

use difflin_core::DenseMatrix;
use difflin_sparse::{SparseIndex, SparseMatrix, SparseVector};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Test Utilities
// ============================================================================

/// Random dense data with roughly half of the entries zero
fn sparse_data(n: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(
        prop_oneof![Just(0i64), -50i64..50],
        n..=n,
    )
}

/// Two random vectors of the same dimension
fn vector_pair(max_n: usize) -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    (1..=max_n).prop_flat_map(|n| (sparse_data(n), sparse_data(n)))
}

/// Random `rows x cols` row-major data
fn matrix_data(max_dim: usize) -> impl Strategy<Value = (Vec<i64>, usize, usize)> {
    (1..=max_dim, 1..=max_dim)
        .prop_flat_map(|(rows, cols)| (sparse_data(rows * cols), Just(rows), Just(cols)))
}

/// Random permutation of `[0, n)`
fn permutation_strategy(max_n: usize) -> impl Strategy<Value = Vec<usize>> {
    (1..=max_n).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

fn to_matrix(values: &[i64], rows: usize, cols: usize) -> SparseMatrix<i64> {
    SparseMatrix::from_dense(&DenseMatrix::new(values.to_vec(), rows, cols).unwrap())
}

// ============================================================================
// Index Properties
// ============================================================================

proptest! {
    /// Property: sort leaves the live keys strictly ascending
    #[test]
    fn prop_index_sort(
        keys in prop::collection::btree_set(0usize..1000, 0..50),
        revoked in prop::collection::vec(0usize..50, 0..10),
    ) {
        let mut index = SparseIndex::new();
        let shuffled: Vec<usize> = keys.iter().rev().copied().collect();
        for &k in &shuffled {
            index.insert(k);
        }
        let mut expected: Vec<usize> = shuffled.clone();
        for &pos in &revoked {
            if pos < shuffled.len() {
                index.revoke(pos);
                expected.retain(|&k| k != shuffled[pos]);
            }
        }
        expected.sort_unstable();

        index.sort();
        prop_assert_eq!(index.keys(), expected.as_slice());
    }
}

// ============================================================================
// Merge Properties
// ============================================================================

proptest! {
    /// Property: a joint merge visits exactly the union of non-zero positions
    #[test]
    fn prop_joint_iter_union((a, b) in vector_pair(40)) {
        let mut x = SparseVector::from_dense(a.clone());
        let y = SparseVector::from_dense(b.clone());

        let mut visited = BTreeMap::new();
        let mut it = x.joint_iter(&y).unwrap();
        while it.ok() {
            let (u, v) = it.get();
            visited.insert(it.index().unwrap(), (*u, *v));
            it.advance();
        }

        let expected: BTreeMap<usize, (i64, i64)> = a
            .iter()
            .zip(&b)
            .enumerate()
            .filter(|(_, (u, v))| **u != 0 || **v != 0)
            .map(|(i, (u, v))| (i, (*u, *v)))
            .collect();
        prop_assert_eq!(visited, expected);
    }

    /// Property: accumulating through entry() computes the elementwise sum
    #[test]
    fn prop_joint_iter_sum((a, b) in vector_pair(40)) {
        let mut x = SparseVector::from_dense(a.clone());
        let y = SparseVector::from_dense(b.clone());

        let mut it = x.joint_iter(&y).unwrap();
        while it.ok() {
            if let Some((u, v)) = it.entry() {
                *u += *v;
            }
            it.advance();
        }
        drop(it);

        let sum: Vec<i64> = a.iter().zip(&b).map(|(u, v)| u + v).collect();
        prop_assert_eq!(x.to_dense(), sum);
    }

    /// Property: one mutating pass leaves no null entry stored
    #[test]
    fn prop_iteration_evicts_nulls(a in sparse_data(30), zeroed in prop::collection::vec(0usize..30, 0..10)) {
        let mut v = SparseVector::from_dense(a);
        for &i in &zeroed {
            *v.at(i).unwrap() = 0;
        }
        v.compact();
        prop_assert_eq!(v.stored(), v.nnz());
    }
}

// ============================================================================
// Vector Structure Properties
// ============================================================================

proptest! {
    /// Property: sort keeps the multiset of values and orders them ascending
    #[test]
    fn prop_sort_monotone(a in sparse_data(30)) {
        let mut v = SparseVector::from_dense(a.clone());
        v.sort(false);
        let sorted = v.to_dense();

        let mut expected = a;
        expected.sort_unstable();
        prop_assert_eq!(sorted, expected);
    }

    /// Property: permute moves element i to pi[i]
    #[test]
    fn prop_vector_permute(pi in permutation_strategy(20)) {
        let original: Vec<i64> = (0..pi.len() as i64).map(|i| i % 3).collect();
        let mut v = SparseVector::from_dense(original.clone());
        v.permute(&pi).unwrap();
        for i in 0..pi.len() {
            prop_assert_eq!(v.value_at(pi[i]).unwrap(), original[i] as f64);
        }
    }
}

// ============================================================================
// Matrix Properties
// ============================================================================

proptest! {
    /// Property: the sparse transpose agrees with the dense transposed view
    #[test]
    fn prop_transpose_matches_dense((values, rows, cols) in matrix_data(8)) {
        let dense = DenseMatrix::new(values.clone(), rows, cols).unwrap();
        let m = to_matrix(&values, rows, cols);
        let t = m.t();
        prop_assert_eq!(t.dims(), (cols, rows));
        prop_assert_eq!(t.to_dense().to_vec(), dense.t().to_vec());
        prop_assert_eq!(t.nnz(), m.nnz());
    }

    /// Property: tip twice restores the matrix
    #[test]
    fn prop_tip_involution((values, rows, cols) in matrix_data(8)) {
        let mut m = to_matrix(&values, rows, cols);
        m.tip().unwrap();
        prop_assert_eq!(m.dims(), (cols, rows));
        m.tip().unwrap();
        prop_assert_eq!(m.to_dense().to_vec(), values);
    }

    /// Property: a slice reads the same elements as the parent
    #[test]
    fn prop_slice_window(
        (values, rows, cols) in matrix_data(8),
        r in 0usize..8,
        c in 0usize..8,
    ) {
        let m = to_matrix(&values, rows, cols);
        let (r0, c0) = (r % rows, c % cols);
        let s = m.slice(r0, rows, c0, cols).unwrap();
        for i in 0..s.rows() {
            for j in 0..s.cols() {
                prop_assert_eq!(
                    s.value_at(i, j).unwrap(),
                    m.value_at(r0 + i, c0 + j).unwrap()
                );
            }
        }
    }

    /// Property: sparse symmetric permutation matches the dense one
    #[test]
    fn prop_symmetric_permutation(pi in permutation_strategy(7)) {
        let n = pi.len();
        let mut dense = DenseMatrix::<i64>::from_fn(n, n, |i, j| ((i * 5 + j * 3) % 4) as i64);
        let mut m = SparseMatrix::from_dense(&dense);

        m.symmetric_permutation(&pi).unwrap();
        dense.symmetric_permutation(&pi).unwrap();
        prop_assert_eq!(m.to_dense(), dense);
    }
}
