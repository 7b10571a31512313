//! Permutation validation and decomposition
//!
//! A permutation `pi` of length `n` moves the element at position `i` to
//! position `pi[i]`. Both dense and sparse containers apply permutations as a
//! sequence of element swaps; [`transpositions`] produces that sequence by
//! following the cycles of `pi`.

use crate::error::PermutationError;

/// Check that `pi` is a bijection on `[0, n)`
///
/// # Errors
///
/// Returns error if `pi.len() != n`, if any entry is outside `[0, n)`, or if
/// two positions map onto the same target.
///
/// # Examples
///
/// ```
/// use difflin_core::permutation::validate_permutation;
///
/// assert!(validate_permutation(&[2, 0, 1], 3).is_ok());
/// assert!(validate_permutation(&[0, 0, 1], 3).is_err());
/// assert!(validate_permutation(&[0, 3, 1], 3).is_err());
/// ```
pub fn validate_permutation(pi: &[usize], n: usize) -> Result<(), PermutationError> {
    if pi.len() != n {
        return Err(PermutationError::LengthMismatch {
            expected: n,
            got: pi.len(),
        });
    }
    let mut seen = vec![false; n];
    for (position, &value) in pi.iter().enumerate() {
        if value >= n {
            return Err(PermutationError::OutOfRange {
                position,
                value,
                len: n,
            });
        }
        if seen[value] {
            return Err(PermutationError::Duplicate { value });
        }
        seen[value] = true;
    }
    Ok(())
}

/// Decompose a valid permutation into swaps
///
/// Applying the returned swaps in order to a sequence `x` yields `y` with
/// `y[pi[i]] == x[i]`. For an involution (every cycle of length at most
/// two) this is exactly one swap `(i, pi[i])` per `i < pi[i]`.
///
/// `pi` must already have passed [`validate_permutation`].
///
/// # Examples
///
/// ```
/// use difflin_core::permutation::transpositions;
///
/// let mut x = vec!['a', 'b', 'c'];
/// for (i, j) in transpositions(&[1, 2, 0]) {
///     x.swap(i, j);
/// }
/// assert_eq!(x, vec!['c', 'a', 'b']);
/// ```
pub fn transpositions(pi: &[usize]) -> Vec<(usize, usize)> {
    let n = pi.len();
    let mut visited = vec![false; n];
    let mut swaps = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut cur = pi[start];
        while cur != start {
            visited[cur] = true;
            swaps.push((start, cur));
            cur = pi[cur];
        }
    }

    swaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(pi: &[usize], x: &[i32]) -> Vec<i32> {
        let mut y = x.to_vec();
        for (i, j) in transpositions(pi) {
            y.swap(i, j);
        }
        y
    }

    #[test]
    fn test_validate_errors() {
        assert_eq!(
            validate_permutation(&[0, 1], 3),
            Err(PermutationError::LengthMismatch {
                expected: 3,
                got: 2
            })
        );
        assert_eq!(
            validate_permutation(&[1, 1, 0], 3),
            Err(PermutationError::Duplicate { value: 1 })
        );
        assert_eq!(
            validate_permutation(&[0, 5, 1], 3),
            Err(PermutationError::OutOfRange {
                position: 1,
                value: 5,
                len: 3
            })
        );
    }

    #[test]
    fn test_transpositions_scatter() {
        let pi = [3, 0, 4, 1, 2];
        let x = [10, 11, 12, 13, 14];
        let y = apply(&pi, &x);
        for i in 0..x.len() {
            assert_eq!(y[pi[i]], x[i]);
        }
    }

    #[test]
    fn test_involution_matches_pairwise_rule() {
        let pi = [2, 1, 0, 4, 3];
        let swaps = transpositions(&pi);
        assert_eq!(swaps, vec![(0, 2), (3, 4)]);
    }

    #[test]
    fn test_identity_has_no_swaps() {
        assert!(transpositions(&[0, 1, 2, 3]).is_empty());
        assert!(transpositions(&[]).is_empty());
    }
}
