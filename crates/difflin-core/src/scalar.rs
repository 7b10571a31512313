//! Scalar capability contract
//!
//! Every container in difflin is generic over a [`Scalar`]. The containers
//! never do arithmetic themselves; they only need to read a value, decide
//! whether an element carries information at all ([`Scalar::is_null`]), and
//! assign or reset elements in place.
//!
//! Implementations are provided for `i8`, `i16`, `i32`, `i64`, `f32`, `f64`
//! and for the differentiable [`crate::Real`].
//!
//! # Examples
//!
//! ```
//! use difflin_core::Scalar;
//!
//! let mut x = 3.5f64;
//! assert!(!x.is_null());
//! x.reset();
//! assert!(x.is_null());
//! assert_eq!(<i32 as Scalar>::from_f64(2.9), 2);
//! ```

use std::fmt::Debug;

/// Capability required from the element type of a vector or matrix
pub trait Scalar: Clone + Debug {
    /// The canonical zero
    fn zero() -> Self;

    /// Constant with the given value and no derivative information
    fn from_f64(value: f64) -> Self;

    /// Numeric value
    fn value(&self) -> f64;

    /// True iff the value and every derivative component are exactly zero
    fn is_null(&self) -> bool;

    /// Copy value and derivative state from `other`
    fn set(&mut self, other: &Self);

    /// Zero in place
    fn reset(&mut self);

    /// Constant one, used by identity construction
    fn one() -> Self {
        Self::from_f64(1.0)
    }
}

macro_rules! impl_primitive_scalar {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn zero() -> Self {
                    $zero
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                #[inline]
                fn value(&self) -> f64 {
                    *self as f64
                }

                #[inline]
                fn is_null(&self) -> bool {
                    *self == $zero
                }

                #[inline]
                fn set(&mut self, other: &Self) {
                    *self = *other;
                }

                #[inline]
                fn reset(&mut self) {
                    *self = $zero;
                }
            }
        )*
    };
}

impl_primitive_scalar! {
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    f32 => 0.0,
    f64 => 0.0,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_scalars() {
        assert!(<i8 as Scalar>::zero().is_null());
        assert_eq!(<i16 as Scalar>::from_f64(-4.0), -4);
        assert_eq!(7i64.value(), 7.0);

        let mut a = 5i32;
        a.set(&9);
        assert_eq!(a, 9);
        a.reset();
        assert!(a.is_null());
    }

    #[test]
    fn test_float_null_semantics() {
        assert!((-0.0f64).is_null());
        assert!(!f64::NAN.is_null());
        assert!(!1e-300f64.is_null());
        assert!(<f32 as Scalar>::zero().is_null());
    }

    #[test]
    fn test_one() {
        assert_eq!(<f64 as Scalar>::one(), 1.0);
        assert_eq!(<i8 as Scalar>::one(), 1);
    }
}
