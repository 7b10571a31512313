//! Differentiable real scalar
//!
//! [`Real`] carries a value together with forward-mode derivative state:
//! the gradient with respect to `n` variables and, for second order, the
//! `n x n` Hessian stored row-major. Arithmetic and derivative propagation
//! are not part of this crate; the containers only rely on the
//! [`Scalar`] capability, in particular on [`Scalar::is_null`], which for a
//! `Real` requires the value *and* every derivative slot to be zero.
//!
//! # Examples
//!
//! ```
//! use difflin_core::{Real64, Scalar};
//!
//! // x0 is the first of two variables, tracked up to second order
//! let x0 = Real64::variable(3.0, 0, 2, 2).unwrap();
//! assert_eq!(x0.derivative(0), 1.0);
//! assert_eq!(x0.hessian(0, 1), 0.0);
//!
//! // zero value but non-zero gradient still carries information
//! let mut y = x0.clone();
//! y.set_value(0.0);
//! y.set_derivative(1, 2.0).unwrap();
//! assert!(!y.is_null());
//! ```

use crate::error::ScalarError;
use crate::scalar::Scalar;
use scirs2_core::numeric::{Float, NumCast};
use std::fmt;

/// Maximum supported derivative order
pub const MAX_ORDER: usize = 2;

/// Real number with optional first and second derivatives
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Real<F = f64> {
    value: F,
    order: usize,
    n: usize,
    derivative: Vec<F>,
    /// Row-major `n x n`
    hessian: Vec<F>,
}

/// Single precision differentiable real
pub type Real32 = Real<f32>;
/// Double precision differentiable real
pub type Real64 = Real<f64>;

impl<F: Float> Real<F> {
    /// Constant without derivative information
    pub fn new(value: F) -> Self {
        Self {
            value,
            order: 0,
            n: 0,
            derivative: Vec::new(),
            hessian: Vec::new(),
        }
    }

    /// Variable `i` out of `n`, tracked up to `order`
    ///
    /// The derivative with respect to itself is seeded with one.
    ///
    /// # Errors
    ///
    /// Returns error if `order > 2` or `i >= n`.
    pub fn variable(value: F, i: usize, n: usize, order: usize) -> Result<Self, ScalarError> {
        let mut r = Self::new(value);
        r.set_variable(i, n, order)?;
        Ok(r)
    }

    /// Turn this scalar into variable `i` out of `n`
    pub fn set_variable(&mut self, i: usize, n: usize, order: usize) -> Result<(), ScalarError> {
        if order > MAX_ORDER {
            return Err(ScalarError::UnsupportedOrder(order));
        }
        if i >= n {
            return Err(ScalarError::VariableOutOfRange { index: i, n });
        }
        self.alloc(n, order);
        self.reset_derivatives();
        if order > 0 {
            self.derivative[i] = F::one();
        }
        Ok(())
    }

    /// Allocate derivative storage for `n` variables up to `order`
    ///
    /// Storage is only reallocated (and zeroed) when the shape changes.
    pub fn alloc(&mut self, n: usize, order: usize) {
        if self.n == n && self.order == order {
            return;
        }
        self.n = n;
        self.order = order.min(MAX_ORDER);
        self.derivative = if self.order >= 1 {
            vec![F::zero(); n]
        } else {
            Vec::new()
        };
        self.hessian = if self.order >= 2 {
            vec![F::zero(); n * n]
        } else {
            Vec::new()
        };
    }

    /// The value itself
    pub fn primal(&self) -> F {
        self.value
    }

    /// Highest derivative order tracked (0, 1 or 2)
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of variables derivatives are tracked for
    pub fn num_variables(&self) -> usize {
        self.n
    }

    /// Derivative with respect to variable `i` (zero when not tracked)
    pub fn derivative(&self, i: usize) -> F {
        if self.order >= 1 {
            self.derivative.get(i).copied().unwrap_or_else(F::zero)
        } else {
            F::zero()
        }
    }

    /// Second derivative with respect to variables `i` and `j`
    pub fn hessian(&self, i: usize, j: usize) -> F {
        if self.order >= 2 && i < self.n && j < self.n {
            self.hessian[i * self.n + j]
        } else {
            F::zero()
        }
    }

    /// Gradient slice (empty below first order)
    pub fn gradient(&self) -> &[F] {
        &self.derivative
    }

    /// Row-major Hessian slice (empty below second order)
    pub fn hessian_values(&self) -> &[F] {
        &self.hessian
    }

    /// Set the value; all derivatives are reset to zero
    pub fn set_value(&mut self, value: F) {
        self.value = value;
        self.reset_derivatives();
    }

    /// Set the derivative with respect to variable `i`
    pub fn set_derivative(&mut self, i: usize, v: F) -> Result<(), ScalarError> {
        if self.order < 1 {
            return Err(ScalarError::UnsupportedOrder(1));
        }
        let n = self.n;
        let slot = self
            .derivative
            .get_mut(i)
            .ok_or(ScalarError::VariableOutOfRange { index: i, n })?;
        *slot = v;
        Ok(())
    }

    /// Set the second derivative with respect to variables `i` and `j`
    pub fn set_hessian(&mut self, i: usize, j: usize, v: F) -> Result<(), ScalarError> {
        if self.order < 2 {
            return Err(ScalarError::UnsupportedOrder(2));
        }
        if i >= self.n || j >= self.n {
            return Err(ScalarError::VariableOutOfRange {
                index: i.max(j),
                n: self.n,
            });
        }
        self.hessian[i * self.n + j] = v;
        Ok(())
    }

    /// Zero all derivative slots, keeping the allocation
    pub fn reset_derivatives(&mut self) {
        self.derivative.iter_mut().for_each(|d| *d = F::zero());
        self.hessian.iter_mut().for_each(|h| *h = F::zero());
    }
}

impl<F: Float> Default for Real<F> {
    fn default() -> Self {
        Self::new(F::zero())
    }
}

impl<F: Float + fmt::Debug> Scalar for Real<F> {
    fn zero() -> Self {
        Self::new(F::zero())
    }

    fn from_f64(value: f64) -> Self {
        Self::new(<F as NumCast>::from(value).unwrap_or_else(F::nan))
    }

    fn value(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }

    fn is_null(&self) -> bool {
        self.value == F::zero()
            && self.derivative.iter().all(|d| *d == F::zero())
            && self.hessian.iter().all(|h| *h == F::zero())
    }

    fn set(&mut self, other: &Self) {
        self.clone_from(other);
    }

    fn reset(&mut self) {
        self.value = F::zero();
        self.reset_derivatives();
    }
}

impl<F: Float> fmt::Display for Real<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e}", self.value.to_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let r = Real64::new(2.5);
        assert_eq!(r.primal(), 2.5);
        assert_eq!(r.order(), 0);
        assert_eq!(r.derivative(3), 0.0);
        assert!(!r.is_null());
        assert!(Real64::zero().is_null());
    }

    #[test]
    fn test_variable_seeding() {
        let r = Real64::variable(1.0, 1, 3, 1).unwrap();
        assert_eq!(r.gradient(), &[0.0, 1.0, 0.0]);
        assert!(r.hessian_values().is_empty());
    }

    #[test]
    fn test_variable_errors() {
        assert_eq!(
            Real64::variable(1.0, 0, 2, 3),
            Err(ScalarError::UnsupportedOrder(3))
        );
        assert_eq!(
            Real64::variable(1.0, 2, 2, 1),
            Err(ScalarError::VariableOutOfRange { index: 2, n: 2 })
        );
    }

    #[test]
    fn test_null_requires_all_components_zero() {
        let mut r = Real64::variable(0.0, 0, 2, 2).unwrap();
        // gradient still seeded
        assert!(!r.is_null());

        r.reset_derivatives();
        assert!(r.is_null());

        r.set_hessian(1, 0, 0.5).unwrap();
        assert!(!r.is_null());

        r.reset();
        assert!(r.is_null());
        // allocation survives a reset
        assert_eq!(r.num_variables(), 2);
    }

    #[test]
    fn test_set_copies_derivatives() {
        let src = Real64::variable(4.0, 1, 2, 2).unwrap();
        let mut dst = Real64::new(0.0);
        dst.set(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.derivative(1), 1.0);
    }

    #[test]
    fn test_set_value_resets_derivatives() {
        let mut r = Real32::variable(1.0, 0, 1, 1).unwrap();
        r.set_value(3.0);
        assert_eq!(r.derivative(0), 0.0);
        assert_eq!(r.value(), 3.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Real64::new(1500.0).to_string(), "1.5e3");
    }
}
