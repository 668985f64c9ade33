//! Objective function interface.
//!
//! The explorer only needs a scalar evaluation and, when available, a
//! gradient: non-differentiable objectives advertise the missing
//! capability through [`CostFunction::has_gradient`] and the search
//! falls back to random descent directions.

use crate::{
    error::{OptimizerError, Result},
    types::{DVector, Scalar},
    vector::SearchVector,
};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for objective functions over the search space.
pub trait CostFunction<T: Scalar>: Debug {
    /// Evaluates the objective at a point.
    fn cost(&self, x: &SearchVector<T>) -> Result<T>;

    /// True when the objective can produce a gradient.
    ///
    /// When this returns `false` the search uses random descent
    /// directions instead of calling [`CostFunction::gradient`].
    fn has_gradient(&self) -> bool {
        false
    }

    /// Evaluates the gradient at a point.
    ///
    /// # Default Implementation
    ///
    /// Returns `NotImplemented`; override together with
    /// [`CostFunction::has_gradient`].
    fn gradient(&self, _x: &SearchVector<T>) -> Result<SearchVector<T>> {
        Err(OptimizerError::not_implemented(
            "gradient computation not implemented for this cost function",
        ))
    }

    /// Evaluates the objective and its gradient together.
    fn cost_and_gradient(&self, x: &SearchVector<T>) -> Result<(T, SearchVector<T>)> {
        let cost = self.cost(x)?;
        let gradient = self.gradient(x)?;
        Ok((cost, gradient))
    }
}

/// A quadratic objective for testing and examples.
///
/// Computes f(x) = 0.5 * x^T A x + b^T x + c with analytic gradient
/// A x + b.
#[derive(Debug, Clone)]
pub struct QuadraticCost<T: Scalar> {
    /// The quadratic form matrix (should be symmetric)
    pub a: nalgebra::DMatrix<T>,
    /// The linear term
    pub b: DVector<T>,
    /// The constant term
    pub c: T,
}

impl<T: Scalar> QuadraticCost<T> {
    /// Creates a new quadratic cost function.
    pub fn new(a: nalgebra::DMatrix<T>, b: DVector<T>, c: T) -> Self {
        Self { a, b, c }
    }

    /// Creates a simple quadratic with identity matrix: f(x) = 0.5 * ||x||^2.
    pub fn simple(dim: usize) -> Self {
        Self {
            a: nalgebra::DMatrix::identity(dim, dim),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }

    fn check_dim(&self, x: &SearchVector<T>) -> Result<()> {
        if x.len() != self.b.len() {
            return Err(OptimizerError::dimension_mismatch(self.b.len(), x.len()));
        }
        Ok(())
    }
}

impl<T: Scalar> CostFunction<T> for QuadraticCost<T> {
    fn cost(&self, x: &SearchVector<T>) -> Result<T> {
        self.check_dim(x)?;
        let xd = x.to_dense();
        let half = <T as Scalar>::from_f64(0.5);
        Ok(half * xd.dot(&(&self.a * &xd)) + self.b.dot(&xd) + self.c)
    }

    fn has_gradient(&self) -> bool {
        true
    }

    fn gradient(&self, x: &SearchVector<T>) -> Result<SearchVector<T>> {
        self.check_dim(x)?;
        let xd = x.to_dense();
        Ok(SearchVector::Dense(&self.a * &xd + &self.b))
    }
}

/// Wrapper counting objective and gradient evaluations.
///
/// Used by tests to assert bounds on the number of evaluations a
/// search is allowed to spend.
#[derive(Debug)]
pub struct CountingCost<T: Scalar, C: CostFunction<T>> {
    inner: C,
    cost_evals: AtomicUsize,
    gradient_evals: AtomicUsize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Scalar, C: CostFunction<T>> CountingCost<T, C> {
    /// Wraps a cost function with evaluation counters.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cost_evals: AtomicUsize::new(0),
            gradient_evals: AtomicUsize::new(0),
            _marker: std::marker::PhantomData,
        }
    }

    /// Number of `cost` evaluations so far.
    pub fn cost_evals(&self) -> usize {
        self.cost_evals.load(Ordering::Relaxed)
    }

    /// Number of `gradient` evaluations so far.
    pub fn gradient_evals(&self) -> usize {
        self.gradient_evals.load(Ordering::Relaxed)
    }
}

impl<T: Scalar, C: CostFunction<T>> CostFunction<T> for CountingCost<T, C> {
    fn cost(&self, x: &SearchVector<T>) -> Result<T> {
        self.cost_evals.fetch_add(1, Ordering::Relaxed);
        self.inner.cost(x)
    }

    fn has_gradient(&self) -> bool {
        self.inner.has_gradient()
    }

    fn gradient(&self, x: &SearchVector<T>) -> Result<SearchVector<T>> {
        self.gradient_evals.fetch_add(1, Ordering::Relaxed);
        self.inner.gradient(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_cost_and_gradient() {
        let cost = QuadraticCost::<f64>::simple(3);
        let x = SearchVector::from_slice(&[1.0, 2.0, 2.0]);

        let (value, grad) = cost.cost_and_gradient(&x).unwrap();
        assert_relative_eq!(value, 4.5);
        assert_eq!(grad, x);
        assert!(cost.has_gradient());
    }

    #[test]
    fn test_quadratic_rejects_mismatched_point() {
        let cost = QuadraticCost::<f64>::simple(3);
        let x = SearchVector::from_slice(&[1.0, 2.0]);
        assert!(cost.cost(&x).is_err());
    }

    #[test]
    fn test_counting_cost() {
        let cost = CountingCost::new(QuadraticCost::<f64>::simple(2));
        let x = SearchVector::from_slice(&[1.0, 0.0]);

        cost.cost(&x).unwrap();
        cost.cost(&x).unwrap();
        cost.gradient(&x).unwrap();

        assert_eq!(cost.cost_evals(), 2);
        assert_eq!(cost.gradient_evals(), 1);
    }

    #[derive(Debug)]
    struct NoGradient;

    impl CostFunction<f64> for NoGradient {
        fn cost(&self, _x: &SearchVector<f64>) -> Result<f64> {
            Ok(0.0)
        }
    }

    #[test]
    fn test_gradient_default_is_not_implemented() {
        let f = NoGradient;
        assert!(!f.has_gradient());
        let x = SearchVector::from_slice(&[1.0]);
        assert!(matches!(
            f.gradient(&x),
            Err(OptimizerError::NotImplemented { .. })
        ));
    }
}
