//! Box bounds and general constraints.
//!
//! Constraint checks are pure predicates: a violated probe is never an
//! error, the search simply refuses to follow that ray.

use crate::{
    error::{OptimizerError, Result},
    types::{DVector, Scalar},
    vector::SearchVector,
};
use std::fmt::Debug;

/// A general constraint exposing only a violation predicate.
pub trait Constraint<T: Scalar>: Debug {
    /// True when `x` lies outside the feasible region.
    fn is_violated(&self, x: &SearchVector<T>) -> bool;
}

/// Component-wise box constraint `lb <= x <= ub`.
#[derive(Debug, Clone)]
pub struct BoxBounds<T: Scalar> {
    lb: DVector<T>,
    ub: DVector<T>,
}

impl<T: Scalar> BoxBounds<T> {
    /// Creates box bounds from lower and upper bound vectors.
    ///
    /// Fails when the vectors disagree on length or any lower bound
    /// exceeds its upper bound.
    pub fn new(lb: DVector<T>, ub: DVector<T>) -> Result<Self> {
        if lb.len() != ub.len() {
            return Err(OptimizerError::dimension_mismatch(lb.len(), ub.len()));
        }
        if lb.iter().zip(ub.iter()).any(|(&l, &u)| l > u) {
            return Err(OptimizerError::invalid_configuration(
                "lower bound exceeds upper bound",
                "lb",
                "lb > ub",
            ));
        }
        Ok(Self { lb, ub })
    }

    /// Creates uniform bounds `lo <= x_i <= hi` over `dim` coordinates.
    pub fn uniform(dim: usize, lo: T, hi: T) -> Result<Self> {
        Self::new(
            DVector::from_element(dim, lo),
            DVector::from_element(dim, hi),
        )
    }

    /// The lower bound vector.
    pub fn lb(&self) -> &DVector<T> {
        &self.lb
    }

    /// The upper bound vector.
    pub fn ub(&self) -> &DVector<T> {
        &self.ub
    }

    /// Number of bounded coordinates.
    pub fn len(&self) -> usize {
        self.lb.len()
    }

    /// True when the box has zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.lb.len() == 0
    }
}

impl<T: Scalar> Constraint<T> for BoxBounds<T> {
    /// Checks every coordinate, including the implicit zeros of a
    /// sparse point (the lower bound need not be zero).
    fn is_violated(&self, x: &SearchVector<T>) -> bool {
        if x.len() != self.lb.len() {
            return true;
        }
        (0..x.len()).any(|i| {
            let xi = x.get(i);
            xi < self.lb[i] || xi > self.ub[i]
        })
    }
}

/// Euclidean ball constraint `||x - center|| <= radius`.
///
/// The usual perturbation budget of an evasion-attack loop.
#[derive(Debug, Clone)]
pub struct L2BallConstraint<T: Scalar> {
    center: DVector<T>,
    radius: T,
}

impl<T: Scalar> L2BallConstraint<T> {
    /// Creates a ball constraint with the given center and radius.
    pub fn new(center: DVector<T>, radius: T) -> Result<Self> {
        if radius < T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "radius must be non-negative",
                "radius",
                format!("{radius}"),
            ));
        }
        Ok(Self { center, radius })
    }

    /// The ball center.
    pub fn center(&self) -> &DVector<T> {
        &self.center
    }

    /// The ball radius.
    pub fn radius(&self) -> T {
        self.radius
    }
}

impl<T: Scalar> Constraint<T> for L2BallConstraint<T> {
    fn is_violated(&self, x: &SearchVector<T>) -> bool {
        if x.len() != self.center.len() {
            return true;
        }
        (x.to_dense() - &self.center).norm() > self.radius
    }
}
