//! Core traits and types for constrained descent-direction search.
//!
//! This crate provides the foundations used by the feature-subset
//! explorer in `evadeopt-optim`: scalar and vector abstractions that
//! work identically for dense and sparse points, the objective and
//! constraint interfaces, and the one-dimensional line search the
//! explorer delegates to.
//!
//! # Modules
//!
//! - [`constraints`]: box bounds and general constraint predicates
//! - [`cost_function`]: objective function interface
//! - [`error`]: error types and `Result` alias
//! - [`line_search`]: 1-D search along a ray
//! - [`types`]: scalar trait and numeric policy constants
//! - [`vector`]: dense/sparse search-space vectors

pub mod constraints;
pub mod cost_function;
pub mod error;
pub mod line_search;
pub mod types;
pub mod vector;

pub use error::{OptimizerError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use evadeopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::constraints::{BoxBounds, Constraint, L2BallConstraint};
    pub use crate::cost_function::{CostFunction, CountingCost, QuadraticCost};
    pub use crate::error::{OptimizerError, Result};
    pub use crate::line_search::{
        BisectLineSearch, ExplorerLineSearch, LineSearch, LineSearchKind, LineSearchParams,
    };
    pub use crate::types::{DVector, Scalar};
    pub use crate::vector::{SearchVector, SparseVector};
}
