//! Feature-subset descent-direction exploration.
//!
//! This crate provides the inner search step of a gradient-based
//! evasion-attack loop: given a point and its objective value, the
//! [`DescentDirectionExplorer`] probes a descent direction over an
//! expanding window of top-ranked coordinates and returns the first
//! strictly improving point it finds. The outer loop owns the attack
//! iteration: it sets a fresh direction at every accepted point and
//! stops once no window yields an improvement.
//!
//! Objectives, constraints, vectors and the underlying 1-D line search
//! come from `evadeopt-core`.

pub mod explorer;

pub use explorer::{DescentDirectionExplorer, ExplorationState, ExplorerConfig};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use evadeopt_optim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::explorer::{DescentDirectionExplorer, ExplorationState, ExplorerConfig};
    pub use evadeopt_core::prelude::*;
}
