//! Type definitions and numeric policy constants.
//!
//! This module provides the scalar trait implemented by `f32`/`f64`,
//! the dense vector alias, and the numerical thresholds that govern the
//! descent-direction exploration (degenerate-direction cutoffs and the
//! bound-matching precision).

use nalgebra::{Dyn, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in the search (f32 or f64).
///
/// Combines the numeric traits required by the explorer and line search,
/// and carries the numerical-policy constants as associated consts so the
/// thresholds stay type-accurate across precisions.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Norm threshold below which a window-projected direction is
    /// considered degenerate and replaced by the zero vector.
    const WINDOW_NORM_TOLERANCE: Self;

    /// Norm threshold below which exploration terminates outright: no
    /// usable direction remains in any window.
    const DIRECTION_NORM_TOLERANCE: Self;

    /// Number of decimal digits used when matching a coordinate of the
    /// current point against its box bound.
    const BOUND_MATCH_DECIMALS: i32;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_from_f64` for a
    /// non-panicking version.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Try to convert from f64.
    fn try_from_f64(v: f64) -> Option<Self> {
        <Self as FromPrimitive>::from_f64(v)
    }

    /// Convert to f64 (for display/diagnostics).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_to_f64` for a
    /// non-panicking version.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }

    /// Try to convert to f64.
    fn try_to_f64(self) -> Option<f64> {
        num_traits::cast(self)
    }

    /// Convert from usize (for counts and dimensions).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }

    /// Rounds to the given number of decimal digits.
    ///
    /// Used by the bound-matching policy: a coordinate counts as sitting
    /// on its bound when both round to the same value at
    /// `BOUND_MATCH_DECIMALS` digits.
    fn round_to(self, decimals: i32) -> Self {
        let scale = <Self as Scalar>::from_f64(10f64.powi(decimals));
        <Self as Float>::round(self * scale) / scale
    }

    /// True when `self` and `other` agree after rounding to
    /// `BOUND_MATCH_DECIMALS` decimal digits.
    fn matches_rounded(self, other: Self) -> bool {
        self.round_to(Self::BOUND_MATCH_DECIMALS) == other.round_to(Self::BOUND_MATCH_DECIMALS)
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const WINDOW_NORM_TOLERANCE: Self = 1e-21;
    const DIRECTION_NORM_TOLERANCE: Self = 1e-20;
    const BOUND_MATCH_DECIMALS: i32 = 6;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const WINDOW_NORM_TOLERANCE: Self = 1e-21;
    const DIRECTION_NORM_TOLERANCE: Self = 1e-20;
    const BOUND_MATCH_DECIMALS: i32 = 6;
}

/// Type alias for a dynamically-sized dense vector.
pub type DVector<T> = OVector<T, Dyn>;
