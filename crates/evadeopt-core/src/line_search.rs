//! One-dimensional line search along a ray.
//!
//! The explorer delegates every probe of a coordinate window to a line
//! search along `x + t*d`. The contract is deliberately forgiving: a
//! search either returns a strictly better point with its value, or the
//! start point unchanged when no improvement was found — it never
//! raises an error for "no progress".
//!
//! Line-search variants are a closed set dispatched through
//! [`LineSearchKind`]; there is no string-keyed runtime registry.

use crate::{
    constraints::{BoxBounds, Constraint},
    cost_function::CostFunction,
    error::{OptimizerError, Result},
    types::Scalar,
    vector::SearchVector,
};
use std::fmt::Debug;

/// Parameters shared by line-search algorithms.
#[derive(Debug, Clone)]
pub struct LineSearchParams<T: Scalar> {
    /// Base step size, also the resolution of the probe grid
    pub eta: T,

    /// Smallest step worth resolving (defaults to `eta` when unset)
    pub eta_min: Option<T>,

    /// Largest step the expansion phase may reach
    pub eta_max: Option<T>,

    /// Maximum number of objective evaluations per search
    pub max_iter: usize,
}

impl<T: Scalar> Default for LineSearchParams<T> {
    fn default() -> Self {
        Self {
            eta: <T as Scalar>::from_f64(1e-3),
            eta_min: None,
            eta_max: None,
            max_iter: 50,
        }
    }
}

impl<T: Scalar> LineSearchParams<T> {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base step size.
    pub fn with_eta(mut self, eta: T) -> Self {
        self.eta = eta;
        self
    }

    /// Sets the minimum step resolution.
    pub fn with_eta_min(mut self, eta_min: T) -> Self {
        self.eta_min = Some(eta_min);
        self
    }

    /// Sets the maximum step size.
    pub fn with_eta_max(mut self, eta_max: T) -> Self {
        self.eta_max = Some(eta_max);
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.eta <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "step size must be positive",
                "eta",
                format!("{}", self.eta),
            ));
        }
        if let Some(eta_min) = self.eta_min {
            if eta_min <= T::zero() {
                return Err(OptimizerError::invalid_configuration(
                    "minimum step must be positive",
                    "eta_min",
                    format!("{eta_min}"),
                ));
            }
        }
        if let Some(eta_max) = self.eta_max {
            if eta_max < self.eta {
                return Err(OptimizerError::invalid_configuration(
                    "maximum step must not be below eta",
                    "eta_max",
                    format!("{eta_max}"),
                ));
            }
        }
        if self.max_iter == 0 {
            return Err(OptimizerError::invalid_configuration(
                "evaluation budget must be at least 1",
                "max_iter",
                "0",
            ));
        }
        Ok(())
    }
}

/// Interface for 1-D search algorithms along a ray `x + t*d`, t > 0.
pub trait LineSearch<T: Scalar>: Debug {
    /// Searches for an improved point along `x + t*d`.
    ///
    /// Returns `(point, value)`: a strictly better candidate, or
    /// `(x, fx)` unchanged when none was found within the budget.
    /// Candidates violating `constraint` or `bounds` are never
    /// returned.
    fn search<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        constraint: Option<&dyn Constraint<T>>,
        bounds: Option<&BoxBounds<T>>,
        x: &SearchVector<T>,
        d: &SearchVector<T>,
        fx: T,
    ) -> Result<(SearchVector<T>, T)>;

    /// Current base step size.
    fn eta(&self) -> T;

    /// Replaces the base step size.
    fn set_eta(&mut self, eta: T);

    /// Current minimum step resolution.
    fn eta_min(&self) -> Option<T>;

    /// Replaces the minimum step resolution.
    fn set_eta_min(&mut self, eta_min: Option<T>);

    /// Current maximum step size.
    fn eta_max(&self) -> Option<T>;

    /// Replaces the maximum step size.
    fn set_eta_max(&mut self, eta_max: Option<T>);

    /// Human-readable algorithm name.
    fn name(&self) -> &str;
}

/// Bisection line search with an exponential expansion phase.
///
/// Steps t = eta, 2·eta, 4·eta, … are probed while the objective keeps
/// strictly decreasing and the candidate stays feasible; the bracket
/// between the last improving and the first failing step is then
/// refined by bisection. The total number of objective evaluations is
/// capped by `max_iter`.
#[derive(Debug, Clone)]
pub struct BisectLineSearch<T: Scalar> {
    params: LineSearchParams<T>,
}

impl<T: Scalar> BisectLineSearch<T> {
    /// Creates a bisection search with validated parameters.
    pub fn new(params: LineSearchParams<T>) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    fn infeasible(
        constraint: Option<&dyn Constraint<T>>,
        bounds: Option<&BoxBounds<T>>,
        x: &SearchVector<T>,
    ) -> bool {
        constraint.is_some_and(|c| c.is_violated(x))
            || bounds.is_some_and(|b| b.is_violated(x))
    }
}

impl<T: Scalar> LineSearch<T> for BisectLineSearch<T> {
    fn search<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        constraint: Option<&dyn Constraint<T>>,
        bounds: Option<&BoxBounds<T>>,
        x: &SearchVector<T>,
        d: &SearchVector<T>,
        fx: T,
    ) -> Result<(SearchVector<T>, T)> {
        let max_iter = self.params.max_iter;
        let mut evals = 0usize;

        let mut best: Option<(SearchVector<T>, T)> = None;
        let mut fbest = fx;
        // bracket: lo = last strictly improving step, hi = first failing one
        let mut lo = T::zero();
        let mut hi: Option<T> = None;
        let mut t = self.params.eta;

        while evals < max_iter {
            let cand = x.add_scaled(t, d)?;
            if Self::infeasible(constraint, bounds, &cand) {
                hi = Some(t);
                break;
            }
            let f = cost_fn.cost(&cand)?;
            evals += 1;
            if f < fbest {
                fbest = f;
                lo = t;
                best = Some((cand, f));
            } else {
                hi = Some(t);
                break;
            }
            if let Some(eta_max) = self.params.eta_max {
                if t >= eta_max {
                    break;
                }
            }
            t = t + t;
        }

        if let (Some(mut hi), true) = (hi, best.is_some()) {
            let resolution = self.params.eta_min.unwrap_or(self.params.eta);
            let half = <T as Scalar>::from_f64(0.5);
            while evals < max_iter && hi - lo > resolution {
                let mid = (lo + hi) * half;
                let cand = x.add_scaled(mid, d)?;
                if Self::infeasible(constraint, bounds, &cand) {
                    hi = mid;
                    continue;
                }
                let f = cost_fn.cost(&cand)?;
                evals += 1;
                if f < fbest {
                    fbest = f;
                    lo = mid;
                    best = Some((cand, f));
                } else {
                    hi = mid;
                }
            }
        }

        match best {
            Some(found) => Ok(found),
            None => Ok((x.clone(), fx)),
        }
    }

    fn eta(&self) -> T {
        self.params.eta
    }

    fn set_eta(&mut self, eta: T) {
        self.params.eta = eta;
    }

    fn eta_min(&self) -> Option<T> {
        self.params.eta_min
    }

    fn set_eta_min(&mut self, eta_min: Option<T>) {
        self.params.eta_min = eta_min;
    }

    fn eta_max(&self) -> Option<T> {
        self.params.eta_max
    }

    fn set_eta_max(&mut self, eta_max: Option<T>) {
        self.params.eta_max = eta_max;
    }

    fn name(&self) -> &str {
        "Bisect"
    }
}

/// Closed set of line-search variants selectable by the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearchKind {
    /// Exponential expansion followed by bisection refinement
    #[default]
    Bisect,
}

impl LineSearchKind {
    /// Builds the selected line search with the given parameters.
    pub fn create<T: Scalar>(self, params: LineSearchParams<T>) -> Result<ExplorerLineSearch<T>> {
        match self {
            Self::Bisect => Ok(ExplorerLineSearch::Bisect(BisectLineSearch::new(params)?)),
        }
    }
}

/// Dispatch over the closed set of line-search implementations.
#[derive(Debug, Clone)]
pub enum ExplorerLineSearch<T: Scalar> {
    /// Bisection search
    Bisect(BisectLineSearch<T>),
}

impl<T: Scalar> LineSearch<T> for ExplorerLineSearch<T> {
    fn search<C: CostFunction<T>>(
        &mut self,
        cost_fn: &C,
        constraint: Option<&dyn Constraint<T>>,
        bounds: Option<&BoxBounds<T>>,
        x: &SearchVector<T>,
        d: &SearchVector<T>,
        fx: T,
    ) -> Result<(SearchVector<T>, T)> {
        match self {
            Self::Bisect(ls) => ls.search(cost_fn, constraint, bounds, x, d, fx),
        }
    }

    fn eta(&self) -> T {
        match self {
            Self::Bisect(ls) => ls.eta(),
        }
    }

    fn set_eta(&mut self, eta: T) {
        match self {
            Self::Bisect(ls) => ls.set_eta(eta),
        }
    }

    fn eta_min(&self) -> Option<T> {
        match self {
            Self::Bisect(ls) => ls.eta_min(),
        }
    }

    fn set_eta_min(&mut self, eta_min: Option<T>) {
        match self {
            Self::Bisect(ls) => ls.set_eta_min(eta_min),
        }
    }

    fn eta_max(&self) -> Option<T> {
        match self {
            Self::Bisect(ls) => ls.eta_max(),
        }
    }

    fn set_eta_max(&mut self, eta_max: Option<T>) {
        match self {
            Self::Bisect(ls) => ls.set_eta_max(eta_max),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Bisect(ls) => ls.name(),
        }
    }
}
