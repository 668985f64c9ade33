//! Feature-subset exploration of a descent direction.
//!
//! Classical line searches probe a full direction at once. Inside an
//! evasion-attack loop that is wasteful: most of the objective's
//! decrease usually comes from a handful of high-relevance features.
//! The explorer therefore ranks coordinates by relevance and probes an
//! expanding prefix of that ranking — a window of `n_dimensions`
//! coordinates first, then a window of at least twice the size after
//! every unsuccessful probe — delegating each window to a 1-D line
//! search along the projected direction.
//!
//! # Algorithm Overview
//!
//! For a current point x with value f(x):
//! 1. `set_descent_direction` builds the direction (objective gradient,
//!    or random ±1 when no gradient is available), zeroes the
//!    coordinates whose movement would leave the box bounds, and ranks
//!    the rest by descending magnitude.
//! 2. `explore_descent_direction` projects the direction onto the
//!    current window, normalizes it (or takes its sign in discrete
//!    mode), and runs the line search along `x - t*d`. The first strict
//!    improvement is returned immediately; otherwise the window grows
//!    and the probe repeats until every feasible feature was explored.
//!
//! The additive window growth (`window_end += |current window|`)
//! doubles the probed block once the window has stabilized, so a full
//! sweep costs O(log n) line searches while cheap small-window wins are
//! still tried first.

use evadeopt_core::{
    constraints::{BoxBounds, Constraint},
    cost_function::CostFunction,
    error::{OptimizerError, Result},
    line_search::{ExplorerLineSearch, LineSearch, LineSearchKind, LineSearchParams},
    types::{DVector, Scalar},
    vector::SearchVector,
};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

/// Configuration for the descent-direction explorer.
#[derive(Debug, Clone)]
pub struct ExplorerConfig<T: Scalar> {
    /// Number of coordinates probed per window; 0 (or any value at
    /// least the feature count) explores all features at once
    pub n_dimensions: usize,

    /// Line-search variant used for every window probe
    pub line_search: LineSearchKind,

    /// Base line-search step size
    pub eta: T,

    /// Minimum line-search step resolution
    pub eta_min: Option<T>,

    /// Maximum line-search step size
    pub eta_max: Option<T>,

    /// Objective evaluation budget per line search
    pub max_iter: usize,

    /// Project window directions to their sign (±1 entries) instead of
    /// normalizing to unit norm; for discrete feature spaces
    pub discrete: bool,

    /// Seed for the random direction and full-dimension permutation;
    /// entropy-seeded when unset
    pub seed: Option<u64>,
}

impl<T: Scalar> Default for ExplorerConfig<T> {
    fn default() -> Self {
        Self {
            n_dimensions: 0,
            line_search: LineSearchKind::Bisect,
            eta: <T as Scalar>::from_f64(1e-3),
            eta_min: None,
            eta_max: None,
            max_iter: 50,
            discrete: false,
            seed: None,
        }
    }
}

impl<T: Scalar> ExplorerConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window block size.
    pub fn with_n_dimensions(mut self, n_dimensions: usize) -> Self {
        self.n_dimensions = n_dimensions;
        self
    }

    /// Selects the line-search variant.
    pub fn with_line_search(mut self, kind: LineSearchKind) -> Self {
        self.line_search = kind;
        self
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

    /// Sets the per-search evaluation budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Enables sign projection for discrete feature spaces.
    pub fn with_discrete(mut self, discrete: bool) -> Self {
        self.discrete = discrete;
        self
    }

    /// Fixes the random seed (deterministic random directions).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.line_search_params().validate()
    }

    fn line_search_params(&self) -> LineSearchParams<T> {
        LineSearchParams {
            eta: self.eta,
            eta_min: self.eta_min,
            eta_max: self.eta_max,
            max_iter: self.max_iter,
        }
    }
}

/// Progress of the window exploration for the current direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationState {
    /// Window reset to the initial block, no probe attempted yet
    Reset,
    /// At least one window probed without success
    Exploring,
    /// Every feasible feature was explored; terminal until a new
    /// direction is set
    Explored,
}

/// Explorer probing a descent direction one coordinate window at a time.
///
/// All state (direction, ranking, window) belongs to one instance;
/// concurrent optimization runs must each own their own explorer.
///
/// # Examples
///
/// ```
/// use evadeopt_core::prelude::*;
/// use evadeopt_optim::{DescentDirectionExplorer, ExplorerConfig};
///
/// let cost = QuadraticCost::<f64>::simple(4);
/// let bounds = BoxBounds::uniform(4, -1.0, 1.0)?;
/// let config = ExplorerConfig::new().with_n_dimensions(1).with_eta(0.05);
/// let mut explorer = DescentDirectionExplorer::new(cost, None, Some(bounds), config)?;
///
/// let x = SearchVector::from_slice(&[0.8, -0.3, 0.5, 0.1]);
/// let fx = explorer.cost_fn().cost(&x)?;
/// explorer.set_descent_direction(&x)?;
/// let (better, fv) = explorer.explore_descent_direction(&x, fx)?;
/// assert!(fv <= fx);
/// # Ok::<(), OptimizerError>(())
/// ```
#[derive(Debug)]
pub struct DescentDirectionExplorer<T: Scalar, C: CostFunction<T>> {
    cost_fn: C,
    constraint: Option<Box<dyn Constraint<T>>>,
    bounds: Option<BoxBounds<T>>,
    line_search: ExplorerLineSearch<T>,

    n_dimensions: usize,
    discrete: bool,

    state: ExplorationState,
    n_feat: usize,
    direction: Option<SearchVector<T>>,
    /// Coordinate indices by descending |direction| (random permutation
    /// in full-dimension mode)
    ranking: Vec<usize>,
    /// Ranking restricted to nonzero filtered-direction entries
    feasible: Vec<usize>,
    /// Exclusive end of the ranking prefix scheduled for probing
    window_end: usize,
    /// Size of the currently active window
    window_len: usize,

    rng: SmallRng,
}

impl<T: Scalar, C: CostFunction<T>> DescentDirectionExplorer<T, C> {
    /// Creates an explorer over the given objective and constraints.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for non-positive step sizes, a
    /// zero evaluation budget, or inconsistent step bounds.
    pub fn new(
        cost_fn: C,
        constraint: Option<Box<dyn Constraint<T>>>,
        bounds: Option<BoxBounds<T>>,
        config: ExplorerConfig<T>,
    ) -> Result<Self> {
        let line_search = config.line_search.create(config.line_search_params())?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self {
            cost_fn,
            constraint,
            bounds,
            line_search,
            n_dimensions: config.n_dimensions,
            discrete: config.discrete,
            state: ExplorationState::Reset,
            n_feat: 0,
            direction: None,
            ranking: Vec::new(),
            feasible: Vec::new(),
            window_end: config.n_dimensions,
            window_len: config.n_dimensions,
            rng,
        })
    }

    /// The objective being minimized.
    pub fn cost_fn(&self) -> &C {
        &self.cost_fn
    }

    /// Window block size (clamped to the feature count once a direction
    /// has been set).
    pub fn n_dimensions(&self) -> usize {
        self.n_dimensions
    }

    /// True when window directions are sign-projected.
    pub fn discrete(&self) -> bool {
        self.discrete
    }

    /// True once every feasible feature subset was explored for the
    /// current direction.
    pub fn explored(&self) -> bool {
        self.state == ExplorationState::Explored
    }

    /// Base line-search step size.
    pub fn eta(&self) -> T {
        self.line_search.eta()
    }

    /// Replaces the base line-search step size.
    pub fn set_eta(&mut self, eta: T) {
        self.line_search.set_eta(eta);
    }

    /// Minimum line-search step resolution.
    pub fn eta_min(&self) -> Option<T> {
        self.line_search.eta_min()
    }

    /// Replaces the minimum line-search step resolution.
    pub fn set_eta_min(&mut self, eta_min: Option<T>) {
        self.line_search.set_eta_min(eta_min);
    }

    /// Maximum line-search step size.
    pub fn eta_max(&self) -> Option<T> {
        self.line_search.eta_max()
    }

    /// Replaces the maximum line-search step size.
    pub fn set_eta_max(&mut self, eta_max: Option<T>) {
        self.line_search.set_eta_max(eta_max);
    }

    /// Resets the exploration window to the initial block.
    ///
    /// Idempotent; the current direction and ranking are kept.
    pub fn reset_exploration(&mut self) {
        self.state = ExplorationState::Reset;
        self.window_end = self.n_dimensions;
        self.window_len = self.n_dimensions;
    }

    /// Sets the descent direction for the given point and resets the
    /// window exploration.
    ///
    /// The direction is the objective gradient when available, and a
    /// random ±1 vector (half the entries negated, sampled without
    /// replacement) otherwise. Coordinates whose movement would leave
    /// the box bounds are zeroed before ranking.
    ///
    /// # Errors
    ///
    /// Fails loudly when the bounds or the gradient disagree with the
    /// point on length.
    pub fn set_descent_direction(&mut self, x: &SearchVector<T>) -> Result<()> {
        let n = x.len();
        if n == 0 {
            return Err(OptimizerError::invalid_state(
                "cannot explore a zero-dimensional point",
            ));
        }
        if let Some(bounds) = &self.bounds {
            if bounds.len() != n {
                return Err(OptimizerError::dimension_mismatch(bounds.len(), n));
            }
        }
        self.n_feat = n;
        if self.n_dimensions == 0 || self.n_dimensions > n {
            self.n_dimensions = n;
        }
        self.reset_exploration();

        let mut direction = if self.cost_fn.has_gradient() {
            let gradient = self.cost_fn.gradient(x)?;
            if gradient.len() != n {
                return Err(OptimizerError::dimension_mismatch(n, gradient.len()));
            }
            gradient
        } else {
            self.random_direction(n)
        };
        self.filter_descent_direction(x, &mut direction);

        // when all features are explored together the order is
        // irrelevant, so skip the sort
        self.ranking = if self.n_dimensions < n {
            direction.abs_argsort_desc()
        } else {
            let mut idx: Vec<usize> = (0..n).collect();
            idx.shuffle(&mut self.rng);
            idx
        };
        self.feasible = self
            .ranking
            .iter()
            .copied()
            .filter(|&i| direction.get(i) != T::zero())
            .collect();
        self.direction = Some(direction);
        Ok(())
    }

    /// Probes the current direction window by window until a point
    /// strictly better than `(x, fx)` is found.
    ///
    /// Returns the first improving `(point, value)`, or `(x, fx)`
    /// unchanged when the direction is degenerate, the probe at
    /// `x - eta*d` is infeasible, or every window was explored without
    /// improvement. The caller is expected to set a fresh direction on
    /// the returned point before exploring again.
    pub fn explore_descent_direction(
        &mut self,
        x: &SearchVector<T>,
        fx: T,
    ) -> Result<(SearchVector<T>, T)> {
        let Some(direction) = self.direction.clone() else {
            return Err(OptimizerError::invalid_state(
                "no descent direction set; call set_descent_direction first",
            ));
        };
        if x.len() != self.n_feat {
            return Err(OptimizerError::dimension_mismatch(self.n_feat, x.len()));
        }

        while self.state != ExplorationState::Explored && !self.feasible.is_empty() {
            if self.state == ExplorationState::Reset {
                self.state = ExplorationState::Exploring;
            }

            let d = self.current_descent_direction(&direction);
            if d.norm() < T::DIRECTION_NORM_TOLERANCE {
                return Ok((x.clone(), fx));
            }

            // fail fast: do not consult the line search on a ray whose
            // unit step is already infeasible
            let probe = x.add_scaled(-self.eta(), &d)?;
            if self.is_infeasible(&probe) {
                return Ok((x.clone(), fx));
            }

            let neg_d = d.scaled(-T::one());
            let (v, fv) = self.line_search.search(
                &self.cost_fn,
                self.constraint.as_deref(),
                self.bounds.as_ref(),
                x,
                &neg_d,
                fx,
            )?;

            self.update_current_subset();

            if fv < fx {
                return Ok((v, fv));
            }
        }

        Ok((x.clone(), fx))
    }

    /// Projects the direction onto the active window and normalizes it.
    ///
    /// Returns the zero vector when no feasible feature remains or the
    /// windowed norm is degenerate. The window controls which
    /// coordinates may move, never the step size: the result has unit
    /// norm, or ±1 entries in discrete mode.
    fn current_descent_direction(&self, direction: &SearchVector<T>) -> SearchVector<T> {
        if self.feasible.is_empty() {
            return direction.zeros_like();
        }

        let d = if self.n_dimensions == self.n_feat {
            direction.clone()
        } else {
            let mut d = direction.zeros_like();
            let active = &self.feasible[..self.window_len.min(self.feasible.len())];
            for &i in active {
                d.set(i, direction.get(i));
            }
            d
        };

        let norm = d.norm();
        if norm < T::WINDOW_NORM_TOLERANCE {
            return direction.zeros_like();
        }
        if self.discrete {
            d.signum()
        } else {
            d.scaled(T::one() / norm)
        }
    }

    /// Grows the window after an unsuccessful probe.
    ///
    /// The prefix end advances by the current window size (at least a
    /// doubling once the window has stabilized), clamped to the
    /// feasible feature count; once the end reaches that count the
    /// exploration is terminal.
    fn update_current_subset(&mut self) {
        let feasible_count = self.feasible.len();
        if self.window_end >= feasible_count {
            self.state = ExplorationState::Explored;
            return;
        }
        self.window_end += self.window_len;
        self.window_len = self.window_end.min(feasible_count);
        self.window_end = self.window_end.min(feasible_count);
    }

    /// Zeroes direction coordinates that are pinned against a bound.
    ///
    /// Movement is along `x - eta*d`, so a positive entry at a
    /// coordinate sitting on the lower bound (or a negative one on the
    /// upper bound) can only violate the box.
    fn filter_descent_direction(&self, x: &SearchVector<T>, direction: &mut SearchVector<T>) {
        let Some(bounds) = &self.bounds else {
            return;
        };
        for i in 0..x.len() {
            let di = direction.get(i);
            if di == T::zero() {
                continue;
            }
            let xi = x.get(i);
            let pinned_low = di > T::zero() && xi.matches_rounded(bounds.lb()[i]);
            let pinned_high = di < T::zero() && xi.matches_rounded(bounds.ub()[i]);
            if pinned_low || pinned_high {
                direction.set(i, T::zero());
            }
        }
    }

    /// Random ±1 direction with exactly `round(0.5 * n)` negated
    /// entries, sampled without replacement.
    fn random_direction(&mut self, n: usize) -> SearchVector<T> {
        let negated = (0.5 * n as f64).round() as usize;
        let mut dir = DVector::from_element(n, T::one());
        for i in rand::seq::index::sample(&mut self.rng, n, negated) {
            dir[i] = -T::one();
        }
        SearchVector::Dense(dir)
    }

    fn is_infeasible(&self, x: &SearchVector<T>) -> bool {
        self.constraint.as_deref().is_some_and(|c| c.is_violated(x))
            || self.bounds.as_ref().is_some_and(|b| b.is_violated(x))
    }
}
