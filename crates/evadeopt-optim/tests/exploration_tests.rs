//! End-to-end exploration loops over dense and sparse points.

use evadeopt_core::prelude::*;
use evadeopt_optim::{DescentDirectionExplorer, ExplorerConfig};

/// Smooth objective that hides its gradient, forcing random directions.
#[derive(Debug)]
struct BlackBoxQuadratic;

impl CostFunction<f64> for BlackBoxQuadratic {
    fn cost(&self, x: &SearchVector<f64>) -> Result<f64> {
        Ok(0.5 * x.norm().powi(2))
    }
}

/// Objective whose advertised gradient is an ascent ray.
#[derive(Debug)]
struct MisleadingGradient;

impl CostFunction<f64> for MisleadingGradient {
    fn cost(&self, x: &SearchVector<f64>) -> Result<f64> {
        Ok(0.5 * x.norm().powi(2))
    }

    fn has_gradient(&self) -> bool {
        true
    }

    fn gradient(&self, x: &SearchVector<f64>) -> Result<SearchVector<f64>> {
        Ok(x.scaled(-1.0))
    }
}

/// Outer attack loop: accept improvements until a direction is
/// exhausted without progress.
fn run_loop(
    explorer: &mut DescentDirectionExplorer<f64, QuadraticCost<f64>>,
    bounds: &BoxBounds<f64>,
    mut x: SearchVector<f64>,
    max_steps: usize,
) -> (SearchVector<f64>, f64) {
    let mut fx = explorer.cost_fn().cost(&x).unwrap();
    for _ in 0..max_steps {
        explorer.set_descent_direction(&x).unwrap();
        let (v, fv) = explorer.explore_descent_direction(&x, fx).unwrap();
        if fv >= fx {
            break;
        }
        assert!(!bounds.is_violated(&v), "accepted point left the box");
        x = v;
        fx = fv;
    }
    (x, fx)
}

#[test]
fn test_gradient_loop_converges_on_quadratic() {
    let bounds = BoxBounds::uniform(5, -1.0, 1.0).unwrap();
    let config = ExplorerConfig::new().with_n_dimensions(1).with_eta(0.05);
    let mut explorer =
        DescentDirectionExplorer::new(QuadraticCost::simple(5), None, Some(bounds.clone()), config)
            .unwrap();

    let x0 = SearchVector::from_slice(&[1.0, 1.0, 1.0, 1.0, 1.0]);
    let f0 = explorer.cost_fn().cost(&x0).unwrap();
    let (_, fx) = run_loop(&mut explorer, &bounds, x0, 200);

    assert!(fx < f0);
    assert!(fx < 0.1, "loop stalled far from the minimum: {fx}");
}

#[test]
fn test_loop_from_sparse_start() {
    let bounds = BoxBounds::uniform(6, 0.0, 1.0).unwrap();
    let config = ExplorerConfig::new().with_n_dimensions(1).with_eta(0.05);
    let mut explorer =
        DescentDirectionExplorer::new(QuadraticCost::simple(6), None, Some(bounds.clone()), config)
            .unwrap();

    let x0: SearchVector<f64> = SparseVector::from_pairs(6, vec![(1, 0.8), (4, 0.6)])
        .unwrap()
        .into();
    let fx = explorer.cost_fn().cost(&x0).unwrap();
    explorer.set_descent_direction(&x0).unwrap();

    // zero coordinates sit on the lower bound with a zero gradient
    // entry, only the two stored features are feasible
    let (v, fv) = explorer.explore_descent_direction(&x0, fx).unwrap();
    assert!(fv < fx);
    assert!(!bounds.is_violated(&v));
    assert_eq!(v.get(0), 0.0);
    assert_eq!(v.get(2), 0.0);
}

#[test]
fn test_random_direction_loop_never_increases() {
    let bounds = BoxBounds::uniform(6, 0.0, 1.0).unwrap();
    let config = ExplorerConfig::new()
        .with_n_dimensions(2)
        .with_eta(0.05)
        .with_seed(11);
    let mut explorer =
        DescentDirectionExplorer::new(BlackBoxQuadratic, None, Some(bounds.clone()), config)
            .unwrap();

    let mut x = SearchVector::from_slice(&[0.7, 0.7, 0.7, 0.7, 0.7, 0.7]);
    let mut fx = explorer.cost_fn().cost(&x).unwrap();
    let f0 = fx;
    for _ in 0..20 {
        explorer.set_descent_direction(&x).unwrap();
        let (v, fv) = explorer.explore_descent_direction(&x, fx).unwrap();
        assert!(fv <= fx, "exploration returned a worse point");
        assert!(!bounds.is_violated(&v));
        x = v;
        fx = fv;
    }
    assert!(fx <= f0);
}

#[test]
fn test_discrete_mode_moves_window_coordinates_together() {
    let bounds = BoxBounds::uniform(4, 0.0, 1.0).unwrap();
    let config = ExplorerConfig::new()
        .with_n_dimensions(2)
        .with_eta(0.05)
        .with_discrete(true);
    let mut explorer =
        DescentDirectionExplorer::new(QuadraticCost::simple(4), None, Some(bounds), config)
            .unwrap();

    let x = SearchVector::from_slice(&[0.5, 0.5, 0.5, 0.5]);
    let fx = explorer.cost_fn().cost(&x).unwrap();
    explorer.set_descent_direction(&x).unwrap();

    let (v, fv) = explorer.explore_descent_direction(&x, fx).unwrap();
    assert!(fv < fx);
    // sign direction over the first window moves both coordinates by
    // the same amount and leaves the rest untouched
    assert!(v.get(0) < 0.5);
    assert_eq!(v.get(0), v.get(1));
    assert_eq!(v.get(2), 0.5);
    assert_eq!(v.get(3), 0.5);
}

#[test]
fn test_ball_constraint_fails_fast_before_line_search() {
    let x = SearchVector::from_slice(&[0.5, 0.5, 0.5]);
    let ball = L2BallConstraint::new(x.to_dense(), 0.01).unwrap();
    let cost = CountingCost::new(QuadraticCost::<f64>::simple(3));
    let config = ExplorerConfig::new().with_n_dimensions(1).with_eta(0.05);
    let mut explorer =
        DescentDirectionExplorer::new(cost, Some(Box::new(ball)), None, config).unwrap();

    let fx = 0.375;
    explorer.set_descent_direction(&x).unwrap();
    let (v, fv) = explorer.explore_descent_direction(&x, fx).unwrap();

    // the unit probe already leaves the perturbation budget, so the
    // line search never spends an objective evaluation
    assert_eq!(v, x);
    assert_eq!(fv, fx);
    assert_eq!(explorer.cost_fn().cost_evals(), 0);
    assert_eq!(explorer.cost_fn().gradient_evals(), 1);
}

#[test]
fn test_exhaustive_sweep_spends_logarithmic_searches() {
    let bounds = BoxBounds::uniform(8, 0.0, 1.0).unwrap();
    let cost = CountingCost::new(MisleadingGradient);
    let config = ExplorerConfig::new().with_n_dimensions(1).with_eta(0.05);
    let mut explorer =
        DescentDirectionExplorer::new(cost, None, Some(bounds), config).unwrap();

    let x = SearchVector::from_slice(&[0.5; 8]);
    let fx = explorer.cost_fn().cost(&x).unwrap();
    let evals_before = explorer.cost_fn().cost_evals();

    explorer.set_descent_direction(&x).unwrap();
    let (v, fv) = explorer.explore_descent_direction(&x, fx).unwrap();

    assert_eq!(v, x);
    assert_eq!(fv, fx);
    assert!(explorer.explored());
    // windows 1, 2, 4, 8: four searches, each rejected after one probe
    assert_eq!(explorer.cost_fn().cost_evals() - evals_before, 4);
}
