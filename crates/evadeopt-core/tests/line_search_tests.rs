//! Line search through the public API, over dense and sparse points.

use approx::assert_relative_eq;
use evadeopt_core::prelude::*;

#[test]
fn test_search_agrees_for_dense_and_sparse_start() {
    let cost = QuadraticCost::<f64>::simple(4);
    let d = SearchVector::from_slice(&[-1.0, 0.0, 0.0, 0.0]);

    let dense = SearchVector::from_slice(&[1.0, 0.0, 0.5, 0.0]);
    let sparse: SearchVector<f64> = SparseVector::from_pairs(4, vec![(0, 1.0), (2, 0.5)])
        .unwrap()
        .into();
    assert_eq!(dense, sparse);
    let fx = cost.cost(&dense).unwrap();

    let params = LineSearchParams::new().with_eta(0.25);
    let mut ls = LineSearchKind::Bisect.create(params).unwrap();

    let (vd, fd) = ls.search(&cost, None, None, &dense, &d, fx).unwrap();
    let (vs, fs) = ls.search(&cost, None, None, &sparse, &d, fx).unwrap();

    assert_eq!(vd, vs);
    assert_relative_eq!(fd, fs);
    assert!(fd < fx);
}

#[test]
fn test_search_honors_ball_constraint() {
    let cost = QuadraticCost::<f64>::simple(2);
    let x = SearchVector::from_slice(&[1.0, 0.0]);
    let d = SearchVector::from_slice(&[-1.0, 0.0]);
    let fx = cost.cost(&x).unwrap();

    // perturbation budget of 0.3 around the start point
    let ball = L2BallConstraint::new(x.to_dense(), 0.3).unwrap();

    let params = LineSearchParams::new().with_eta(0.25).with_eta_min(0.01);
    let mut ls = LineSearchKind::Bisect.create(params).unwrap();
    let (v, fv) = ls
        .search(&cost, Some(&ball), None, &x, &d, fx)
        .unwrap();

    assert!(fv < fx);
    assert!(!ball.is_violated(&v));
    // the best feasible step sits near the budget boundary
    assert!(v.get(0) >= 0.7 - 1e-9);
    assert!(v.get(0) < 0.8);
}

#[test]
fn test_search_returns_start_when_budget_exhausted() {
    let cost = CountingCost::new(QuadraticCost::<f64>::simple(1));
    let x = SearchVector::from_slice(&[1.0]);
    let ascent = SearchVector::from_slice(&[1.0]);
    let fx = cost.cost(&x).unwrap();

    let params = LineSearchParams::new().with_eta(0.1).with_max_iter(3);
    let mut ls = LineSearchKind::Bisect.create(params).unwrap();
    let before = cost.cost_evals();
    let (v, fv) = ls.search(&cost, None, None, &x, &ascent, fx).unwrap();

    assert_eq!(v, x);
    assert_relative_eq!(fv, fx);
    assert!(cost.cost_evals() - before <= 3);
}
