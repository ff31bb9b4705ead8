// crates/tf_physics/tests/errors.rs

//! Error reporting and boundary selection

use tf_mesh::{MeshTopology, Side, StructuredMesh};
use tf_physics::{
    Bathymetry, BoundaryKind, EngineBuilder, EngineConfig, FlowState, NumericalParams, PhysicsError,
    ShallowWaterEngine,
};

fn mesh() -> StructuredMesh {
    StructuredMesh::new(4, 3, 0.25, 0.25).unwrap()
}

#[test]
fn dimension_mismatch_is_reported_per_array() {
    let m = mesh();
    let n = m.n_triangles();
    let cfg = EngineConfig::default;

    let err = ShallowWaterEngine::new(&m, Bathymetry::flat(n - 1, 0.0), FlowState::uniform(n, 1.0), cfg())
        .err()
        .unwrap();
    assert_eq!(err, PhysicsError::DimensionMismatch { what: "bathymetry", expected: n, actual: n - 1 });

    let err = ShallowWaterEngine::new(&m, Bathymetry::flat(n, 0.0), FlowState::uniform(n + 2, 1.0), cfg())
        .err()
        .unwrap();
    assert!(matches!(err, PhysicsError::DimensionMismatch { what: "h", actual, .. } if actual == n + 2));

    let mut state = FlowState::uniform(n, 1.0);
    state.hv.pop();
    let err = ShallowWaterEngine::new(&m, Bathymetry::flat(n, 0.0), state, cfg()).err().unwrap();
    assert!(matches!(err, PhysicsError::DimensionMismatch { what: "hv", .. }));
}

#[test]
fn invalid_parameters_are_rejected() {
    let m = mesh();
    let params = NumericalParams { cfl: 1.5, ..Default::default() };
    let err = EngineBuilder::new(&m).params(params).build().err().unwrap();
    assert!(matches!(err, PhysicsError::InvalidParameter { name: "cfl", .. }));
}

#[test]
fn non_finite_state_is_not_committed() {
    let m = mesh();
    let n = m.n_triangles();
    let mut state = FlowState::uniform(n, 1.0);
    state.hu[5] = f64::NAN;
    let mut engine = EngineBuilder::new(&m).initial_state(state.clone()).build().unwrap();

    // never fails, even with a poisoned state
    let dt = engine.compute_stable_dt();
    assert!(dt > 0.0 && dt.is_finite());

    match engine.step(dt) {
        Err(PhysicsError::NumericalInstability { time, triangle, .. }) => {
            assert_eq!(time, 0.0);
            assert!(triangle < n);
        }
        other => panic!("expected instability, got {other:?}"),
    }
    assert_eq!(engine.time(), 0.0);
    assert_eq!(engine.step_count(), 0);
    assert!(engine.state().hu[5].is_nan());
    assert_eq!(engine.state().h, state.h);
}

#[test]
fn invalid_time_steps_are_rejected() {
    let m = mesh();
    let n = m.n_triangles();
    let mut engine = EngineBuilder::new(&m).initial_state(FlowState::uniform(n, 1.0)).build().unwrap();
    for dt in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
        assert!(matches!(engine.step(dt), Err(PhysicsError::InvalidTimeStep { .. })));
    }
    assert_eq!(engine.step_count(), 0);
}

#[test]
fn interior_edge_cannot_take_a_boundary_condition() {
    let m = mesh();
    let mut engine = EngineBuilder::new(&m).build().unwrap();
    // first interior edge of the lower-left triangle
    let t = m.triangle_at(0, 0, false);
    let k = (0..3).find(|&k| m.neighbor_of(t, k).is_some()).unwrap();
    assert!(matches!(
        engine.set_boundary(t, k, BoundaryKind::Open),
        Err(PhysicsError::InvalidParameter { .. })
    ));
    assert!(engine.set_boundary(t, 99, BoundaryKind::Open).is_err());
}

#[test]
fn open_channel_keeps_uniform_flow() {
    let m = StructuredMesh::new(10, 2, 0.1, 0.1).unwrap();
    let n = m.n_triangles();
    let uniform = || FlowState::from_components(vec![1.0; n], vec![0.5; n], vec![0.0; n]).unwrap();

    let mut open = ShallowWaterEngine::new(&m, Bathymetry::flat(n, 0.0), uniform(), EngineConfig::default()).unwrap();
    let inflow: Vec<_> = m.boundary_edges(Side::Left).collect();
    let outflow: Vec<_> = m.boundary_edges(Side::Right).collect();
    assert_eq!(open.set_boundaries(inflow, BoundaryKind::Open).unwrap(), 2);
    assert_eq!(open.set_boundaries(outflow, BoundaryKind::Open).unwrap(), 2);
    open.run_steps(20).unwrap();
    for t in 0..n {
        assert!((open.state().h[t] - 1.0).abs() < 1e-12);
        assert!((open.state().hu[t] - 0.5).abs() < 1e-12);
        assert!(open.state().hv[t].abs() < 1e-12);
    }

    // the same flow against walls piles up at the right end
    let mut closed = ShallowWaterEngine::new(&m, Bathymetry::flat(n, 0.0), uniform(), EngineConfig::default()).unwrap();
    closed.run_steps(20).unwrap();
    let right = m.boundary_triangle(Side::Right, 0).unwrap();
    assert!(closed.state().h[right] > 1.0 + 1e-6);
}
