// crates/tf_physics/tests/timestep.rs

//! Stable time step behaviour

mod common;

use tf_mesh::{MeshTopology, StructuredMesh};
use tf_physics::{Bathymetry, EngineBuilder, EngineConfig, FlowState, NumericalParams};

#[test]
fn dry_domain_falls_back_to_dt_max() {
    let mesh = common::jittered_mesh(6, 1.0);
    let params = NumericalParams { dt_max: 0.25, ..Default::default() };
    let n = mesh.n_triangles();
    let mut engine = EngineBuilder::new(&mesh)
        .params(params)
        .initial_state(FlowState::uniform(n, 0.5 * params.h_dry))
        .build()
        .unwrap();
    assert_eq!(engine.compute_stable_dt(), 0.25);
    assert_eq!(engine.time_step_info().limiting_triangle, None);

    // stepping a dry domain changes nothing
    let before = engine.state().clone();
    engine.step(0.25).unwrap();
    assert_eq!(engine.state(), &before);
}

#[test]
fn stable_dt_is_positive_finite_and_bounded() {
    let mesh = StructuredMesh::new(8, 8, 0.125, 0.125).unwrap();
    let n = mesh.n_triangles();
    let mut state = FlowState::uniform(n, 1.0);
    state.hu[10] = 5.0;
    let engine = EngineBuilder::new(&mesh).initial_state(state).build().unwrap();
    let info = engine.time_step_info();
    assert!(info.dt > 0.0 && info.dt.is_finite());
    assert!(info.dt <= engine.config().params.dt_max);

    // limited by the fast triangle or one of its neighbours
    let t = info.limiting_triangle.unwrap();
    let near_fast = t == 10 || (0..3).any(|k| mesh.neighbor_of(t, k) == Some(10));
    assert!(near_fast, "limiting triangle {t}");
}

#[test]
fn faster_flow_gives_smaller_step() {
    let mesh = StructuredMesh::new(8, 8, 0.125, 0.125).unwrap();
    let n = mesh.n_triangles();
    let still = EngineBuilder::new(&mesh)
        .initial_state(FlowState::uniform(n, 1.0))
        .build()
        .unwrap();
    let moving = EngineBuilder::new(&mesh)
        .initial_state(FlowState::from_components(vec![1.0; n], vec![2.0; n], vec![0.0; n]).unwrap())
        .build()
        .unwrap();
    assert!(moving.compute_stable_dt() < still.compute_stable_dt());
}

#[test]
fn wet_dry_run_at_stable_dt_never_fails() {
    let mesh = common::jittered_mesh(16, 1.0);
    let n = mesh.n_triangles();
    // sloping beach, water on the deep half
    let bed = Bathymetry::from_fn(&mesh, |p| 0.5 * (p.x - 0.5));
    let h: Vec<f64> = (0..n).map(|t| (0.1 - bed.get(t)).max(0.0)).collect();
    let mut u = vec![0.0; n];
    for (t, hu) in u.iter_mut().enumerate() {
        *hu = 0.5 * h[t];
    }
    let state = FlowState::from_components(h, u, vec![0.0; n]).unwrap();
    let mut engine = EngineBuilder::new(&mesh)
        .bathymetry(bed)
        .initial_state(state)
        .config(EngineConfig::default())
        .build()
        .unwrap();
    for _ in 0..300 {
        let dt = engine.compute_stable_dt();
        assert!(dt > 0.0 && dt.is_finite());
        engine.step(dt).unwrap();
    }
    assert!(engine.state().h.iter().all(|&h| h >= 0.0 && h.is_finite()));
}
