// crates/tf_physics/src/scenarios/compare.rs

//! Error norms against an analytic depth

use serde::{Deserialize, Serialize};
use tf_mesh::MeshTopology;

use super::Scenario;
use crate::state::FlowState;

/// Depth error norms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorNorms {
    /// `Σ |h - h_exact| A` [m³]
    pub l1: f64,
    /// `√(Σ (h - h_exact)² A)`
    pub l2: f64,
    /// `max |h - h_exact|` [m]
    pub linf: f64,
    /// `l1 / Σ h_exact A`
    pub relative_l1: f64,
}

/// Compare the depth at centroids with the scenario's solution at time `t`
pub fn compare<M: MeshTopology + ?Sized>(
    mesh: &M,
    state: &FlowState,
    scenario: &dyn Scenario,
    t: f64,
) -> ErrorNorms {
    let mut norms = ErrorNorms::default();
    let mut exact_volume = 0.0;
    let mut l2_sum = 0.0;
    for tri in 0..state.len() {
        let area = mesh.area(tri);
        let exact = scenario.depth(mesh.centroid(tri), t);
        let err = (state.h[tri] - exact).abs();
        exact_volume += exact * area;
        norms.l1 += err * area;
        l2_sum += err * err * area;
        norms.linf = norms.linf.max(err);
    }
    norms.l2 = l2_sum.sqrt();
    norms.relative_l1 = if exact_volume > 0.0 { norms.l1 / exact_volume } else { norms.l1 };
    norms
}
