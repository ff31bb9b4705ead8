// crates/tf_physics/src/engine/timestep.rs

//! CFL time step
//!
//! ```text
//! Δt = C · min_t ( r_t / s_t ),   r_t = 2 A_t / P_t  (inradius)
//! ```
//!
//! `s_t` is the fastest signal over the three edges of triangle `t`,
//! looking at both sides of each edge: `|u·n| + √(gh)` when both are wet,
//! `|u·n| + 2√(gh)` of the wet side (the dry-bed front speed) when the
//! other side is dry. Boundary edges use the triangle's own state; a wall
//! ghost has the same speed.
//!
//! If no triangle carries a signal faster than `min_wave_speed` (a dry or
//! motionless domain) the step is `dt_max`. The result is always clamped
//! to `dt_max` and never fails; non-finite speeds are skipped.

use glam::DVec2;
use rayon::prelude::*;
use tf_mesh::MeshTopology;

use crate::params::NumericalParams;
use crate::state::FlowState;

/// Result of a CFL evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStepInfo {
    /// Stable step [s]
    pub dt: f64,
    /// Fastest signal in the domain [m/s]
    pub max_wave_speed: f64,
    /// Triangle that limits the step, `None` when `dt_max` applies
    pub limiting_triangle: Option<usize>,
}

/// CFL time step calculator
///
/// The inradius of every triangle is computed once at construction.
#[derive(Debug, Clone)]
pub struct CflCalculator {
    params: NumericalParams,
    inradius: Vec<f64>,
    parallel: bool,
}

impl CflCalculator {
    /// Precompute length scales for a mesh
    pub fn new<M: MeshTopology + ?Sized>(mesh: &M, params: NumericalParams, parallel: bool) -> Self {
        let inradius = (0..mesh.n_triangles()).map(|t| mesh.inradius(t)).collect();
        Self { params, inradius, parallel }
    }

    /// Smallest length scale
    pub fn min_inradius(&self) -> f64 {
        self.inradius.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Stable step for the given state
    pub fn compute<M: MeshTopology + ?Sized>(&self, mesh: &M, state: &FlowState) -> TimeStepInfo {
        let per_triangle = |t: usize| -> (f64, f64, usize) {
            let s = self.triangle_speed(mesh, state, t);
            let ratio = if s > self.params.min_wave_speed {
                self.inradius[t] / s
            } else {
                f64::INFINITY
            };
            (ratio, s, t)
        };
        let reduce = |a: (f64, f64, usize), b: (f64, f64, usize)| {
            // lowest triangle index wins ties so both paths agree
            let (ratio, t) = if b.0 < a.0 || (b.0 == a.0 && b.2 < a.2) {
                (b.0, b.2)
            } else {
                (a.0, a.2)
            };
            (ratio, a.1.max(b.1), t)
        };
        let identity = (f64::INFINITY, 0.0, usize::MAX);

        let n = self.inradius.len();
        let (ratio, max_speed, t) = if self.parallel {
            (0..n).into_par_iter().map(per_triangle).reduce(|| identity, reduce)
        } else {
            (0..n).map(per_triangle).fold(identity, reduce)
        };

        if ratio.is_finite() {
            TimeStepInfo {
                dt: (self.params.cfl * ratio).min(self.params.dt_max),
                max_wave_speed: max_speed,
                limiting_triangle: Some(t),
            }
        } else {
            TimeStepInfo {
                dt: self.params.dt_max,
                max_wave_speed: max_speed,
                limiting_triangle: None,
            }
        }
    }

    /// Fastest signal over the edges of one triangle
    fn triangle_speed<M: MeshTopology + ?Sized>(&self, mesh: &M, state: &FlowState, t: usize) -> f64 {
        let p = &self.params;
        let (h_t, vel_t) = (state.h[t], p.safe_velocity(state.hu[t], state.hv[t], state.h[t]));
        let mut speed = 0.0f64;
        for k in 0..3 {
            let normal = mesh.edge_geometry(t, k).normal;
            let (h_n, vel_n) = match mesh.neighbor_of(t, k) {
                Some(nb) => (state.h[nb], p.safe_velocity(state.hu[nb], state.hv[nb], state.h[nb])),
                None => (h_t, vel_t),
            };
            speed = speed.max(self.edge_speed(h_t, vel_t, h_n, vel_n, normal));
        }
        speed
    }

    #[inline]
    fn edge_speed(&self, h_a: f64, vel_a: DVec2, h_b: f64, vel_b: DVec2, normal: DVec2) -> f64 {
        let p = &self.params;
        let signal = |h: f64, vel: DVec2, factor: f64| vel.dot(normal).abs() + factor * p.celerity(h);
        match (p.is_dry(h_a), p.is_dry(h_b)) {
            (true, true) => 0.0,
            (false, true) => signal(h_a, vel_a, 2.0),
            (true, false) => signal(h_b, vel_b, 2.0),
            (false, false) => signal(h_a, vel_a, 1.0).max(signal(h_b, vel_b, 1.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_mesh::StructuredMesh;

    fn mesh() -> StructuredMesh {
        StructuredMesh::new(4, 4, 0.25, 0.25).unwrap()
    }

    #[test]
    fn test_dry_domain_uses_dt_max() {
        let m = mesh();
        let cfl = CflCalculator::new(&m, NumericalParams::default(), false);
        let info = cfl.compute(&m, &FlowState::new(m.n_triangles()));
        assert_eq!(info.dt, 0.1);
        assert_eq!(info.limiting_triangle, None);
    }

    #[test]
    fn test_still_water() {
        let m = mesh();
        let p = NumericalParams { dt_max: 10.0, ..Default::default() };
        let cfl = CflCalculator::new(&m, p, false);
        let info = cfl.compute(&m, &FlowState::uniform(m.n_triangles(), 1.0));
        let c = 9.81f64.sqrt();
        assert!((info.max_wave_speed - c).abs() < 1e-12);
        assert!((info.dt - p.cfl * cfl.min_inradius() / c).abs() < 1e-12);
    }

    #[test]
    fn test_dt_max_clamp() {
        let m = mesh();
        let p = NumericalParams { dt_max: 1e-4, ..Default::default() };
        let cfl = CflCalculator::new(&m, p, false);
        let info = cfl.compute(&m, &FlowState::uniform(m.n_triangles(), 1.0));
        assert_eq!(info.dt, 1e-4);
    }

    #[test]
    fn test_dry_front_speed() {
        let m = mesh();
        let mut s = FlowState::new(m.n_triangles());
        s.h[5] = 1.0;
        let cfl = CflCalculator::new(&m, NumericalParams::default(), false);
        let info = cfl.compute(&m, &s);
        assert!((info.max_wave_speed - 2.0 * 9.81f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let m = mesh();
        let mut s = FlowState::uniform(m.n_triangles(), 1.0);
        s.hu[7] = 3.0;
        s.h[11] = f64::NAN;
        let p = NumericalParams::default();
        let a = CflCalculator::new(&m, p, false).compute(&m, &s);
        let b = CflCalculator::new(&m, p, true).compute(&m, &s);
        assert_eq!(a, b);
        assert!(a.dt > 0.0 && a.dt.is_finite());
    }
}
