// crates/tf_physics/src/schemes/riemann/rusanov.rs

//! Rusanov (local Lax-Friedrichs) solver
//!
//! ```text
//! F* = 0.5 (F_L + F_R) - 0.5 λ (U_R - U_L),   λ = max(|un_L| + c_L, |un_R| + c_R)
//! ```
//!
//! More diffusive than HLLC, and never returns a flux out of a dry cell
//! larger than its neighbour can supply.

use glam::DVec2;

use super::traits::{physical_flux, FaceState, RiemannFlux, RiemannSolver};
use crate::params::NumericalParams;

/// Rusanov solver
#[derive(Debug, Clone)]
pub struct RusanovSolver {
    gravity: f64,
    h_dry: f64,
}

impl RusanovSolver {
    /// Create from numerical parameters
    pub fn new(params: &NumericalParams) -> Self {
        Self {
            gravity: params.gravity,
            h_dry: params.h_dry,
        }
    }
}

impl RiemannSolver for RusanovSolver {
    fn name(&self) -> &'static str {
        "Rusanov"
    }

    fn solve(&self, left: FaceState, right: FaceState, normal: DVec2) -> RiemannFlux {
        if left.h <= self.h_dry && right.h <= self.h_dry {
            return RiemannFlux::ZERO;
        }
        let (un_l, ut_l) = left.rotate(normal);
        let (un_r, ut_r) = right.rotate(normal);
        let c_l = (self.gravity * left.h.max(0.0)).sqrt();
        let c_r = (self.gravity * right.h.max(0.0)).sqrt();
        let lambda = (un_l.abs() + c_l).max(un_r.abs() + c_r);

        let f_l = physical_flux(self.gravity, left.h, un_l, ut_l);
        let f_r = physical_flux(self.gravity, right.h, un_r, ut_r);

        let mass = 0.5 * (f_l.0 + f_r.0) - 0.5 * lambda * (right.h - left.h);
        let mom_n = 0.5 * (f_l.1 + f_r.1) - 0.5 * lambda * (right.h * un_r - left.h * un_l);
        let mom_t = 0.5 * (f_l.2 + f_r.2) - 0.5 * lambda * (right.h * ut_r - left.h * ut_l);

        RiemannFlux::from_rotated(mass, mom_n, mom_t, normal, lambda)
    }
}
