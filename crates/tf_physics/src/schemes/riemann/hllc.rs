// crates/tf_physics/src/schemes/riemann/hllc.rs

//! HLLC approximate Riemann solver
//!
//! Mass and normal momentum use the HLL average between the Einfeldt wave
//! speeds; the tangential momentum is carried across the contact wave
//! `s_star`, which keeps shear layers sharp.
//!
//! A dry side (depth at or below `h_dry`) is handled with the exact
//! solution of the dry-bed problem: the flux is sampled from the
//! rarefaction fan at `x/t = 0`.

use glam::DVec2;

use super::speeds;
use super::traits::{physical_flux, FaceState, RiemannFlux, RiemannSolver};
use crate::params::NumericalParams;

/// HLLC solver
#[derive(Debug, Clone)]
pub struct HllcSolver {
    gravity: f64,
    h_dry: f64,
}

impl HllcSolver {
    /// Create from numerical parameters
    pub fn new(params: &NumericalParams) -> Self {
        Self {
            gravity: params.gravity,
            h_dry: params.h_dry,
        }
    }

    fn solve_wet(&self, left: FaceState, right: FaceState, normal: DVec2) -> RiemannFlux {
        let (h_l, h_r) = (left.h, right.h);
        let (un_l, ut_l) = left.rotate(normal);
        let (un_r, ut_r) = right.rotate(normal);
        let c_l = (self.gravity * h_l).sqrt();
        let c_r = (self.gravity * h_r).sqrt();

        let (s_l, s_r) = speeds::einfeldt(self.gravity, h_l, h_r, un_l, un_r, c_l, c_r);
        let max_speed = s_l.abs().max(s_r.abs());

        let f_l = physical_flux(self.gravity, h_l, un_l, ut_l);
        let f_r = physical_flux(self.gravity, h_r, un_r, ut_r);

        if s_l >= 0.0 {
            return RiemannFlux::from_rotated(f_l.0, f_l.1, f_l.2, normal, max_speed);
        }
        if s_r <= 0.0 {
            return RiemannFlux::from_rotated(f_r.0, f_r.1, f_r.2, normal, max_speed);
        }

        let inv = 1.0 / (s_r - s_l);
        let mass = (s_r * f_l.0 - s_l * f_r.0 + s_l * s_r * (h_r - h_l)) * inv;
        let mom_n = (s_r * f_l.1 - s_l * f_r.1 + s_l * s_r * (h_r * un_r - h_l * un_l)) * inv;

        let denom = h_r * (un_r - s_r) - h_l * (un_l - s_l);
        let s_star = if denom.abs() > f64::EPSILON * (h_l + h_r) * (s_r - s_l) {
            (s_l * h_r * (un_r - s_r) - s_r * h_l * (un_l - s_l)) / denom
        } else {
            0.5 * (un_l + un_r)
        };
        let mom_t = if s_star >= 0.0 { mass * ut_l } else { mass * ut_r };

        RiemannFlux::from_rotated(mass, mom_n, mom_t, normal, max_speed)
    }

    /// Wet left, dry right: water spreads to the right
    fn solve_right_dry(&self, left: FaceState, normal: DVec2) -> RiemannFlux {
        let (un, ut) = left.rotate(normal);
        let c = (self.gravity * left.h).sqrt();
        let front = un + 2.0 * c;
        let max_speed = (un - c).abs().max(front.abs());

        if un - c >= 0.0 {
            let f = physical_flux(self.gravity, left.h, un, ut);
            return RiemannFlux::from_rotated(f.0, f.1, f.2, normal, max_speed);
        }
        if front <= 0.0 {
            return RiemannFlux { max_wave_speed: max_speed, ..RiemannFlux::ZERO };
        }
        // sonic point of the left rarefaction: u* = c* = (un + 2c) / 3
        let u_star = front / 3.0;
        let h_star = u_star * u_star / self.gravity;
        let f = physical_flux(self.gravity, h_star, u_star, ut);
        RiemannFlux::from_rotated(f.0, f.1, f.2, normal, max_speed)
    }

    /// Dry left, wet right: water spreads to the left
    fn solve_left_dry(&self, right: FaceState, normal: DVec2) -> RiemannFlux {
        let (un, ut) = right.rotate(normal);
        let c = (self.gravity * right.h).sqrt();
        let front = un - 2.0 * c;
        let max_speed = (un + c).abs().max(front.abs());

        if un + c <= 0.0 {
            let f = physical_flux(self.gravity, right.h, un, ut);
            return RiemannFlux::from_rotated(f.0, f.1, f.2, normal, max_speed);
        }
        if front >= 0.0 {
            return RiemannFlux { max_wave_speed: max_speed, ..RiemannFlux::ZERO };
        }
        // sonic point of the right rarefaction: u* = -c* = (un - 2c) / 3
        let u_star = front / 3.0;
        let h_star = u_star * u_star / self.gravity;
        let f = physical_flux(self.gravity, h_star, u_star, ut);
        RiemannFlux::from_rotated(f.0, f.1, f.2, normal, max_speed)
    }
}

impl RiemannSolver for HllcSolver {
    fn name(&self) -> &'static str {
        "HLLC"
    }

    fn solve(&self, left: FaceState, right: FaceState, normal: DVec2) -> RiemannFlux {
        let dry_l = left.h <= self.h_dry;
        let dry_r = right.h <= self.h_dry;
        match (dry_l, dry_r) {
            (true, true) => RiemannFlux::ZERO,
            (true, false) => self.solve_left_dry(right, normal),
            (false, true) => self.solve_right_dry(left, normal),
            (false, false) => self.solve_wet(left, right, normal),
        }
    }
}
