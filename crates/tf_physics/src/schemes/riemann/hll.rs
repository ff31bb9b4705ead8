// crates/tf_physics/src/schemes/riemann/hll.rs

//! HLL two-wave solver (Harten, Lax & van Leer 1983)
//!
//! ```text
//! F* = (s_R F_L - s_L F_R + s_L s_R (U_R - U_L)) / (s_R - s_L)
//! ```
//!
//! with `s_L <= 0 <= s_R` taken from the configured [`WaveSpeedKind`]. The
//! same average is applied to mass, normal and tangential momentum, so
//! shear layers are smeared more than with HLLC. Against a dry side the
//! speeds are the exact dry-front speeds `un ± 2c` of the wet side.

use glam::DVec2;
use tf_config::WaveSpeedKind;

use super::speeds;
use super::traits::{physical_flux, FaceState, RiemannFlux, RiemannSolver};
use crate::params::NumericalParams;

/// Speed span below which nothing moves [m/s]
pub(crate) const MIN_SPEED_SPAN: f64 = 1e-10;

/// HLL solver
#[derive(Debug, Clone)]
pub struct HllSolver {
    gravity: f64,
    h_dry: f64,
    wave_speeds: WaveSpeedKind,
}

impl HllSolver {
    /// Create from numerical parameters
    pub fn new(params: &NumericalParams, wave_speeds: WaveSpeedKind) -> Self {
        Self {
            gravity: params.gravity,
            h_dry: params.h_dry,
            wave_speeds,
        }
    }
}

impl RiemannSolver for HllSolver {
    fn name(&self) -> &'static str {
        "HLL"
    }

    fn solve(&self, left: FaceState, right: FaceState, normal: DVec2) -> RiemannFlux {
        let dry_l = left.h <= self.h_dry;
        let dry_r = right.h <= self.h_dry;
        if dry_l && dry_r {
            return RiemannFlux::ZERO;
        }
        let (un_l, ut_l) = left.rotate(normal);
        let (un_r, ut_r) = right.rotate(normal);
        let c_l = (self.gravity * left.h.max(0.0)).sqrt();
        let c_r = (self.gravity * right.h.max(0.0)).sqrt();

        let (s_l, s_r) = match (dry_l, dry_r) {
            (true, _) => (un_r - 2.0 * c_r, un_r + c_r),
            (_, true) => (un_l - c_l, un_l + 2.0 * c_l),
            _ => speeds::estimate(self.wave_speeds, self.gravity, left.h, un_l, right.h, un_r),
        };
        two_wave_flux(
            self.gravity,
            s_l,
            s_r,
            (left.h, un_l, ut_l),
            (right.h, un_r, ut_r),
            normal,
        )
    }
}

/// HLL average between `min(s_l, 0)` and `max(s_r, 0)` of two edge-frame
/// states `(h, un, ut)`
pub(crate) fn two_wave_flux(
    gravity: f64,
    s_l: f64,
    s_r: f64,
    left: (f64, f64, f64),
    right: (f64, f64, f64),
    normal: DVec2,
) -> RiemannFlux {
    let s_l = s_l.min(0.0);
    let s_r = s_r.max(0.0);
    if s_r - s_l <= MIN_SPEED_SPAN {
        return RiemannFlux::ZERO;
    }
    let (h_l, un_l, ut_l) = left;
    let (h_r, un_r, ut_r) = right;
    let f_l = physical_flux(gravity, h_l, un_l, ut_l);
    let f_r = physical_flux(gravity, h_r, un_r, ut_r);

    let inv = 1.0 / (s_r - s_l);
    let avg = |fl: f64, fr: f64, ul: f64, ur: f64| (s_r * fl - s_l * fr + s_l * s_r * (ur - ul)) * inv;
    let mass = avg(f_l.0, f_r.0, h_l, h_r);
    let mom_n = avg(f_l.1, f_r.1, h_l * un_l, h_r * un_r);
    let mom_t = avg(f_l.2, f_r.2, h_l * ut_l, h_r * ut_r);

    RiemannFlux::from_rotated(mass, mom_n, mom_t, normal, (-s_l).max(s_r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(kind: WaveSpeedKind) -> HllSolver {
        HllSolver::new(&NumericalParams::default(), kind)
    }

    fn state(h: f64, u: f64, v: f64) -> FaceState {
        FaceState::new(h, DVec2::new(u, v))
    }

    #[test]
    fn test_consistency_for_every_speed_estimate() {
        let n = DVec2::new(0.6, -0.8);
        let s = state(1.2, 0.4, 0.9);
        let un = s.vel.dot(n);
        for kind in [WaveSpeedKind::Rusanov, WaveSpeedKind::Davis, WaveSpeedKind::Einfeldt] {
            let f = solver(kind).solve(s, s, n);
            assert!((f.mass - s.h * un).abs() < 1e-12, "{kind:?}");
            let expected = s.vel * s.h * un + n * 0.5 * 9.81 * s.h * s.h;
            assert!((f.momentum() - expected).length() < 1e-12, "{kind:?}");
        }
    }

    #[test]
    fn test_rusanov_speeds_match_rusanov_solver() {
        use crate::schemes::riemann::RusanovSolver;
        let l = state(2.0, 0.5, -0.2);
        let r = state(0.8, -0.1, 0.4);
        let hll = solver(WaveSpeedKind::Rusanov).solve(l, r, DVec2::X);
        let rus = RusanovSolver::new(&NumericalParams::default()).solve(l, r, DVec2::X);
        assert!((hll.mass - rus.mass).abs() < 1e-12);
        assert!((hll.momentum() - rus.momentum()).length() < 1e-12);
        assert_eq!(hll.max_wave_speed, rus.max_wave_speed);
    }

    #[test]
    fn test_supersonic_flow_is_upwinded() {
        // un - c > 0 on both sides
        let l = state(0.1, 5.0, 1.0);
        let r = state(0.1, 5.0, -1.0);
        let f = solver(WaveSpeedKind::Davis).solve(l, r, DVec2::X);
        assert!((f.mass - 0.5).abs() < 1e-12);
        assert!((f.momentum_y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dry_sides() {
        let s = solver(WaveSpeedKind::Einfeldt);
        assert_eq!(s.solve(state(0.0, 1.0, 0.0), state(1e-9, 0.0, 0.0), DVec2::X), RiemannFlux::ZERO);
        let f = s.solve(state(1.0, 0.0, 0.0), state(0.0, 0.0, 0.0), DVec2::X);
        let g = s.solve(state(0.0, 0.0, 0.0), state(1.0, 0.0, 0.0), DVec2::X);
        assert!(f.mass > 0.0 && g.mass < 0.0);
        assert!((f.mass + g.mass).abs() < 1e-12);
        assert!((f.max_wave_speed - 2.0 * 9.81f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_normal_is_antisymmetric() {
        let a = state(3.0, 0.4, 1.0);
        let b = state(1.0, -0.2, 0.5);
        let s = solver(WaveSpeedKind::Einfeldt);
        let f = s.solve(a, b, DVec2::Y);
        let g = s.solve(b, a, -DVec2::Y);
        assert!((f.mass + g.mass).abs() < 1e-12);
        assert!((f.momentum() + g.momentum()).length() < 1e-12);
    }
}
