// crates/tf_physics/src/schemes/riemann/traits.rs

//! Common Riemann solver interface

use glam::DVec2;

/// State on one side of an edge after reconstruction
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceState {
    /// Water depth [m]
    pub h: f64,
    /// Velocity [m/s]
    pub vel: DVec2,
}

impl FaceState {
    /// Create a face state
    #[inline]
    pub fn new(h: f64, vel: DVec2) -> Self {
        Self { h, vel }
    }

    /// Normal and tangential velocity for a unit normal
    #[inline]
    pub fn rotate(&self, normal: DVec2) -> (f64, f64) {
        (self.vel.dot(normal), self.vel.dot(normal.perp()))
    }
}

/// Numerical flux through a unit-length edge
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiemannFlux {
    /// Mass flux [m²/s]
    pub mass: f64,
    /// x momentum flux [m³/s²]
    pub momentum_x: f64,
    /// y momentum flux [m³/s²]
    pub momentum_y: f64,
    /// Largest signal speed [m/s]
    pub max_wave_speed: f64,
}

impl RiemannFlux {
    /// Zero flux
    pub const ZERO: Self = Self {
        mass: 0.0,
        momentum_x: 0.0,
        momentum_y: 0.0,
        max_wave_speed: 0.0,
    };

    /// Momentum flux vector
    #[inline]
    pub fn momentum(&self) -> DVec2 {
        DVec2::new(self.momentum_x, self.momentum_y)
    }

    /// Back from the edge frame (normal, tangent) to x/y
    pub fn from_rotated(mass: f64, flux_n: f64, flux_t: f64, normal: DVec2, max_wave_speed: f64) -> Self {
        let momentum = normal * flux_n + normal.perp() * flux_t;
        Self {
            mass,
            momentum_x: momentum.x,
            momentum_y: momentum.y,
            max_wave_speed,
        }
    }

    /// All components finite
    pub fn is_valid(&self) -> bool {
        self.mass.is_finite()
            && self.momentum_x.is_finite()
            && self.momentum_y.is_finite()
            && self.max_wave_speed.is_finite()
            && self.max_wave_speed >= 0.0
    }
}

/// Approximate Riemann solver
///
/// `normal` is the unit normal pointing from `left` to `right`. The result
/// is the flux per unit edge length in that direction.
pub trait RiemannSolver: Send + Sync {
    /// Solver name
    fn name(&self) -> &'static str;

    /// Flux between two face states
    fn solve(&self, left: FaceState, right: FaceState, normal: DVec2) -> RiemannFlux;
}

/// Physical flux in the edge frame: `(h un, h un² + g h²/2, h un ut)`
#[inline]
pub(crate) fn physical_flux(gravity: f64, h: f64, un: f64, ut: f64) -> (f64, f64, f64) {
    (h * un, h * un * un + 0.5 * gravity * h * h, h * un * ut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_round_trip() {
        let n = DVec2::new(0.6, 0.8);
        let s = FaceState::new(1.0, DVec2::new(2.0, -1.0));
        let (un, ut) = s.rotate(n);
        let f = RiemannFlux::from_rotated(0.0, un, ut, n, 0.0);
        assert!((f.momentum() - s.vel).length() < 1e-14);
    }

    #[test]
    fn test_is_valid() {
        assert!(RiemannFlux::ZERO.is_valid());
        let bad = RiemannFlux { mass: f64::NAN, ..RiemannFlux::ZERO };
        assert!(!bad.is_valid());
    }
}
