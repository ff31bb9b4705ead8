// crates/tf_physics/src/scenarios/parabolic_bowl.rs

//! Thacker's radially symmetric oscillation in a paraboloid
//!
//! ```text
//! z(r)   = -h0 (1 - r²/a²)
//! A      = (a² - r0²) / (a² + r0²)
//! ω      = √(8 g h0) / a
//! η(r,t) = h0 [ √(1-A²)/(1 - A cos ωt) - 1 - r²/a² ((1-A²)/(1 - A cos ωt)² - 1) ]
//! u(r,t) = ω A sin ωt / (2 (1 - A cos ωt)) · (x - xc, y - yc)
//! ```
//!
//! The water body oscillates with period `2π/ω` and moving shorelines.
//! Thacker (1981), J. Fluid Mech. 107.

use glam::DVec2;
use std::f64::consts::PI;
use tf_mesh::Point;

use super::Scenario;

/// Parabolic bowl
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParabolicBowl {
    /// Depth at the centre of the bowl at rest [m]
    pub h0: f64,
    /// Radius where the bowl reaches z = 0 [m]
    pub a: f64,
    /// Shape parameter; the shoreline at t = 0 lies at √(a r0) [m]
    pub r0: f64,
    /// Bowl centre
    pub center: DVec2,
    omega: f64,
    amp: f64,
}

impl ParabolicBowl {
    /// Create for a given gravity
    pub fn new(h0: f64, a: f64, r0: f64, center: DVec2, gravity: f64) -> Self {
        let a2 = a * a;
        let r02 = r0 * r0;
        Self {
            h0,
            a,
            r0,
            center,
            omega: (8.0 * gravity * h0).sqrt() / a,
            amp: (a2 - r02) / (a2 + r02),
        }
    }

    /// Angular frequency ω [rad/s]
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Oscillation period [s]
    pub fn period(&self) -> f64 {
        2.0 * PI / self.omega
    }
}

impl Scenario for ParabolicBowl {
    fn name(&self) -> &'static str {
        "parabolic_bowl"
    }

    fn bed(&self, p: Point) -> f64 {
        let r2 = p.distance_squared(self.center);
        -self.h0 * (1.0 - r2 / (self.a * self.a))
    }

    fn surface(&self, p: Point, t: f64) -> f64 {
        let r2 = p.distance_squared(self.center);
        let a_sq = self.amp * self.amp;
        let denom = 1.0 - self.amp * (self.omega * t).cos();
        self.h0
            * ((1.0 - a_sq).sqrt() / denom
                - 1.0
                - r2 / (self.a * self.a) * ((1.0 - a_sq) / (denom * denom) - 1.0))
    }

    fn velocity(&self, p: Point, t: f64) -> DVec2 {
        let wt = self.omega * t;
        let k = 0.5 * self.omega * self.amp * wt.sin() / (1.0 - self.amp * wt.cos());
        (p - self.center) * k
    }

    fn has_exact_solution(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl() -> ParabolicBowl {
        ParabolicBowl::new(0.1, 1.0, 0.8, DVec2::new(2.0, 2.0), 9.81)
    }

    #[test]
    fn test_period() {
        let b = bowl();
        assert!((b.period() - 2.0 * PI / (8.0f64 * 9.81 * 0.1).sqrt()).abs() < 1e-12);
        assert!((b.period() - 2.2430).abs() < 1e-3);
    }

    #[test]
    fn test_initial_shoreline() {
        // at t = 0 the shoreline sits at r = √(a r0)
        let b = bowl();
        let inside = DVec2::new(2.0 + 0.88, 2.0);
        let outside = DVec2::new(2.0 + 0.91, 2.0);
        assert!(b.depth(inside, 0.0) > 0.0);
        assert_eq!(b.depth(outside, 0.0), 0.0);
        assert_eq!(b.velocity(inside, 0.0), DVec2::ZERO);
        assert!((b.depth(b.center, 0.0) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_solution_is_periodic() {
        let b = bowl();
        let p = DVec2::new(2.3, 1.8);
        let t = b.period();
        assert!((b.surface(p, t) - b.surface(p, 0.0)).abs() < 1e-12);
        assert!((b.velocity(p, t) - b.velocity(p, 0.0)).length() < 1e-12);
    }
}
