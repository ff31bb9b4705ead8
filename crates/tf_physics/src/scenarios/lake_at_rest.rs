// crates/tf_physics/src/scenarios/lake_at_rest.rs

//! Still water over a Gaussian bump
//!
//! `z = floor + bump_height · exp(-r² / bump_radius²)`, flat surface, no
//! motion. The exact solution is the initial state forever; a bump that
//! pierces the surface leaves a dry island.

use glam::DVec2;
use tf_mesh::Point;

use super::Scenario;

/// Lake at rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LakeAtRest {
    /// Free surface elevation [m]
    pub surface: f64,
    /// Bed elevation far from the bump [m]
    pub floor: f64,
    /// Bump height above the floor [m]
    pub bump_height: f64,
    /// Bump e-folding radius [m]
    pub bump_radius: f64,
    /// Bump centre
    pub center: DVec2,
}

impl Scenario for LakeAtRest {
    fn name(&self) -> &'static str {
        "lake_at_rest"
    }

    fn bed(&self, p: Point) -> f64 {
        let r2 = p.distance_squared(self.center);
        self.floor + self.bump_height * (-r2 / (self.bump_radius * self.bump_radius)).exp()
    }

    fn surface(&self, _p: Point, _t: f64) -> f64 {
        self.surface
    }

    fn velocity(&self, _p: Point, _t: f64) -> DVec2 {
        DVec2::ZERO
    }

    fn has_exact_solution(&self) -> bool {
        true
    }
}
