// crates/tf_physics/src/scenarios/wave.rs

//! Gaussian hump released from rest on a flat bed
//!
//! `η = depth + amplitude · exp(-decay · r²)`, `z = 0`. No closed-form
//! solution; used for conservation and symmetry checks.

use glam::DVec2;
use tf_mesh::Point;

use super::Scenario;

/// Gaussian wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianWave {
    /// Background depth [m]
    pub depth: f64,
    /// Hump height [m]
    pub amplitude: f64,
    /// Decay rate [1/m²]
    pub decay: f64,
    /// Hump centre
    pub center: DVec2,
}

impl Scenario for GaussianWave {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn bed(&self, _p: Point) -> f64 {
        0.0
    }

    fn surface(&self, p: Point, _t: f64) -> f64 {
        self.depth + self.amplitude * (-self.decay * p.distance_squared(self.center)).exp()
    }

    fn velocity(&self, _p: Point, _t: f64) -> DVec2 {
        DVec2::ZERO
    }

    fn has_exact_solution(&self) -> bool {
        false
    }
}
