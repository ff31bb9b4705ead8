// crates/tf_physics/src/params.rs

//! Numerical parameters shared by every part of the scheme

use glam::DVec2;
use tf_config::SimulationConfig;

use crate::error::{PhysicsError, PhysicsResult};

/// Numerical parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalParams {
    /// Gravitational acceleration [m/s²]
    pub gravity: f64,
    /// CFL safety factor
    pub cfl: f64,
    /// Depth below which a cell is dry [m]
    pub h_dry: f64,
    /// Upper bound on the time step and dry-domain fallback [s]
    pub dt_max: f64,
    /// Wave speeds below this count as still water [m/s]
    pub min_wave_speed: f64,
}

impl Default for NumericalParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            cfl: 0.45,
            h_dry: 1e-6,
            dt_max: 0.1,
            min_wave_speed: 1e-12,
        }
    }
}

impl NumericalParams {
    /// Take the physics and numerics sections of a run configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            gravity: config.physics.gravity,
            cfl: config.numerics.cfl,
            h_dry: config.physics.h_dry,
            dt_max: config.numerics.dt_max,
            ..Self::default()
        }
    }

    /// Check ranges
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.gravity > 0.0 && self.gravity.is_finite()) {
            return Err(PhysicsError::invalid("gravity", self.gravity, "must be positive"));
        }
        if !(self.cfl > 0.0 && self.cfl < 1.0) {
            return Err(PhysicsError::invalid("cfl", self.cfl, "must be in (0, 1)"));
        }
        if !(self.h_dry >= 0.0 && self.h_dry.is_finite()) {
            return Err(PhysicsError::invalid("h_dry", self.h_dry, "must be non-negative"));
        }
        if !(self.dt_max > 0.0 && self.dt_max.is_finite()) {
            return Err(PhysicsError::invalid("dt_max", self.dt_max, "must be positive"));
        }
        if !(self.min_wave_speed >= 0.0) {
            return Err(PhysicsError::invalid("min_wave_speed", self.min_wave_speed, "must be non-negative"));
        }
        Ok(())
    }

    /// Is a depth dry?
    #[inline]
    pub fn is_dry(&self, h: f64) -> bool {
        h <= self.h_dry
    }

    /// Velocity from momentum, zero in dry cells
    #[inline]
    pub fn safe_velocity(&self, hu: f64, hv: f64, h: f64) -> DVec2 {
        if h > self.h_dry && h > 0.0 {
            DVec2::new(hu / h, hv / h)
        } else {
            DVec2::ZERO
        }
    }

    /// Gravity wave celerity `sqrt(g h)`, zero for non-positive depth
    #[inline]
    pub fn celerity(&self, h: f64) -> f64 {
        (self.gravity * h.max(0.0)).sqrt()
    }
}
