// crates/tf_physics/src/sources.rs

//! Source terms
//!
//! Coriolis and linear bottom friction, applied explicitly within each
//! Euler stage:
//!
//! ```text
//! d(hu)/dt =  f hv - τ hu
//! d(hv)/dt = -f hu - τ hv
//! ```
//!
//! Neither term touches the depth, so mass conservation is unaffected.

use tf_config::PhysicsConfig;

use crate::state::FlowState;

/// Momentum source terms
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourceTerms {
    /// Coriolis parameter f [1/s]
    pub coriolis: f64,
    /// Linear friction coefficient τ [1/s]
    pub friction: f64,
}

impl SourceTerms {
    /// From the physics section of a run configuration
    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            coriolis: config.coriolis,
            friction: config.friction,
        }
    }

    /// Any non-zero term?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.coriolis != 0.0 || self.friction != 0.0
    }

    /// Add `dt * S(input)` to `output`
    pub fn apply(&self, input: &FlowState, output: &mut FlowState, dt: f64) {
        if !self.is_active() {
            return;
        }
        let (f, tau) = (self.coriolis, self.friction);
        for i in 0..input.len() {
            let (hu, hv) = (input.hu[i], input.hv[i]);
            output.hu[i] += dt * (f * hv - tau * hu);
            output.hv[i] += dt * (-f * hu - tau * hv);
        }
    }
}
