// crates/tf_physics/src/engine/time_integrator.rs

//! Explicit time integrators
//!
//! All schemes are convex combinations of forward Euler stages (Shu-Osher
//! form), so the positivity of each stage carries over to the full step.
//!
//! ```text
//! Forward Euler:  U^{n+1} = E(U^n)
//! SSP-RK2:        U^(1) = E(U^n)
//!                 U^{n+1} = 1/2 U^n + 1/2 E(U^(1))
//! SSP-RK3:        U^(1) = E(U^n)
//!                 U^(2) = 3/4 U^n + 1/4 E(U^(1))
//!                 U^{n+1} = 1/3 U^n + 2/3 E(U^(2))
//! ```
//!
//! `E` is one complete Euler stage of the spatial operator including source
//! terms and the wet/dry correction.
//!
//! Reference: Gottlieb, Shu & Tadmor (2001), Strong stability-preserving
//! high-order time discretization methods. SIAM Review 43(1).

use tf_config::TimeScheme;

use crate::schemes::CorrectionReport;
use crate::state::FlowState;

/// What one or more Euler stages observed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageReport {
    /// Fastest edge signal seen by the Riemann solver [m/s]
    pub max_wave_speed: f64,
    /// Wet/dry corrections applied
    pub correction: CorrectionReport,
}

impl StageReport {
    /// Accumulate another stage
    pub fn merge(&mut self, other: StageReport) {
        self.max_wave_speed = self.max_wave_speed.max(other.max_wave_speed);
        self.correction.merge(other.correction);
    }
}

/// One forward Euler stage of the semi-discrete system
pub trait EulerOperator {
    /// `output = E(input)` for step `dt`, wet/dry correction included
    fn euler_step(&mut self, input: &FlowState, output: &mut FlowState, dt: f64) -> StageReport;

    /// Wet/dry correction of a combined state
    fn correct(&self, state: &mut FlowState) -> CorrectionReport;
}

/// Time integrator
pub trait TimeIntegrator: Send + Sync {
    /// Scheme name
    fn name(&self) -> &'static str;

    /// Formal order
    fn order(&self) -> u8;

    /// Number of Euler stages per step
    fn stages(&self) -> u8;

    /// Advance `state` by `dt` into `next`; `state` is not modified
    fn advance(
        &mut self,
        op: &mut dyn EulerOperator,
        state: &FlowState,
        next: &mut FlowState,
        dt: f64,
    ) -> StageReport;
}

// ============================================================
// Forward Euler
// ============================================================

/// First-order forward Euler
#[derive(Debug, Clone, Default)]
pub struct ForwardEuler;

impl TimeIntegrator for ForwardEuler {
    fn name(&self) -> &'static str {
        "Forward Euler"
    }

    fn order(&self) -> u8 {
        1
    }

    fn stages(&self) -> u8 {
        1
    }

    fn advance(
        &mut self,
        op: &mut dyn EulerOperator,
        state: &FlowState,
        next: &mut FlowState,
        dt: f64,
    ) -> StageReport {
        op.euler_step(state, next, dt)
    }
}

// ============================================================
// SSP-RK2
// ============================================================

/// Two-stage SSP Runge-Kutta (Heun)
#[derive(Debug, Clone)]
pub struct SspRk2 {
    stage: FlowState,
}

impl SspRk2 {
    /// Allocate the intermediate stage
    pub fn new(n_cells: usize) -> Self {
        Self { stage: FlowState::new(n_cells) }
    }
}

impl TimeIntegrator for SspRk2 {
    fn name(&self) -> &'static str {
        "SSP-RK2"
    }

    fn order(&self) -> u8 {
        2
    }

    fn stages(&self) -> u8 {
        2
    }

    fn advance(
        &mut self,
        op: &mut dyn EulerOperator,
        state: &FlowState,
        next: &mut FlowState,
        dt: f64,
    ) -> StageReport {
        if self.stage.len() != state.len() {
            self.stage = FlowState::new(state.len());
        }
        let mut report = op.euler_step(state, &mut self.stage, dt);
        report.merge(op.euler_step(&self.stage, next, dt));
        next.blend(0.5, state, 0.5);
        report.correction.merge(op.correct(next));
        report
    }
}

// ============================================================
// SSP-RK3
// ============================================================

/// Three-stage SSP Runge-Kutta (Shu-Osher)
#[derive(Debug, Clone)]
pub struct SspRk3 {
    first: FlowState,
    second: FlowState,
}

impl SspRk3 {
    /// Allocate both intermediate stages
    pub fn new(n_cells: usize) -> Self {
        Self {
            first: FlowState::new(n_cells),
            second: FlowState::new(n_cells),
        }
    }
}

impl TimeIntegrator for SspRk3 {
    fn name(&self) -> &'static str {
        "SSP-RK3"
    }

    fn order(&self) -> u8 {
        3
    }

    fn stages(&self) -> u8 {
        3
    }

    fn advance(
        &mut self,
        op: &mut dyn EulerOperator,
        state: &FlowState,
        next: &mut FlowState,
        dt: f64,
    ) -> StageReport {
        if self.first.len() != state.len() {
            *self = Self::new(state.len());
        }
        let mut report = op.euler_step(state, &mut self.first, dt);

        report.merge(op.euler_step(&self.first, &mut self.second, dt));
        self.second.blend(0.25, state, 0.75);
        report.correction.merge(op.correct(&mut self.second));

        report.merge(op.euler_step(&self.second, next, dt));
        next.blend(2.0 / 3.0, state, 1.0 / 3.0);
        report.correction.merge(op.correct(next));
        report
    }
}

/// Build the configured integrator
pub fn create_integrator(scheme: TimeScheme, n_cells: usize) -> Box<dyn TimeIntegrator> {
    match scheme {
        TimeScheme::ForwardEuler => Box::new(ForwardEuler),
        TimeScheme::SspRk2 => Box::new(SspRk2::new(n_cells)),
        TimeScheme::SspRk3 => Box::new(SspRk3::new(n_cells)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dh/dt = -h
    struct Decay;

    impl EulerOperator for Decay {
        fn euler_step(&mut self, input: &FlowState, output: &mut FlowState, dt: f64) -> StageReport {
            for i in 0..input.len() {
                output.h[i] = input.h[i] - dt * input.h[i];
            }
            StageReport { max_wave_speed: 1.0, ..Default::default() }
        }

        fn correct(&self, _state: &mut FlowState) -> CorrectionReport {
            CorrectionReport::default()
        }
    }

    #[test]
    fn test_forward_euler() {
        let state = FlowState::uniform(2, 1.0);
        let mut next = FlowState::new(2);
        let mut integrator = create_integrator(TimeScheme::ForwardEuler, 2);
        integrator.advance(&mut Decay, &state, &mut next, 0.1);
        assert!((next.h[0] - 0.9).abs() < 1e-15);
        assert_eq!(integrator.order(), 1);
    }

    #[test]
    fn test_ssp_rk2_second_order_expansion() {
        let state = FlowState::uniform(2, 1.0);
        let mut next = FlowState::new(2);
        let mut integrator = create_integrator(TimeScheme::SspRk2, 2);
        let report = integrator.advance(&mut Decay, &state, &mut next, 0.1);
        // 1 - dt + dt²/2
        assert!((next.h[1] - 0.905).abs() < 1e-15);
        assert_eq!(report.max_wave_speed, 1.0);
        assert_eq!(state.h[0], 1.0);
        assert_eq!(integrator.stages(), 2);
    }

    #[test]
    fn test_ssp_rk3_third_order_expansion() {
        let state = FlowState::uniform(2, 1.0);
        let mut next = FlowState::new(2);
        let mut integrator = create_integrator(TimeScheme::SspRk3, 2);
        integrator.advance(&mut Decay, &state, &mut next, 0.1);
        // 1 - dt + dt²/2 - dt³/6
        let expected = 1.0 - 0.1 + 0.005 - 0.001 / 6.0;
        assert!((next.h[0] - expected).abs() < 1e-14);
        assert_eq!(state.h, vec![1.0, 1.0]);
        assert_eq!((integrator.order(), integrator.stages()), (3, 3));
        assert_eq!(integrator.name(), "SSP-RK3");
    }

    #[test]
    fn test_ssp_rk3_resizes_stages() {
        let state = FlowState::uniform(3, 2.0);
        let mut next = FlowState::new(3);
        let mut integrator = SspRk3::new(1);
        integrator.advance(&mut Decay, &state, &mut next, 0.5);
        // 2 (1 - 1/2 + 1/8 - 1/48)
        assert!((next.h[2] - 2.0 * (1.0 - 0.5 + 0.125 - 0.125 / 6.0)).abs() < 1e-14);
    }
}
