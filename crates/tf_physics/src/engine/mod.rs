// crates/tf_physics/src/engine/mod.rs

//! Time-discretization engine
//!
//! - `timestep` - CFL time step
//! - `time_integrator` - forward Euler, SSP-RK2 and SSP-RK3
//! - `solver` - the [`ShallowWaterEngine`] and its builder

pub mod solver;
pub mod time_integrator;
pub mod timestep;

pub use solver::{EngineBuilder, EngineConfig, EngineStats, ShallowWaterEngine};
pub use time_integrator::{
    create_integrator, EulerOperator, ForwardEuler, SspRk2, SspRk3, StageReport, TimeIntegrator,
};
pub use timestep::{CflCalculator, TimeStepInfo};
