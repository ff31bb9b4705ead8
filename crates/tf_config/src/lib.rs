// crates/tf_config/src/lib.rs

//! TriFlow configuration layer
//!
//! Typed simulation settings read from YAML or JSON files. Every field has a
//! default, so a file only needs to name what it changes. Values are checked
//! by [`SimulationConfig::validate`] before a run starts.
//!
//! # Modules
//!
//! - [`simulation`]: [`SimulationConfig`] and its physics / numerics / run /
//!   output sections
//! - [`scenario`]: benchmark selection and scenario parameters
//! - [`error`]: [`ConfigError`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod scenario;
pub mod simulation;

pub use error::{ConfigError, ConfigResult};
pub use scenario::{GridConfig, ScenarioConfig, ScenarioKind};
pub use simulation::{
    FluxKind, LimiterKind, NumericsConfig, OutputConfig, PhysicsConfig, ReconstructionKind,
    RunConfig, SimulationConfig, TimeScheme, WaveSpeedKind,
};
