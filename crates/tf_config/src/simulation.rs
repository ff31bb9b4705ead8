// crates/tf_config/src/simulation.rs

//! SimulationConfig - complete run configuration
//!
//! Loaded from YAML (`.yaml`, `.yml`) or JSON (`.json`), chosen by file
//! extension. Missing sections and fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::scenario::ScenarioConfig;

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Physical constants
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// Scheme selection and stability settings
    #[serde(default)]
    pub numerics: NumericsConfig,

    /// Stopping criteria and progress reporting
    #[serde(default)]
    pub run: RunConfig,

    /// Benchmark and domain
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Snapshot output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Physical constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravitational acceleration [m/s²]
    #[serde(default = "default_gravity")]
    pub gravity: f64,

    /// Depth below which a cell is dry [m]
    #[serde(default = "default_h_dry")]
    pub h_dry: f64,

    /// Coriolis parameter [1/s]
    #[serde(default)]
    pub coriolis: f64,

    /// Linear bottom friction coefficient [1/s]
    #[serde(default)]
    pub friction: f64,
}

fn default_gravity() -> f64 { 9.81 }
fn default_h_dry() -> f64 { 1e-6 }

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            h_dry: default_h_dry(),
            coriolis: 0.0,
            friction: 0.0,
        }
    }
}

/// Numerical flux
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxKind {
    /// HLLC with Einfeldt wave speeds
    #[default]
    Hllc,
    /// Local Lax-Friedrichs
    Rusanov,
    /// Two-wave HLL, speeds from `wave_speeds`
    Hll,
    /// Kurganov-Petrova central-upwind
    Kurganov,
}

/// Signal speed estimate of the HLL flux
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveSpeedKind {
    /// `±max(|un| + c)` over both sides
    Rusanov,
    /// `min(un - c)` and `max(un + c)` over both sides
    Davis,
    /// Davis bounds widened by the Roe-averaged speeds
    #[default]
    Einfeldt,
}

/// Spatial reconstruction of cell values onto edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionKind {
    /// Piecewise constant
    #[default]
    FirstOrder,
    /// Limited piecewise linear (MUSCL)
    Muscl,
}

/// Gradient limiter of the MUSCL reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimiterKind {
    /// Barth-Jespersen, least restrictive bound-preserving limiter
    #[default]
    BarthJespersen,
    /// Minmod, most dissipative
    Minmod,
}

/// Explicit time integrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScheme {
    /// First-order forward Euler
    #[default]
    ForwardEuler,
    /// Two-stage strong-stability-preserving Runge-Kutta
    SspRk2,
    /// Three-stage strong-stability-preserving Runge-Kutta (Shu-Osher)
    SspRk3,
}

/// Scheme and stability settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericsConfig {
    /// CFL safety factor, in (0, 1)
    #[serde(default = "default_cfl")]
    pub cfl: f64,

    /// Upper bound on the time step, also used for a dry domain [s]
    #[serde(default = "default_dt_max")]
    pub dt_max: f64,

    /// Numerical flux
    #[serde(default)]
    pub flux: FluxKind,

    /// Wave speed estimate, used by the HLL flux
    #[serde(default)]
    pub wave_speeds: WaveSpeedKind,

    /// Edge reconstruction
    #[serde(default)]
    pub reconstruction: ReconstructionKind,

    /// Limiter of the MUSCL reconstruction
    #[serde(default)]
    pub limiter: LimiterKind,

    /// Time integrator
    #[serde(default)]
    pub time_scheme: TimeScheme,

    /// Triangle count from which fluxes are evaluated in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_cfl() -> f64 { 0.45 }
fn default_dt_max() -> f64 { 0.1 }
fn default_parallel_threshold() -> usize { 20_000 }

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            cfl: default_cfl(),
            dt_max: default_dt_max(),
            flux: FluxKind::default(),
            wave_speeds: WaveSpeedKind::default(),
            reconstruction: ReconstructionKind::default(),
            limiter: LimiterKind::default(),
            time_scheme: TimeScheme::default(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

/// Stopping criteria; the run ends at whichever limit is hit first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Simulated time to reach [s]
    #[serde(default)]
    pub end_time: Option<f64>,

    /// Number of steps to take
    #[serde(default)]
    pub max_steps: Option<usize>,

    /// Log a progress line every this many steps
    #[serde(default = "default_report_every")]
    pub report_every: usize,
}

fn default_report_every() -> usize { 50 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            end_time: Some(1.0),
            max_steps: None,
            report_every: default_report_every(),
        }
    }
}

/// Snapshot output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Write a snapshot every this many steps; only the final state when absent
    #[serde(default)]
    pub snapshot_every: Option<usize>,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            snapshot_every: None,
        }
    }
}

impl SimulationConfig {
    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match extension(path).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            Some("json") => Self::from_json(&content)?,
            other => {
                return Err(ConfigError::Parse(format!(
                    "unsupported configuration format {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };
        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse YAML (not validated)
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse JSON (not validated)
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save to a file, format chosen by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = match extension(path).as_deref() {
            Some("json") => {
                serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            _ => self.to_yaml()?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every value range
    pub fn validate(&self) -> ConfigResult<()> {
        let p = &self.physics;
        if !(p.gravity > 0.0 && p.gravity.is_finite()) {
            return Err(ConfigError::invalid("physics.gravity", p.gravity, "must be positive"));
        }
        if !(p.h_dry >= 0.0 && p.h_dry.is_finite()) {
            return Err(ConfigError::invalid("physics.h_dry", p.h_dry, "must be non-negative"));
        }
        if !p.coriolis.is_finite() {
            return Err(ConfigError::invalid("physics.coriolis", p.coriolis, "must be finite"));
        }
        if !(p.friction >= 0.0 && p.friction.is_finite()) {
            return Err(ConfigError::invalid("physics.friction", p.friction, "must be non-negative"));
        }

        let n = &self.numerics;
        if !(n.cfl > 0.0 && n.cfl < 1.0) {
            return Err(ConfigError::invalid("numerics.cfl", n.cfl, "must be in (0, 1)"));
        }
        if !(n.dt_max > 0.0 && n.dt_max.is_finite()) {
            return Err(ConfigError::invalid("numerics.dt_max", n.dt_max, "must be positive"));
        }

        let r = &self.run;
        match (r.end_time, r.max_steps) {
            (None, None) => {
                return Err(ConfigError::Missing("run.end_time or run.max_steps".into()));
            }
            (Some(t), _) if !(t >= 0.0 && t.is_finite()) => {
                return Err(ConfigError::invalid("run.end_time", t, "must be non-negative"));
            }
            _ => {}
        }
        if r.report_every == 0 {
            return Err(ConfigError::invalid("run.report_every", 0, "must be positive"));
        }
        if self.output.snapshot_every == Some(0) {
            return Err(ConfigError::invalid("output.snapshot_every", 0, "must be positive"));
        }

        self.scenario.kind.validate()?;
        if self.scenario.mesh_file.is_none() {
            self.scenario.grid.validate()?;
        }
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
