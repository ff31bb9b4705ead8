// crates/tf_config/src/scenario.rs

//! Benchmark scenario selection
//!
//! ```yaml
//! scenario:
//!   kind: parabolic_bowl
//!   h0: 0.1
//!   a: 1.0
//!   r0: 0.8
//!   grid: { nx: 40, ny: 40, length_x: 4.0, length_y: 4.0 }
//! ```
//!
//! `center` defaults to the middle of the domain.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tf_mesh::Side;

use crate::error::{ConfigError, ConfigResult};

/// Scenario section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Which benchmark and its parameters
    #[serde(flatten)]
    pub kind: ScenarioKind,

    /// Structured grid, used when no mesh file is given
    #[serde(default)]
    pub grid: GridConfig,

    /// Gmsh file replacing the structured grid
    #[serde(default)]
    pub mesh_file: Option<PathBuf>,

    /// Sides of the structured grid with open (transmissive) boundaries;
    /// everything else is a wall
    #[serde(default)]
    pub open_sides: Vec<Side>,

    /// Physical names in a mesh file that mark open boundaries
    #[serde(default = "default_open_names")]
    pub open_names: Vec<String>,
}

fn default_open_names() -> Vec<String> {
    vec!["open".into(), "outflow".into()]
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            kind: ScenarioKind::default(),
            grid: GridConfig::default(),
            mesh_file: None,
            open_sides: Vec::new(),
            open_names: default_open_names(),
        }
    }
}

/// Benchmark kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Flat surface over a Gaussian bump, zero velocity
    LakeAtRest {
        /// Water surface elevation
        #[serde(default)]
        surface: f64,
        /// Bed elevation far from the bump
        #[serde(default = "default_lake_floor")]
        floor: f64,
        /// Bump height above the floor; above `surface - floor` it emerges
        #[serde(default = "default_bump_height")]
        bump_height: f64,
        /// Bump e-folding radius
        #[serde(default = "default_bump_radius")]
        bump_radius: f64,
        /// Bump centre
        #[serde(default)]
        center: Option<[f64; 2]>,
    },

    /// Thacker's radially symmetric oscillation in a paraboloid
    ParabolicBowl {
        /// Depth at the centre of the bowl at rest
        #[serde(default = "default_bowl_h0")]
        h0: f64,
        /// Radius where the bed meets the rest level
        #[serde(default = "default_bowl_a")]
        a: f64,
        /// Initial shoreline radius
        #[serde(default = "default_bowl_r0")]
        r0: f64,
        /// Bowl centre
        #[serde(default)]
        center: Option<[f64; 2]>,
    },

    /// Gaussian hump released on still water over a flat bed
    Wave {
        /// Undisturbed depth
        #[serde(default = "default_wave_depth")]
        depth: f64,
        /// Hump amplitude
        #[serde(default = "default_wave_amplitude")]
        amplitude: f64,
        /// Decay rate `k` in `exp(-k r^2)`
        #[serde(default = "default_wave_decay")]
        decay: f64,
        /// Hump centre
        #[serde(default)]
        center: Option<[f64; 2]>,
    },
}

fn default_lake_floor() -> f64 { -1.0 }
fn default_bump_height() -> f64 { 0.8 }
fn default_bump_radius() -> f64 { 0.5 }
fn default_bowl_h0() -> f64 { 0.1 }
fn default_bowl_a() -> f64 { 1.0 }
fn default_bowl_r0() -> f64 { 0.8 }
fn default_wave_depth() -> f64 { 1.0 }
fn default_wave_amplitude() -> f64 { 1.0 }
fn default_wave_decay() -> f64 { 5.0 }

impl Default for ScenarioKind {
    fn default() -> Self {
        Self::LakeAtRest {
            surface: 0.0,
            floor: default_lake_floor(),
            bump_height: default_bump_height(),
            bump_radius: default_bump_radius(),
            center: None,
        }
    }
}

impl ScenarioKind {
    /// Short name
    pub fn name(&self) -> &'static str {
        match self {
            Self::LakeAtRest { .. } => "lake_at_rest",
            Self::ParabolicBowl { .. } => "parabolic_bowl",
            Self::Wave { .. } => "wave",
        }
    }

    /// Configured centre, if any
    pub fn center(&self) -> Option<[f64; 2]> {
        match self {
            Self::LakeAtRest { center, .. }
            | Self::ParabolicBowl { center, .. }
            | Self::Wave { center, .. } => *center,
        }
    }

    /// Range checks
    pub fn validate(&self) -> ConfigResult<()> {
        match *self {
            Self::LakeAtRest { bump_radius, .. } => {
                if !(bump_radius > 0.0) {
                    return Err(ConfigError::invalid("scenario.bump_radius", bump_radius, "must be positive"));
                }
            }
            Self::ParabolicBowl { h0, a, r0, .. } => {
                if !(h0 > 0.0) {
                    return Err(ConfigError::invalid("scenario.h0", h0, "must be positive"));
                }
                if !(a > 0.0) {
                    return Err(ConfigError::invalid("scenario.a", a, "must be positive"));
                }
                if !(r0 > 0.0 && r0 < a) {
                    return Err(ConfigError::invalid("scenario.r0", r0, "must lie in (0, a)"));
                }
            }
            Self::Wave { depth, decay, .. } => {
                if !(depth > 0.0) {
                    return Err(ConfigError::invalid("scenario.depth", depth, "must be positive"));
                }
                if !(decay > 0.0) {
                    return Err(ConfigError::invalid("scenario.decay", decay, "must be positive"));
                }
            }
        }
        Ok(())
    }
}

/// Structured grid extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells in x
    #[serde(default = "default_cells")]
    pub nx: usize,
    /// Cells in y
    #[serde(default = "default_cells")]
    pub ny: usize,
    /// Domain length in x
    #[serde(default = "default_length")]
    pub length_x: f64,
    /// Domain length in y
    #[serde(default = "default_length")]
    pub length_y: f64,
    /// Lower-left corner
    #[serde(default)]
    pub origin: [f64; 2],
}

fn default_cells() -> usize { 40 }
fn default_length() -> f64 { 4.0 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: default_cells(),
            ny: default_cells(),
            length_x: default_length(),
            length_y: default_length(),
            origin: [0.0, 0.0],
        }
    }
}

impl GridConfig {
    /// Centre of the rectangle
    pub fn center(&self) -> [f64; 2] {
        [
            self.origin[0] + 0.5 * self.length_x,
            self.origin[1] + 0.5 * self.length_y,
        ]
    }

    /// Range checks
    pub fn validate(&self) -> ConfigResult<()> {
        if self.nx == 0 {
            return Err(ConfigError::invalid("scenario.grid.nx", self.nx, "must be positive"));
        }
        if self.ny == 0 {
            return Err(ConfigError::invalid("scenario.grid.ny", self.ny, "must be positive"));
        }
        if !(self.length_x > 0.0) {
            return Err(ConfigError::invalid("scenario.grid.length_x", self.length_x, "must be positive"));
        }
        if !(self.length_y > 0.0) {
            return Err(ConfigError::invalid("scenario.grid.length_y", self.length_y, "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_yaml() {
        let cfg: ScenarioConfig =
            serde_yaml::from_str("kind: parabolic_bowl\nh0: 0.2\ngrid: { nx: 10 }\n").unwrap();
        match cfg.kind {
            ScenarioKind::ParabolicBowl { h0, a, r0, center } => {
                assert_eq!(h0, 0.2);
                assert_eq!(a, 1.0);
                assert_eq!(r0, 0.8);
                assert!(center.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cfg.grid.nx, 10);
        assert_eq!(cfg.grid.ny, 40);
        assert_eq!(cfg.open_names, vec!["open".to_string(), "outflow".to_string()]);
    }

    #[test]
    fn test_open_sides() {
        let cfg: ScenarioConfig =
            serde_yaml::from_str("kind: wave\nopen_sides: [left, right]\n").unwrap();
        assert_eq!(cfg.open_sides, vec![Side::Left, Side::Right]);
        assert_eq!(cfg.kind.name(), "wave");
    }

    #[test]
    fn test_bowl_validation() {
        let bad = ScenarioKind::ParabolicBowl { h0: 0.1, a: 1.0, r0: 1.5, center: None };
        assert!(bad.validate().is_err());
        let good = ScenarioKind::ParabolicBowl { h0: 0.1, a: 1.0, r0: 0.8, center: None };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_grid_center() {
        let g = GridConfig { origin: [-2.0, 1.0], ..GridConfig::default() };
        assert_eq!(g.center(), [0.0, 3.0]);
    }
}
