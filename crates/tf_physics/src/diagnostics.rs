// crates/tf_physics/src/diagnostics.rs

//! Integral diagnostics
//!
//! ```text
//! mass      = Σ h A
//! kinetic   = Σ ½ h |u|² A
//! potential = Σ ½ g (η² - z²) A  =  Σ ½ g h (h + 2z) A
//! ```
//!
//! The potential energy is measured against the bed so that a dry cell
//! contributes nothing.

use serde::{Deserialize, Serialize};
use tf_mesh::MeshTopology;

use crate::bathymetry::Bathymetry;
use crate::params::NumericalParams;
use crate::state::FlowState;

/// Snapshot of integral quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Simulation time [s]
    pub time: f64,
    /// Water volume [m³]
    pub total_mass: f64,
    /// Kinetic energy per unit density [m⁵/s²]
    pub kinetic_energy: f64,
    /// Potential energy per unit density [m⁵/s²]
    pub potential_energy: f64,
    /// Largest velocity magnitude [m/s]
    pub max_speed: f64,
    /// Largest depth [m]
    pub max_depth: f64,
    /// Cells above the dry threshold
    pub wet_cells: usize,
    /// Cells at or below the dry threshold
    pub dry_cells: usize,
}

impl Diagnostics {
    /// Integrate over the mesh
    pub fn compute<M: MeshTopology + ?Sized>(
        mesh: &M,
        state: &FlowState,
        bathymetry: &Bathymetry,
        params: &NumericalParams,
        time: f64,
    ) -> Self {
        let mut d = Self { time, ..Default::default() };
        for t in 0..state.len() {
            let h = state.h[t];
            let area = mesh.area(t);
            d.total_mass += h * area;
            d.max_depth = d.max_depth.max(h);
            if params.is_dry(h) {
                d.dry_cells += 1;
                continue;
            }
            d.wet_cells += 1;
            let vel = params.safe_velocity(state.hu[t], state.hv[t], h);
            let speed2 = vel.length_squared();
            d.kinetic_energy += 0.5 * h * speed2 * area;
            d.potential_energy += 0.5 * params.gravity * h * (h + 2.0 * bathymetry.get(t)) * area;
            d.max_speed = d.max_speed.max(speed2.sqrt());
        }
        d
    }

    /// Total energy
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "t={:.4} mass={:.6e} E={:.6e} |u|max={:.3e} hmax={:.3e} wet={} dry={}",
            self.time,
            self.total_mass,
            self.total_energy(),
            self.max_speed,
            self.max_depth,
            self.wet_cells,
            self.dry_cells
        )
    }
}
