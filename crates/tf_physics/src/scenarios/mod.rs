// crates/tf_physics/src/scenarios/mod.rs

//! Benchmark scenarios
//!
//! A scenario prescribes the bed, the initial free surface and velocity,
//! and for some cases the exact solution at later times.
//!
//! | Scenario | Bed | Exact solution |
//! |----------|-----|----------------|
//! | [`LakeAtRest`] | Gaussian bump | steady, `η` constant |
//! | [`ParabolicBowl`] | paraboloid | Thacker's oscillation |
//! | [`GaussianWave`] | flat | none |

mod compare;
mod lake_at_rest;
mod parabolic_bowl;
mod wave;

pub use compare::{compare, ErrorNorms};
pub use lake_at_rest::LakeAtRest;
pub use parabolic_bowl::ParabolicBowl;
pub use wave::GaussianWave;

use glam::DVec2;
use tf_config::ScenarioKind;
use tf_mesh::{MeshTopology, Point};

use crate::bathymetry::Bathymetry;
use crate::state::{CellState, FlowState};

/// Initial condition and optional analytic solution
pub trait Scenario: Send + Sync {
    /// Scenario name
    fn name(&self) -> &'static str;

    /// Bed elevation at a point
    fn bed(&self, p: Point) -> f64;

    /// Free surface elevation at a point and time
    fn surface(&self, p: Point, t: f64) -> f64;

    /// Depth-averaged velocity at a point and time
    fn velocity(&self, p: Point, t: f64) -> DVec2;

    /// Whether `surface` and `velocity` are exact for `t > 0`
    fn has_exact_solution(&self) -> bool;

    /// Water depth, zero where the bed is above the surface
    fn depth(&self, p: Point, t: f64) -> f64 {
        (self.surface(p, t) - self.bed(p)).max(0.0)
    }
}

/// Sample bed and state at triangle centroids
///
/// The depth is taken against the sampled cell bed, so a flat free surface
/// stays exactly flat in the discrete state.
pub fn initialize<M: MeshTopology + ?Sized>(mesh: &M, scenario: &dyn Scenario) -> (Bathymetry, FlowState) {
    let bathymetry = Bathymetry::from_fn(mesh, |p| scenario.bed(p));
    let cells: Vec<CellState> = (0..mesh.n_triangles())
        .map(|t| {
            let c = mesh.centroid(t);
            let h = (scenario.surface(c, 0.0) - bathymetry.get(t)).max(0.0);
            let vel = if h > 0.0 { scenario.velocity(c, 0.0) } else { DVec2::ZERO };
            CellState::from_velocity(h, vel)
        })
        .collect();
    (bathymetry, FlowState::from_cells(&cells))
}

/// Scenario from configuration; `default_center` applies when none is set
pub fn from_config(kind: &ScenarioKind, default_center: [f64; 2], gravity: f64) -> Box<dyn Scenario> {
    let center = DVec2::from(kind.center().unwrap_or(default_center));
    match *kind {
        ScenarioKind::LakeAtRest { surface, floor, bump_height, bump_radius, .. } => Box::new(LakeAtRest {
            surface,
            floor,
            bump_height,
            bump_radius,
            center,
        }),
        ScenarioKind::ParabolicBowl { h0, a, r0, .. } => Box::new(ParabolicBowl::new(h0, a, r0, center, gravity)),
        ScenarioKind::Wave { depth, amplitude, decay, .. } => Box::new(GaussianWave {
            depth,
            amplitude,
            decay,
            center,
        }),
    }
}
