// crates/tf_physics/src/schemes/riemann/mod.rs

//! Riemann solvers
//!
//! - [`HllcSolver`]: contact-resolving, exact dry-bed fronts
//! - [`HllSolver`]: two waves, selectable signal speed estimate
//! - [`KurganovSolver`]: central-upwind, one-sided local speeds
//! - [`RusanovSolver`]: simple and very robust, more diffusive
//!
//! | Solver | Accuracy | Diffusion | Cost |
//! |--------|----------|-----------|------|
//! | HLLC | high | low | medium |
//! | HLL | medium | medium | low |
//! | Kurganov | medium | medium | low |
//! | Rusanov | low | high | low |

mod hll;
mod hllc;
mod kurganov;
mod rusanov;
mod speeds;
mod traits;

pub use hll::HllSolver;
pub use hllc::HllcSolver;
pub use kurganov::KurganovSolver;
pub use rusanov::RusanovSolver;
pub use traits::{FaceState, RiemannFlux, RiemannSolver};

use tf_config::{FluxKind, WaveSpeedKind};

use crate::params::NumericalParams;

/// Build the configured solver; `wave_speeds` only matters for HLL
pub fn create_solver(kind: FluxKind, wave_speeds: WaveSpeedKind, params: &NumericalParams) -> Box<dyn RiemannSolver> {
    match kind {
        FluxKind::Hllc => Box::new(HllcSolver::new(params)),
        FluxKind::Rusanov => Box::new(RusanovSolver::new(params)),
        FluxKind::Hll => Box::new(HllSolver::new(params, wave_speeds)),
        FluxKind::Kurganov => Box::new(KurganovSolver::new(params)),
    }
}
