// crates/tf_physics/src/schemes/mod.rs

//! Numerical schemes
//!
//! - [`riemann`]: edge flux solvers
//! - [`hydrostatic`]: well-balanced reconstruction over a variable bed
//! - [`muscl`]: limited linear edge values for the second-order scheme
//! - [`limiter`]: slope limiters of the MUSCL reconstruction
//! - [`wetting_drying`]: positivity clamp and dry-cell drain

pub mod hydrostatic;
pub mod limiter;
pub mod muscl;
pub mod riemann;
pub mod wetting_drying;

pub use hydrostatic::{CellValues, HydrostaticReconstruction, ReconstructedFace};
pub use limiter::{create_limiter, BarthJespersen, LimiterContext, Minmod, SlopeLimiter};
pub use muscl::{CellGradient, MusclReconstruction};
pub use riemann::{
    create_solver, FaceState, HllSolver, HllcSolver, KurganovSolver, RiemannFlux, RiemannSolver, RusanovSolver,
};
pub use wetting_drying::{CorrectionReport, WetState, WettingDrying};
