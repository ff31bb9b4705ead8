// crates/tf_physics/src/lib.rs

//! TriFlow physics layer
//!
//! Finite-volume solver for the depth-averaged shallow-water equations on
//! triangular meshes.
//!
//! # Modules
//!
//! - [`state`]: conserved variables `(h, hu, hv)` per triangle
//! - [`bathymetry`]: bed elevation per triangle
//! - [`schemes`]: Riemann solvers, hydrostatic reconstruction, wet/dry handling
//! - [`boundary`]: wall and open boundary ghost states
//! - [`sources`]: Coriolis and linear friction
//! - [`engine`]: CFL time step, time integration and the [`ShallowWaterEngine`]
//! - [`diagnostics`]: mass and energy integrals
//! - [`scenarios`]: benchmark initial conditions and analytic solutions
//!
//! # Example
//!
//! ```ignore
//! use tf_mesh::StructuredMesh;
//! use tf_physics::{Bathymetry, EngineConfig, FlowState, ShallowWaterEngine};
//!
//! let mesh = StructuredMesh::new(10, 10, 0.1, 0.1)?;
//! let n = mesh.n_triangles();
//! let mut engine = ShallowWaterEngine::new(
//!     &mesh,
//!     Bathymetry::flat(n, 0.0),
//!     FlowState::uniform(n, 1.0),
//!     EngineConfig::default(),
//! )?;
//! for _ in 0..100 {
//!     let dt = engine.compute_stable_dt();
//!     engine.step(dt)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bathymetry;
pub mod boundary;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod params;
pub mod scenarios;
pub mod schemes;
pub mod sources;
pub mod state;

pub use bathymetry::Bathymetry;
pub use boundary::BoundaryKind;
pub use diagnostics::Diagnostics;
pub use engine::{EngineBuilder, EngineConfig, EngineStats, ShallowWaterEngine};
pub use error::{PhysicsError, PhysicsResult};
pub use params::NumericalParams;
pub use state::{CellState, FlowState};
