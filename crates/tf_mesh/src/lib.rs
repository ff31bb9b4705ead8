// crates/tf_mesh/src/lib.rs

//! TriFlow mesh layer
//!
//! Triangular meshes for the finite-volume shallow-water engine.
//!
//! # Modules
//!
//! - [`geometry`]: point primitives (signed area, averaging, normals)
//! - [`topology`]: the [`MeshTopology`] capability set shared by all variants
//! - [`unstructured`]: [`TriangularMesh`], explicit adjacency built by edge matching
//! - [`structured`]: [`StructuredMesh`], closed-form index arithmetic on a grid
//! - [`io`]: mesh file readers producing a [`MeshSource`]
//! - [`error`]: [`MeshError`]
//!
//! # Conventions
//!
//! Triangles are wound counter-clockwise. Local edge `k` joins local nodes
//! `k` and `(k + 1) % 3`; its normal points out of the triangle. A missing
//! neighbour marks a domain boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod io;
pub mod structured;
pub mod topology;
pub mod unstructured;

pub use error::{MeshError, MeshResult};
pub use geometry::Point;
pub use structured::{Side, StructuredMesh};
pub use topology::{EdgeGeometry, Face, MeshKind, MeshTopology};
pub use unstructured::{MeshSource, SourceNode, SourceTriangle, TriangularMesh};
