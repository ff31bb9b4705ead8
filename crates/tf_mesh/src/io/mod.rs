// crates/tf_mesh/src/io/mod.rs

//! Mesh file I/O
//!
//! - Gmsh ASCII (.msh, formats 2.x and 4.x)

pub mod gmsh;

pub use gmsh::{BoundarySegment, GmshLoader, GmshMesh, GmshWriter};
