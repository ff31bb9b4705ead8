// crates/tf_physics/src/bathymetry.rs

//! Bed elevation
//!
//! Piecewise constant, one value per triangle. Node-based input is averaged
//! over the three nodes, which for a linear bed equals the centroid value.
//! Read-only once built.

use tf_mesh::{MeshTopology, Point};

use crate::error::{PhysicsError, PhysicsResult};

/// Bed elevation per triangle
#[derive(Debug, Clone, PartialEq)]
pub struct Bathymetry {
    z: Vec<f64>,
}

impl Bathymetry {
    /// From per-triangle values; the engine checks the length against its mesh
    pub fn new(z: Vec<f64>) -> Self {
        Self { z }
    }

    /// Constant bed
    pub fn flat(n: usize, z: f64) -> Self {
        Self { z: vec![z; n] }
    }

    /// Average of node values over each triangle
    pub fn from_nodes<M: MeshTopology + ?Sized>(mesh: &M, nodes: &[f64]) -> PhysicsResult<Self> {
        PhysicsError::check_len("node bathymetry", mesh.n_nodes(), nodes.len())?;
        let z = (0..mesh.n_triangles())
            .map(|t| {
                let [a, b, c] = mesh.nodes_of(t);
                (nodes[a] + nodes[b] + nodes[c]) / 3.0
            })
            .collect();
        Ok(Self { z })
    }

    /// Sample a function at triangle centroids
    pub fn from_fn<M, F>(mesh: &M, f: F) -> Self
    where
        M: MeshTopology + ?Sized,
        F: Fn(Point) -> f64,
    {
        Self {
            z: (0..mesh.n_triangles()).map(|t| f(mesh.centroid(t))).collect(),
        }
    }

    /// Bed elevation of a triangle
    #[inline]
    pub fn get(&self, triangle: usize) -> f64 {
        self.z[triangle]
    }

    /// All values
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.z
    }

    /// Number of triangles
    #[inline]
    pub fn len(&self) -> usize {
        self.z.len()
    }

    /// Empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}
