// crates/tf_mesh/src/topology.rs

//! Mesh topology abstraction
//!
//! [`MeshTopology`] is the capability set the solver depends on. Both the
//! unstructured mesh (explicit adjacency table) and the structured grid
//! (closed-form arithmetic) implement it, so the engine never sees a
//! concrete variant.
//!
//! # Face enumeration
//!
//! Edges are not indexed. [`MeshTopology::faces`] visits each one exactly
//! once through its owner: the triangle itself when the edge is a boundary,
//! otherwise the triangle with the smaller index.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Mesh variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshKind {
    /// Explicit adjacency
    Unstructured,
    /// Regular grid split into triangles
    Structured,
}

/// Cached geometry of one (triangle, local edge) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    /// Outward unit normal relative to the triangle
    pub normal: Point,
    /// Edge length
    pub length: f64,
    /// Edge midpoint
    pub midpoint: Point,
}

impl EdgeGeometry {
    /// Geometry of the segment `a -> b` seen from a CCW triangle
    pub fn from_segment(a: Point, b: Point) -> Self {
        Self {
            normal: crate::geometry::outward_normal(a, b),
            length: a.distance(b),
            midpoint: crate::geometry::average(&[a, b]),
        }
    }

    /// The same edge seen from the other side
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// One edge visited through its owning triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Owning triangle
    pub owner: usize,
    /// Local edge index in the owner
    pub edge: usize,
    /// Triangle on the other side, `None` on the domain boundary
    pub neighbor: Option<usize>,
}

impl Face {
    /// Boundary face?
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.neighbor.is_none()
    }
}

/// Shared triangular-mesh query contract
///
/// All queries are O(1). Indices are dense: nodes `0..n_nodes()`, triangles
/// `0..n_triangles()`, local edges `0..3`. Out-of-range indices panic.
pub trait MeshTopology: Send + Sync {
    /// Number of nodes
    fn n_nodes(&self) -> usize;

    /// Number of triangles
    fn n_triangles(&self) -> usize;

    /// Node coordinate
    fn node(&self, node: usize) -> Point;

    /// The three nodes of a triangle, counter-clockwise
    fn nodes_of(&self, triangle: usize) -> [usize; 3];

    /// Neighbour across local edge `edge`, `None` on the boundary
    fn neighbor_of(&self, triangle: usize, edge: usize) -> Option<usize>;

    /// Geometry of local edge `edge` of `triangle`
    fn edge_geometry(&self, triangle: usize, edge: usize) -> EdgeGeometry;

    /// Triangle area (strictly positive)
    fn area(&self, triangle: usize) -> f64;

    /// Triangle centroid
    fn centroid(&self, triangle: usize) -> Point;

    /// Mesh variant
    fn mesh_kind(&self) -> MeshKind;

    // ========================================================================
    // Derived queries
    // ========================================================================

    /// Triangle perimeter
    fn perimeter(&self, triangle: usize) -> f64 {
        (0..3).map(|k| self.edge_geometry(triangle, k).length).sum()
    }

    /// Inradius `2A / P`, the CFL length scale
    fn inradius(&self, triangle: usize) -> f64 {
        2.0 * self.area(triangle) / self.perimeter(triangle)
    }

    /// Sum of all triangle areas
    fn total_area(&self) -> f64 {
        (0..self.n_triangles()).map(|t| self.area(t)).sum()
    }

    /// Local edge of `triangle` facing `neighbor`
    fn local_edge_towards(&self, triangle: usize, neighbor: usize) -> Option<usize> {
        (0..3).find(|&k| self.neighbor_of(triangle, k) == Some(neighbor))
    }

    /// Number of boundary edges
    fn n_boundary_edges(&self) -> usize {
        (0..self.n_triangles())
            .map(|t| (0..3).filter(|&k| self.neighbor_of(t, k).is_none()).count())
            .sum()
    }

    /// Every edge once, in ascending (owner, local edge) order
    fn faces(&self) -> Vec<Face> {
        let mut faces = Vec::with_capacity(self.n_triangles() * 3 / 2 + 1);
        for t in 0..self.n_triangles() {
            for k in 0..3 {
                let neighbor = self.neighbor_of(t, k);
                match neighbor {
                    Some(nb) if nb < t => {}
                    _ => faces.push(Face { owner: t, edge: k, neighbor }),
                }
            }
        }
        faces
    }

    /// Axis-aligned bounding box `(min, max)` of the nodes
    fn bounds(&self) -> (Point, Point) {
        let mut min = Point::splat(f64::INFINITY);
        let mut max = Point::splat(f64::NEG_INFINITY);
        for i in 0..self.n_nodes() {
            let p = self.node(i);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_geometry_from_segment() {
        let e = EdgeGeometry::from_segment(Point::new(0.0, 0.0), Point::new(0.0, 2.0));
        assert!((e.normal - Point::new(1.0, 0.0)).length() < 1e-15);
        assert!((e.length - 2.0).abs() < 1e-15);
        assert!((e.midpoint - Point::new(0.0, 1.0)).length() < 1e-15);

        let f = e.flipped();
        assert_eq!(f.normal, -e.normal);
        assert_eq!(f.length, e.length);
    }
}
