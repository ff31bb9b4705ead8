// crates/tf_mesh/src/structured.rs

//! Structured triangular grid
//!
//! An `nx × ny` grid of rectangular cells, each split by the diagonal from
//! its lower-left to its upper-right corner. Every query is index
//! arithmetic; nothing is allocated at construction.
//!
//! # Numbering
//!
//! ```text
//!  (i,j+1) ─────── (i+1,j+1)        cell c = j * nx + i
//!     │   upper   ╱   │             lower triangle  2c     (i,j) (i+1,j) (i+1,j+1)
//!     │  2c+1   ╱     │             upper triangle  2c + 1 (i,j) (i+1,j+1) (i,j+1)
//!     │       ╱ lower │
//!     │     ╱    2c   │             node (i, j) = j * (nx + 1) + i
//!   (i,j) ───────── (i+1,j)
//! ```
//!
//! Lower edges: 0 bottom, 1 right, 2 diagonal. Upper edges: 0 diagonal,
//! 1 top, 2 left.

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::geometry::{self, Point};
use crate::topology::{EdgeGeometry, MeshKind, MeshTopology};

/// Side of the rectangular domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// y = y0, indexed by column
    Bottom,
    /// y = y0 + ny·dy, indexed by column
    Top,
    /// x = x0, indexed by row
    Left,
    /// x = x0 + nx·dx, indexed by row
    Right,
}

impl Side {
    /// All four sides
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Right, Side::Top, Side::Left];
}

/// Structured grid with closed-form topology
#[derive(Debug)]
pub struct StructuredMesh {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    origin: Point,
    /// (normal, length) of local edges 0..3 for lower and upper triangles
    lower: [(Point, f64); 3],
    upper: [(Point, f64); 3],
}

impl StructuredMesh {
    /// Grid of `nx × ny` cells with spacing `dx × dy`, origin at (0, 0).
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> MeshResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(MeshError::InvalidGrid {
                details: format!("need at least one cell per direction, got {}×{}", nx, ny),
            });
        }
        if !(dx > 0.0 && dy > 0.0 && dx.is_finite() && dy.is_finite()) {
            return Err(MeshError::InvalidGrid {
                details: format!("spacing must be positive and finite, got {}×{}", dx, dy),
            });
        }

        let diag = dx.hypot(dy);
        let lower = [
            (Point::new(0.0, -1.0), dx),
            (Point::new(1.0, 0.0), dy),
            (Point::new(-dy, dx) / diag, diag),
        ];
        let upper = [
            (Point::new(dy, -dx) / diag, diag),
            (Point::new(0.0, 1.0), dx),
            (Point::new(-1.0, 0.0), dy),
        ];

        log::debug!("structured mesh: {}×{} cells, {} triangles", nx, ny, 2 * nx * ny);
        Ok(Self { nx, ny, dx, dy, origin: Point::ZERO, lower, upper })
    }

    /// Grid covering `[0, length_x] × [0, length_y]`
    pub fn from_extent(nx: usize, ny: usize, length_x: f64, length_y: f64) -> MeshResult<Self> {
        Self::new(nx, ny, length_x / nx as f64, length_y / ny as f64)
    }

    /// Move the lower-left corner
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Cells in x
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Cells in y
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cell spacing `(dx, dy)`
    #[inline]
    pub fn spacing(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Lower-left corner
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Node index of grid point `(i, j)`
    #[inline]
    pub fn node_index(&self, i: usize, j: usize) -> usize {
        j * (self.nx + 1) + i
    }

    /// Triangle index of the lower or upper half of cell `(i, j)`
    #[inline]
    pub fn triangle_at(&self, i: usize, j: usize, upper: bool) -> usize {
        2 * (j * self.nx + i) + upper as usize
    }

    /// Cell `(i, j)` and half (`true` = upper) of a triangle
    #[inline]
    pub fn cell_of(&self, triangle: usize) -> (usize, usize, bool) {
        let c = triangle / 2;
        (c % self.nx, c / self.nx, triangle % 2 == 1)
    }

    // ========================================================================
    // Boundary arrays
    // ========================================================================

    /// Number of boundary edges on a side
    #[inline]
    pub fn boundary_len(&self, side: Side) -> usize {
        match side {
            Side::Bottom | Side::Top => self.nx,
            Side::Left | Side::Right => self.ny,
        }
    }

    /// `(triangle, local edge)` on `side` at column (bottom/top) or row
    /// (left/right) `index`
    pub fn boundary_edge(&self, side: Side, index: usize) -> Option<(usize, usize)> {
        if index >= self.boundary_len(side) {
            return None;
        }
        Some(match side {
            Side::Bottom => (self.triangle_at(index, 0, false), 0),
            Side::Top => (self.triangle_at(index, self.ny - 1, true), 1),
            Side::Left => (self.triangle_at(0, index, true), 2),
            Side::Right => (self.triangle_at(self.nx - 1, index, false), 1),
        })
    }

    /// Boundary triangle on `side` at `index`
    #[inline]
    pub fn boundary_triangle(&self, side: Side, index: usize) -> Option<usize> {
        self.boundary_edge(side, index).map(|(t, _)| t)
    }

    /// All boundary edges of a side, in column or row order
    pub fn boundary_edges(&self, side: Side) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.boundary_len(side)).filter_map(move |k| self.boundary_edge(side, k))
    }

    /// Triangle containing `p`, `None` outside the domain
    pub fn locate(&self, p: Point) -> Option<usize> {
        let q = p - self.origin;
        let (fx, fy) = (q.x / self.dx, q.y / self.dy);
        if !(fx >= 0.0 && fy >= 0.0 && fx <= self.nx as f64 && fy <= self.ny as f64) {
            return None;
        }
        let i = (fx.floor() as usize).min(self.nx - 1);
        let j = (fy.floor() as usize).min(self.ny - 1);
        let upper = (fy - j as f64) > (fx - i as f64);
        Some(self.triangle_at(i, j, upper))
    }
}

impl MeshTopology for StructuredMesh {
    #[inline]
    fn n_nodes(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    #[inline]
    fn n_triangles(&self) -> usize {
        2 * self.nx * self.ny
    }

    #[inline]
    fn node(&self, node: usize) -> Point {
        let i = node % (self.nx + 1);
        let j = node / (self.nx + 1);
        self.origin + Point::new(i as f64 * self.dx, j as f64 * self.dy)
    }

    #[inline]
    fn nodes_of(&self, triangle: usize) -> [usize; 3] {
        let (i, j, upper) = self.cell_of(triangle);
        if upper {
            [self.node_index(i, j), self.node_index(i + 1, j + 1), self.node_index(i, j + 1)]
        } else {
            [self.node_index(i, j), self.node_index(i + 1, j), self.node_index(i + 1, j + 1)]
        }
    }

    fn neighbor_of(&self, triangle: usize, edge: usize) -> Option<usize> {
        let (i, j, upper) = self.cell_of(triangle);
        match (upper, edge) {
            (false, 0) => (j > 0).then(|| self.triangle_at(i, j - 1, true)),
            (false, 1) => (i + 1 < self.nx).then(|| self.triangle_at(i + 1, j, true)),
            (false, 2) => Some(self.triangle_at(i, j, true)),
            (true, 0) => Some(self.triangle_at(i, j, false)),
            (true, 1) => (j + 1 < self.ny).then(|| self.triangle_at(i, j + 1, false)),
            (true, 2) => (i > 0).then(|| self.triangle_at(i - 1, j, false)),
            _ => panic!("local edge index {} out of range", edge),
        }
    }

    fn edge_geometry(&self, triangle: usize, edge: usize) -> EdgeGeometry {
        let nodes = self.nodes_of(triangle);
        let a = self.node(nodes[edge]);
        let b = self.node(nodes[(edge + 1) % 3]);
        let (normal, length) = if triangle % 2 == 1 {
            self.upper[edge]
        } else {
            self.lower[edge]
        };
        EdgeGeometry { normal, length, midpoint: geometry::average(&[a, b]) }
    }

    #[inline]
    fn area(&self, _triangle: usize) -> f64 {
        0.5 * self.dx * self.dy
    }

    fn centroid(&self, triangle: usize) -> Point {
        let [a, b, c] = self.nodes_of(triangle);
        geometry::average(&[self.node(a), self.node(b), self.node(c)])
    }

    fn mesh_kind(&self) -> MeshKind {
        MeshKind::Structured
    }

    fn n_boundary_edges(&self) -> usize {
        2 * (self.nx + self.ny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_area() {
        let mesh = StructuredMesh::new(4, 3, 0.5, 2.0).unwrap();
        assert_eq!(mesh.n_triangles(), 24);
        assert_eq!(mesh.n_nodes(), 20);
        assert!((mesh.total_area() - 2.0 * 6.0).abs() < 1e-12);
        assert_eq!(mesh.n_boundary_edges(), 14);
    }

    #[test]
    fn test_invalid_grid() {
        assert!(matches!(
            StructuredMesh::new(0, 3, 1.0, 1.0),
            Err(MeshError::InvalidGrid { .. })
        ));
        assert!(StructuredMesh::new(3, 3, -1.0, 1.0).is_err());
        assert!(StructuredMesh::new(3, 3, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_neighbors_reciprocal() {
        let mesh = StructuredMesh::new(5, 4, 1.0, 0.7).unwrap();
        for t in 0..mesh.n_triangles() {
            for k in 0..3 {
                if let Some(nb) = mesh.neighbor_of(t, k) {
                    let back = mesh.local_edge_towards(nb, t).expect("reciprocal");
                    let a = mesh.edge_geometry(t, k);
                    let b = mesh.edge_geometry(nb, back);
                    assert!((a.normal + b.normal).length() < 1e-14);
                    assert!((a.midpoint - b.midpoint).length() < 1e-14);
                    assert!((a.length - b.length).abs() < 1e-14);
                }
            }
        }
    }

    #[test]
    fn test_normals_match_nodes() {
        let mesh = StructuredMesh::new(3, 2, 2.0, 1.0).unwrap();
        for t in 0..mesh.n_triangles() {
            let nodes = mesh.nodes_of(t);
            for k in 0..3 {
                let a = mesh.node(nodes[k]);
                let b = mesh.node(nodes[(k + 1) % 3]);
                let expected = EdgeGeometry::from_segment(a, b);
                let got = mesh.edge_geometry(t, k);
                assert!((expected.normal - got.normal).length() < 1e-14);
                assert!((expected.length - got.length).abs() < 1e-14);
            }
            let [a, b, c] = nodes;
            let area = geometry::triangle_area(mesh.node(a), mesh.node(b), mesh.node(c));
            assert!((area - mesh.area(t)).abs() < 1e-14);
        }
    }

    #[test]
    fn test_boundary_arrays() {
        let mesh = StructuredMesh::new(4, 3, 1.0, 1.0).unwrap();
        for side in Side::ALL {
            assert_eq!(mesh.boundary_edges(side).count(), mesh.boundary_len(side));
            for (t, k) in mesh.boundary_edges(side) {
                assert_eq!(mesh.neighbor_of(t, k), None);
            }
        }
        assert_eq!(mesh.boundary_edge(Side::Bottom, 2), Some((4, 0)));
        assert_eq!(mesh.boundary_triangle(Side::Top, 0), Some(mesh.triangle_at(0, 2, true)));
        assert_eq!(mesh.boundary_triangle(Side::Right, 1), Some(mesh.triangle_at(3, 1, false)));
        assert_eq!(mesh.boundary_edge(Side::Left, 3), None);

        let n = mesh.edge_geometry(mesh.triangle_at(0, 1, true), 2).normal;
        assert_eq!(n, Point::new(-1.0, 0.0));
    }

    #[test]
    fn test_locate() {
        let mesh = StructuredMesh::new(2, 2, 1.0, 1.0).unwrap().with_origin(Point::new(-1.0, -1.0));
        assert_eq!(mesh.locate(Point::new(-0.2, -0.9)), Some(mesh.triangle_at(0, 0, false)));
        assert_eq!(mesh.locate(Point::new(-0.9, -0.2)), Some(mesh.triangle_at(0, 0, true)));
        assert_eq!(mesh.locate(Point::new(1.0, 1.0)), Some(mesh.triangle_at(1, 1, false)));
        assert_eq!(mesh.locate(Point::new(1.5, 0.0)), None);
        let c = mesh.centroid(5);
        assert_eq!(mesh.locate(c), Some(5));
    }
}
