// crates/tf_mesh/src/unstructured.rs

//! Unstructured triangular mesh
//!
//! [`TriangularMesh::build`] is the only place where a mesh description is
//! validated. Afterwards the mesh is immutable and every query is a cache
//! lookup.
//!
//! # Construction
//!
//! 1. Map node tags to dense indices (tags may be 0- or 1-based or sparse).
//! 2. Resolve triangle node references, reject repeated nodes and
//!    degenerate triangles, re-wind clockwise triangles.
//! 3. Edge matching: a map from the unordered node pair to its one or two
//!    owners is filled in one pass and turned into the neighbour table in a
//!    second. A third owner means the mesh is not manifold.
//! 4. An explicit neighbour table, when supplied, must be reciprocal and agree
//!    with the shared edges.
//! 5. Cache area, centroid and per-edge geometry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::geometry::{self, Point};
use crate::topology::{EdgeGeometry, MeshKind, MeshTopology};

/// Relative area threshold: `|A| <= DEGENERATE_RATIO * longest_edge^2` is degenerate
const DEGENERATE_RATIO: f64 = 1e-12;

// ============================================================
// Source description
// ============================================================

/// Node as read from a description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    /// Node tag
    pub tag: i64,
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// Optional bed elevation
    #[serde(default)]
    pub elevation: Option<f64>,
}

/// Triangle as read from a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTriangle {
    /// Triangle tag
    pub tag: i64,
    /// Node tags
    pub nodes: [i64; 3],
}

/// In-memory mesh description: node list, connectivity list and an optional
/// neighbour table (triangle tags, one row per triangle, in triangle order).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshSource {
    /// Nodes
    pub nodes: Vec<SourceNode>,
    /// Triangles
    pub triangles: Vec<SourceTriangle>,
    /// Explicit adjacency, checked against the shared edges
    #[serde(default)]
    pub neighbors: Option<Vec<[Option<i64>; 3]>>,
}

impl MeshSource {
    /// Empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node
    pub fn push_node(&mut self, tag: i64, x: f64, y: f64) -> &mut Self {
        self.nodes.push(SourceNode { tag, x, y, elevation: None });
        self
    }

    /// Add a triangle
    pub fn push_triangle(&mut self, tag: i64, nodes: [i64; 3]) -> &mut Self {
        self.triangles.push(SourceTriangle { tag, nodes });
        self
    }

    /// Attach an explicit neighbour table
    pub fn with_neighbors(mut self, neighbors: Vec<[Option<i64>; 3]>) -> Self {
        self.neighbors = Some(neighbors);
        self
    }

    /// Describe an existing mesh with 0-based tags, including its adjacency
    pub fn from_topology<M: MeshTopology + ?Sized>(mesh: &M) -> Self {
        let nodes = (0..mesh.n_nodes())
            .map(|i| {
                let p = mesh.node(i);
                SourceNode { tag: i as i64, x: p.x, y: p.y, elevation: None }
            })
            .collect();
        let triangles = (0..mesh.n_triangles())
            .map(|t| {
                let [a, b, c] = mesh.nodes_of(t);
                SourceTriangle { tag: t as i64, nodes: [a as i64, b as i64, c as i64] }
            })
            .collect();
        let neighbors = (0..mesh.n_triangles())
            .map(|t| std::array::from_fn(|k| mesh.neighbor_of(t, k).map(|n| n as i64)))
            .collect();
        Self { nodes, triangles, neighbors: Some(neighbors) }
    }
}

// ============================================================
// Mesh
// ============================================================

/// Edge owners collected during matching: (triangle, local edge, reversed)
#[derive(Debug, Clone, Copy)]
struct EdgeOwners {
    first: (usize, usize, bool),
    second: Option<(usize, usize, bool)>,
}

/// Unstructured triangular mesh with explicit adjacency
///
/// Deliberately not `Clone`: build it once and pass it by reference.
#[derive(Debug)]
pub struct TriangularMesh {
    points: Vec<Point>,
    node_tags: Vec<i64>,
    elevations: Option<Vec<f64>>,

    triangles: Vec<[usize; 3]>,
    triangle_tags: Vec<i64>,
    tag_to_triangle: HashMap<i64, usize>,
    neighbors: Vec<[Option<usize>; 3]>,

    areas: Vec<f64>,
    centroids: Vec<Point>,
    edges: Vec<[EdgeGeometry; 3]>,
}

impl TriangularMesh {
    /// Validate a description and build the mesh.
    pub fn build(source: &MeshSource) -> MeshResult<Self> {
        if source.nodes.is_empty() {
            return Err(MeshError::Empty { what: "node" });
        }
        if source.triangles.is_empty() {
            return Err(MeshError::Empty { what: "triangle" });
        }

        // 1. nodes
        let mut tag_to_node = HashMap::with_capacity(source.nodes.len());
        let mut points = Vec::with_capacity(source.nodes.len());
        let mut node_tags = Vec::with_capacity(source.nodes.len());
        for (i, n) in source.nodes.iter().enumerate() {
            if tag_to_node.insert(n.tag, i).is_some() {
                return Err(MeshError::DuplicateNodeTag { tag: n.tag });
            }
            points.push(Point::new(n.x, n.y));
            node_tags.push(n.tag);
        }
        let elevations = source
            .nodes
            .iter()
            .map(|n| n.elevation)
            .collect::<Option<Vec<f64>>>();

        // 2. triangles
        let n_tri = source.triangles.len();
        let mut triangles = Vec::with_capacity(n_tri);
        let mut triangle_tags = Vec::with_capacity(n_tri);
        let mut tag_to_triangle = HashMap::with_capacity(n_tri);
        let mut rewound = vec![false; n_tri];
        for (t, tri) in source.triangles.iter().enumerate() {
            if tag_to_triangle.insert(tri.tag, t).is_some() {
                return Err(MeshError::DuplicateTriangleTag { tag: tri.tag });
            }
            let mut idx = [0usize; 3];
            for (slot, &tag) in idx.iter_mut().zip(tri.nodes.iter()) {
                *slot = *tag_to_node
                    .get(&tag)
                    .ok_or(MeshError::UnknownNode { triangle: tri.tag, node: tag })?;
            }
            if idx[0] == idx[1] || idx[0] == idx[2] {
                return Err(MeshError::RepeatedNode { triangle: tri.tag, node: tri.nodes[0] });
            }
            if idx[1] == idx[2] {
                return Err(MeshError::RepeatedNode { triangle: tri.tag, node: tri.nodes[1] });
            }

            let (a, b, c) = (points[idx[0]], points[idx[1]], points[idx[2]]);
            let area = geometry::triangle_area(a, b, c);
            let scale = geometry::longest_edge(a, b, c);
            if !area.is_finite() || area.abs() <= DEGENERATE_RATIO * scale * scale {
                return Err(MeshError::DegenerateTriangle { triangle: tri.tag, area });
            }
            if area < 0.0 {
                idx.swap(1, 2);
                rewound[t] = true;
            }
            triangles.push(idx);
            triangle_tags.push(tri.tag);
        }

        // 3. edge matching
        let neighbors = Self::match_edges(&triangles, &node_tags, &triangle_tags)?;

        // 4. explicit adjacency
        if let Some(explicit) = &source.neighbors {
            Self::check_explicit_neighbors(
                explicit,
                &rewound,
                &tag_to_triangle,
                &triangle_tags,
                &neighbors,
            )?;
        }

        // 5. geometry cache
        let mut areas = Vec::with_capacity(n_tri);
        let mut centroids = Vec::with_capacity(n_tri);
        let mut edges = Vec::with_capacity(n_tri);
        for tri in &triangles {
            let p = [points[tri[0]], points[tri[1]], points[tri[2]]];
            areas.push(geometry::triangle_area(p[0], p[1], p[2]));
            centroids.push(geometry::average(&p));
            edges.push(std::array::from_fn(|k| {
                EdgeGeometry::from_segment(p[k], p[(k + 1) % 3])
            }));
        }

        let n_rewound = rewound.iter().filter(|&&r| r).count();
        if n_rewound > 0 {
            log::debug!("re-wound {} clockwise triangles", n_rewound);
        }
        log::debug!(
            "built triangular mesh: {} nodes, {} triangles",
            points.len(),
            triangles.len()
        );

        Ok(Self {
            points,
            node_tags,
            elevations,
            triangles,
            triangle_tags,
            tag_to_triangle,
            neighbors,
            areas,
            centroids,
            edges,
        })
    }

    /// Two-pass edge matching over CCW triangles.
    fn match_edges(
        triangles: &[[usize; 3]],
        node_tags: &[i64],
        triangle_tags: &[i64],
    ) -> MeshResult<Vec<[Option<usize>; 3]>> {
        let mut owners: HashMap<(usize, usize), EdgeOwners> =
            HashMap::with_capacity(triangles.len() * 2);

        for (t, tri) in triangles.iter().enumerate() {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let key = (a.min(b), a.max(b));
                let entry = (t, k, a > b);
                match owners.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(EdgeOwners { first: entry, second: None });
                    }
                    Entry::Occupied(mut slot) => {
                        let o = slot.get_mut();
                        if o.second.is_some() {
                            return Err(MeshError::NonManifoldEdge {
                                a: node_tags[key.0],
                                b: node_tags[key.1],
                            });
                        }
                        o.second = Some(entry);
                    }
                }
            }
        }

        let mut neighbors = vec![[None; 3]; triangles.len()];
        for o in owners.values() {
            if let Some((t2, k2, rev2)) = o.second {
                let (t1, k1, rev1) = o.first;
                // two CCW triangles on opposite sides walk a shared edge in
                // opposite directions
                if rev1 == rev2 {
                    return Err(MeshError::NeighborMismatch {
                        triangle: triangle_tags[t2],
                        edge: k2,
                        details: format!("overlaps triangle {}", triangle_tags[t1]),
                    });
                }
                neighbors[t1][k1] = Some(t2);
                neighbors[t2][k2] = Some(t1);
            }
        }
        Ok(neighbors)
    }

    fn check_explicit_neighbors(
        explicit: &[[Option<i64>; 3]],
        rewound: &[bool],
        tag_to_triangle: &HashMap<i64, usize>,
        triangle_tags: &[i64],
        matched: &[[Option<usize>; 3]],
    ) -> MeshResult<()> {
        let n = matched.len();
        if explicit.len() != n {
            return Err(MeshError::NeighborMismatch {
                triangle: triangle_tags[explicit.len().min(n - 1)],
                edge: 0,
                details: format!("neighbour table has {} rows for {} triangles", explicit.len(), n),
            });
        }

        // resolve tags and follow re-winding: swapping nodes 1 and 2 maps
        // old edges (0, 1, 2) to new edges (2, 1, 0)
        let mut table = vec![[None; 3]; n];
        for t in 0..n {
            for k in 0..3 {
                let Some(tag) = explicit[t][k] else { continue };
                let nb = *tag_to_triangle.get(&tag).ok_or_else(|| MeshError::NeighborMismatch {
                    triangle: triangle_tags[t],
                    edge: k,
                    details: format!("unknown neighbour tag {}", tag),
                })?;
                let slot = if rewound[t] { 2 - k } else { k };
                table[t][slot] = Some(nb);
            }
        }

        for t in 0..n {
            for k in 0..3 {
                if let Some(nb) = table[t][k] {
                    if !table[nb].contains(&Some(t)) {
                        return Err(MeshError::NonReciprocalNeighbor {
                            triangle: triangle_tags[t],
                            neighbor: triangle_tags[nb],
                        });
                    }
                }
            }
        }

        for t in 0..n {
            for k in 0..3 {
                if table[t][k] != matched[t][k] {
                    let shown = |v: Option<usize>| {
                        v.map_or_else(|| "boundary".to_string(), |i| triangle_tags[i].to_string())
                    };
                    return Err(MeshError::NeighborMismatch {
                        triangle: triangle_tags[t],
                        edge: k,
                        details: format!(
                            "listed neighbour {} but the shared edge gives {}",
                            shown(table[t][k]),
                            shown(matched[t][k])
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Source tag of a node
    #[inline]
    pub fn node_tag(&self, node: usize) -> i64 {
        self.node_tags[node]
    }

    /// Source tag of a triangle
    #[inline]
    pub fn triangle_tag(&self, triangle: usize) -> i64 {
        self.triangle_tags[triangle]
    }

    /// Dense index of a triangle tag
    #[inline]
    pub fn triangle_index(&self, tag: i64) -> Option<usize> {
        self.tag_to_triangle.get(&tag).copied()
    }

    /// Node elevations, present when every source node carried one
    #[inline]
    pub fn node_elevations(&self) -> Option<&[f64]> {
        self.elevations.as_deref()
    }

    /// Elevation of one node
    #[inline]
    pub fn node_elevation(&self, node: usize) -> Option<f64> {
        self.elevations.as_ref().map(|z| z[node])
    }

    /// Boundary `(triangle, local edge)` keyed by the sorted node-tag pair
    pub fn boundary_edges_by_tags(&self) -> HashMap<(i64, i64), (usize, usize)> {
        let mut map = HashMap::new();
        for (t, tri) in self.triangles.iter().enumerate() {
            for k in 0..3 {
                if self.neighbors[t][k].is_none() {
                    let a = self.node_tags[tri[k]];
                    let b = self.node_tags[tri[(k + 1) % 3]];
                    map.insert((a.min(b), a.max(b)), (t, k));
                }
            }
        }
        map
    }
}

impl MeshTopology for TriangularMesh {
    #[inline]
    fn n_nodes(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn n_triangles(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    fn node(&self, node: usize) -> Point {
        self.points[node]
    }

    #[inline]
    fn nodes_of(&self, triangle: usize) -> [usize; 3] {
        self.triangles[triangle]
    }

    #[inline]
    fn neighbor_of(&self, triangle: usize, edge: usize) -> Option<usize> {
        self.neighbors[triangle][edge]
    }

    #[inline]
    fn edge_geometry(&self, triangle: usize, edge: usize) -> EdgeGeometry {
        self.edges[triangle][edge]
    }

    #[inline]
    fn area(&self, triangle: usize) -> f64 {
        self.areas[triangle]
    }

    #[inline]
    fn centroid(&self, triangle: usize) -> Point {
        self.centroids[triangle]
    }

    fn mesh_kind(&self) -> MeshKind {
        MeshKind::Unstructured
    }
}
