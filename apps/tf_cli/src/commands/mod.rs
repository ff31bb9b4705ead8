// apps/tf_cli/src/commands/mod.rs

//! Subcommands and the domain loading they share

pub mod info;
pub mod mesh;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use tf_config::SimulationConfig;
use tf_mesh::io::GmshLoader;
use tf_mesh::{MeshTopology, StructuredMesh, TriangularMesh};
use tracing::{debug, warn};

/// Computational domain of a run
pub enum Domain {
    /// Grid from the `scenario.grid` section
    Structured(StructuredMesh),
    /// Mesh read from a Gmsh file
    File {
        /// Validated mesh
        mesh: TriangularMesh,
        /// Boundary edges whose physical group is listed in `open_names`
        open_edges: Vec<(usize, usize)>,
    },
}

impl Domain {
    /// Build from configuration; `mesh_file` is relative to `base_dir`
    pub fn load(config: &SimulationConfig, base_dir: &Path) -> Result<Self> {
        let scenario = &config.scenario;
        let Some(file) = &scenario.mesh_file else {
            let g = &scenario.grid;
            let mesh = StructuredMesh::from_extent(g.nx, g.ny, g.length_x, g.length_y)
                .context("invalid grid")?
                .with_origin(g.origin.into());
            return Ok(Self::Structured(mesh));
        };

        let path = base_dir.join(file);
        let gmsh = GmshLoader::load(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let mesh = TriangularMesh::build(&gmsh.source)
            .with_context(|| format!("malformed mesh in {}", path.display()))?;

        let by_tags = mesh.boundary_edges_by_tags();
        let mut open_edges = Vec::new();
        for segment in gmsh.segments_named(&scenario.open_names) {
            let [a, b] = segment.nodes;
            match by_tags.get(&(a.min(b), a.max(b))) {
                Some(&edge) => open_edges.push(edge),
                None => warn!("segment {}-{} is not on the mesh boundary, ignored", a, b),
            }
        }
        debug!("{} open boundary edges from {}", open_edges.len(), path.display());
        Ok(Self::File { mesh, open_edges })
    }

    /// The mesh behind the domain
    pub fn topology(&self) -> &dyn MeshTopology {
        match self {
            Self::Structured(m) => m,
            Self::File { mesh, .. } => mesh,
        }
    }

    /// Edges to open, from `open_sides` or the Gmsh physical groups
    pub fn open_edges(&self, config: &SimulationConfig) -> Vec<(usize, usize)> {
        match self {
            Self::Structured(m) => config
                .scenario
                .open_sides
                .iter()
                .flat_map(|&side| m.boundary_edges(side))
                .collect(),
            Self::File { open_edges, .. } => open_edges.clone(),
        }
    }

    /// Centre of the domain's bounding box
    pub fn center(&self) -> [f64; 2] {
        let (lo, hi) = self.topology().bounds();
        let c = (lo + hi) * 0.5;
        [c.x, c.y]
    }
}

/// Directory a configuration file lives in
pub fn config_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}
