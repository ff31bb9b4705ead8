// apps/tf_cli/src/commands/mesh.rs

//! Export a structured grid as a Gmsh v2.2 file

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tf_mesh::io::GmshWriter;
use tf_mesh::{MeshSource, MeshTopology, StructuredMesh};
use tracing::info;

/// Mesh export arguments
#[derive(Args)]
pub struct MeshArgs {
    /// Output file (.msh)
    pub output: PathBuf,

    /// Cells in x
    #[arg(long, default_value_t = 40)]
    pub nx: usize,

    /// Cells in y
    #[arg(long, default_value_t = 40)]
    pub ny: usize,

    /// Domain length in x [m]
    #[arg(long, default_value_t = 4.0)]
    pub length_x: f64,

    /// Domain length in y [m]
    #[arg(long, default_value_t = 4.0)]
    pub length_y: f64,
}

/// Execute the mesh command
pub fn execute(args: MeshArgs) -> Result<()> {
    let grid = StructuredMesh::from_extent(args.nx, args.ny, args.length_x, args.length_y).context("invalid grid")?;
    let source = MeshSource::from_topology(&grid);
    GmshWriter::write(&args.output, &source).with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        "wrote {} ({} nodes, {} triangles)",
        args.output.display(),
        grid.n_nodes(),
        grid.n_triangles()
    );
    Ok(())
}
