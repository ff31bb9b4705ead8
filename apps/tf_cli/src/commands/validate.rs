// apps/tf_cli/src/commands/validate.rs

//! Check configuration and mesh files without running

use anyhow::{bail, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tf_config::SimulationConfig;
use tf_mesh::io::GmshLoader;
use tf_mesh::{MeshError, MeshTopology, TriangularMesh};
use tracing::{error, info};

use super::{config_dir, Domain};

/// Validate arguments
#[derive(Args)]
pub struct ValidateArgs {
    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gmsh mesh file
    #[arg(short, long)]
    pub mesh: Option<PathBuf>,
}

/// Execute the validate command
pub fn execute(args: ValidateArgs) -> Result<()> {
    if args.config.is_none() && args.mesh.is_none() {
        println!("usage: triflow validate --config <file> [--mesh <file.msh>]");
        return Ok(());
    }

    let mut failures = Vec::new();
    if let Some(path) = &args.config {
        if let Err(e) = validate_config(path) {
            failures.push(format!("{}: {:#}", path.display(), e));
        }
    }
    if let Some(path) = &args.mesh {
        if let Err(e) = validate_mesh(path) {
            failures.push(format!("{}: {}", path.display(), e));
        }
    }

    if failures.is_empty() {
        info!("all checks passed");
        return Ok(());
    }
    for f in &failures {
        error!("{}", f);
    }
    bail!("{} file(s) failed validation", failures.len())
}

fn validate_config(path: &Path) -> Result<()> {
    // load() already runs SimulationConfig::validate
    let config = SimulationConfig::load(path)?;
    info!("{}: configuration ok ({})", path.display(), config.scenario.kind.name());
    let domain = Domain::load(&config, config_dir(path))?;
    info!(
        "{}: domain ok ({} triangles, {} open edges)",
        path.display(),
        domain.topology().n_triangles(),
        domain.open_edges(&config).len()
    );
    Ok(())
}

fn validate_mesh(path: &Path) -> Result<(), MeshError> {
    let gmsh = GmshLoader::load(path)?;
    let mesh = TriangularMesh::build(&gmsh.source)?;
    info!(
        "{}: mesh ok ({} nodes, {} triangles, {} boundary edges, {} boundary segments)",
        path.display(),
        mesh.n_nodes(),
        mesh.n_triangles(),
        mesh.n_boundary_edges(),
        gmsh.segments.len()
    );
    Ok(())
}
