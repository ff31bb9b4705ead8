// apps/tf_cli/src/commands/info.rs

//! Show mesh and configuration details

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tf_config::SimulationConfig;
use tf_mesh::io::GmshLoader;
use tf_mesh::{MeshTopology, TriangularMesh};
use tf_physics::{scenarios, EngineConfig, ShallowWaterEngine};

use super::{config_dir, Domain};

/// Info arguments
#[derive(Args)]
pub struct InfoArgs {
    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gmsh mesh file
    #[arg(short, long)]
    pub mesh: Option<PathBuf>,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    if let Some(path) = &args.config {
        let config = SimulationConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?;
        print_config(&config);
        let domain = Domain::load(&config, config_dir(path))?;
        println!();
        print_mesh(domain.topology());
        print_initial_step(&config, &domain)?;
    }

    if let Some(path) = &args.mesh {
        let gmsh = GmshLoader::load(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mesh = TriangularMesh::build(&gmsh.source).context("malformed mesh")?;
        println!();
        print_mesh(&mesh);
        if let Some(z) = mesh.node_elevations() {
            let (lo, hi) = z.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            println!("node elevation:    [{lo}, {hi}]");
        }
        let mut names: Vec<_> = gmsh.physical_names.iter().collect();
        names.sort();
        for (tag, name) in names {
            let count = gmsh.segments.iter().filter(|s| s.in_group(*tag)).count();
            println!("physical {tag:>3} {name:<12} {count} segments");
        }
    }

    if args.config.is_none() && args.mesh.is_none() {
        println!("TriFlow {}", env!("CARGO_PKG_VERSION"));
        println!();
        print_config(&SimulationConfig::default());
    }
    Ok(())
}

fn print_config(config: &SimulationConfig) {
    let p = &config.physics;
    let n = &config.numerics;
    println!("=== Configuration ===");
    println!("scenario:          {}", config.scenario.kind.name());
    println!("gravity:           {} m/s²", p.gravity);
    println!("dry threshold:     {} m", p.h_dry);
    println!("coriolis/friction: {} / {} 1/s", p.coriolis, p.friction);
    println!("flux:              {:?} ({:?} wave speeds)", n.flux, n.wave_speeds);
    println!("reconstruction:    {:?} ({:?} limiter)", n.reconstruction, n.limiter);
    println!("time scheme:       {:?}", n.time_scheme);
    println!("cfl / dt_max:      {} / {} s", n.cfl, n.dt_max);
    println!("end time:          {:?}", config.run.end_time);
    println!("max steps:         {:?}", config.run.max_steps);
}

fn print_mesh(mesh: &dyn MeshTopology) {
    let (lo, hi) = mesh.bounds();
    let (r_min, r_max) = (0..mesh.n_triangles())
        .map(|t| mesh.inradius(t))
        .fold((f64::INFINITY, 0.0f64), |(a, b), r| (a.min(r), b.max(r)));
    println!("=== Mesh ===");
    println!("kind:              {:?}", mesh.mesh_kind());
    println!("nodes:             {}", mesh.n_nodes());
    println!("triangles:         {}", mesh.n_triangles());
    println!("boundary edges:    {}", mesh.n_boundary_edges());
    println!("area:              {:.6}", mesh.total_area());
    println!("bounds:            ({}, {}) - ({}, {})", lo.x, lo.y, hi.x, hi.y);
    println!("inradius:          [{:.4e}, {:.4e}]", r_min, r_max);
}

fn print_initial_step(config: &SimulationConfig, domain: &Domain) -> Result<()> {
    let mesh = domain.topology();
    let scenario = scenarios::from_config(&config.scenario.kind, domain.center(), config.physics.gravity);
    let (bathymetry, state) = scenarios::initialize(mesh, scenario.as_ref());
    let engine = ShallowWaterEngine::new(mesh, bathymetry, state, EngineConfig::from_simulation(config))?;
    let info = engine.time_step_info();
    println!("initial dt:        {:.4e} s (max wave speed {:.4e} m/s)", info.dt, info.max_wave_speed);
    println!("initial state:     {}", engine.diagnostics());
    Ok(())
}
