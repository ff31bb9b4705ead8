// apps/tf_cli/src/main.rs

//! TriFlow command line interface
//!
//! Runs the benchmark scenarios of the shallow-water engine from a YAML or
//! JSON configuration, inspects meshes and configurations, and exports
//! structured grids as Gmsh files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// TriFlow shallow-water solver
#[derive(Parser)]
#[command(name = "triflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Finite-volume shallow-water solver on triangular meshes", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario
    Run(commands::run::RunArgs),
    /// Show mesh and configuration details
    Info(commands::info::InfoArgs),
    /// Check configuration and mesh files
    Validate(commands::validate::ValidateArgs),
    /// Export a structured grid as a Gmsh file
    Mesh(commands::mesh::MeshArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_lowercase()));
    // also forwards `log` records from the library crates
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Mesh(args) => commands::mesh::execute(args),
    }
}
