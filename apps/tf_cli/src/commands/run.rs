// apps/tf_cli/src/commands/run.rs

//! Run a scenario
//!
//! Steps at the stable time step until `run.end_time` or `run.max_steps`,
//! logs diagnostics every `run.report_every` steps and writes JSON
//! snapshots to the output directory.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tf_config::SimulationConfig;
use tf_physics::scenarios::{self, ErrorNorms};
use tf_physics::{BoundaryKind, Diagnostics, EngineConfig, FlowState, ShallowWaterEngine};
use tracing::{info, warn};

use super::{config_dir, Domain};

/// Run arguments
#[derive(Args)]
pub struct RunArgs {
    /// Configuration file (.yaml, .yml or .json)
    pub config: PathBuf,

    /// Output directory, overrides `output.directory`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// End time [s], overrides `run.end_time`
    #[arg(short = 't', long)]
    pub end_time: Option<f64>,

    /// Step limit, overrides `run.max_steps`
    #[arg(short = 'n', long)]
    pub max_steps: Option<usize>,
}

/// One snapshot file
#[derive(Serialize)]
struct Snapshot<'a> {
    time: f64,
    step: u64,
    state: &'a FlowState,
    diagnostics: Diagnostics,
}

/// Run summary file
#[derive(Serialize)]
struct Summary {
    scenario: &'static str,
    triangles: usize,
    steps: u64,
    time: f64,
    wall_seconds: f64,
    initial: Diagnostics,
    last: Diagnostics,
    relative_mass_drift: f64,
    clamped_cells: usize,
    error: Option<ErrorNorms>,
}

/// Execute the run command
pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = SimulationConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    if let Some(dir) = args.output {
        config.output.directory = dir;
    }
    if args.end_time.is_some() {
        config.run.end_time = args.end_time;
    }
    if args.max_steps.is_some() {
        config.run.max_steps = args.max_steps;
    }
    config.validate().context("invalid configuration")?;

    let domain = Domain::load(&config, config_dir(&args.config))?;
    let mesh = domain.topology();
    let scenario = scenarios::from_config(&config.scenario.kind, domain.center(), config.physics.gravity);
    info!(
        "scenario {}: {} triangles, {} nodes",
        scenario.name(),
        mesh.n_triangles(),
        mesh.n_nodes()
    );

    let (bathymetry, state) = scenarios::initialize(mesh, scenario.as_ref());
    let mut engine = ShallowWaterEngine::new(mesh, bathymetry, state, EngineConfig::from_simulation(&config))
        .context("failed to set up the engine")?;
    let opened = engine.set_boundaries(domain.open_edges(&config), BoundaryKind::Open)?;
    if opened > 0 {
        info!("{} open boundary edges", opened);
    }

    let out_dir = &config.output.directory;
    std::fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;

    let initial = engine.diagnostics();
    info!("{}", initial);
    if config.output.snapshot_every.is_some() {
        write_snapshot(out_dir, &engine)?;
    }

    let end_time = config.run.end_time;
    let max_steps = config.run.max_steps.map(|n| n as u64);
    let start = Instant::now();
    loop {
        if max_steps.is_some_and(|n| engine.step_count() >= n) {
            break;
        }
        let mut dt = engine.compute_stable_dt();
        if let Some(t_end) = end_time {
            let remaining = t_end - engine.time();
            if remaining <= 1e-12 * t_end.max(1.0) {
                break;
            }
            dt = dt.min(remaining);
        }

        if let Err(e) = engine.step(dt).map(|_| ()) {
            warn!("stopping after {} steps", engine.step_count());
            write_snapshot(out_dir, &engine)?;
            return Err(e).context("simulation failed");
        }

        let step = engine.step_count();
        if step % config.run.report_every as u64 == 0 {
            let stats = engine.stats();
            info!(
                "step {:>6}  dt={:.3e}  smax={:.3e}  {}",
                step,
                stats.last_dt,
                stats.max_wave_speed,
                engine.diagnostics()
            );
        }
        if config.output.snapshot_every.is_some_and(|every| step % every as u64 == 0) {
            write_snapshot(out_dir, &engine)?;
        }
    }
    let wall = start.elapsed().as_secs_f64();

    let last = engine.diagnostics();
    let drift = if initial.total_mass > 0.0 {
        (last.total_mass - initial.total_mass) / initial.total_mass
    } else {
        0.0
    };
    let error = scenario
        .has_exact_solution()
        .then(|| scenarios::compare(mesh, engine.state(), scenario.as_ref(), engine.time()));

    info!("finished: {} steps to t = {:.6} s in {:.2} s", engine.step_count(), engine.time(), wall);
    info!("{}", last);
    info!("relative mass drift {:.3e}", drift);
    if let Some(norms) = &error {
        info!(
            "error against exact solution: L1={:.4e} L2={:.4e} Linf={:.4e} (relative L1 {:.4e})",
            norms.l1, norms.l2, norms.linf, norms.relative_l1
        );
    }

    write_json(
        &out_dir.join("final.json"),
        &Snapshot {
            time: engine.time(),
            step: engine.step_count(),
            state: engine.state(),
            diagnostics: last,
        },
    )?;
    write_json(
        &out_dir.join("summary.json"),
        &Summary {
            scenario: scenario.name(),
            triangles: mesh.n_triangles(),
            steps: engine.step_count(),
            time: engine.time(),
            wall_seconds: wall,
            initial,
            last,
            relative_mass_drift: drift,
            clamped_cells: engine.stats().total_clamped,
            error,
        },
    )?;
    Ok(())
}

fn write_snapshot<M>(dir: &Path, engine: &ShallowWaterEngine<'_, M>) -> Result<()>
where
    M: tf_mesh::MeshTopology + ?Sized,
{
    let snapshot = Snapshot {
        time: engine.time(),
        step: engine.step_count(),
        state: engine.state(),
        diagnostics: engine.diagnostics(),
    };
    write_json(&dir.join(format!("snapshot_{:06}.json", snapshot.step)), &snapshot)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))
}
