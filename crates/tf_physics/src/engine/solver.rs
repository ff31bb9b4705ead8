// crates/tf_physics/src/engine/solver.rs

//! Shallow-water engine
//!
//! Owns the flow state and advances it in time with a finite-volume
//! scheme:
//!
//! 1. with MUSCL reconstruction, limited cell gradients are computed from
//!    the frozen input state; otherwise cell values are used as they are
//! 2. every edge is visited once through its owner triangle; both edge
//!    states are hydrostatically reconstructed and handed to the Riemann
//!    solver (boundary edges against a ghost state)
//! 3. the owner receives `L (F + g/2 (h_L² - h*_L²) n)`, the neighbour
//!    `-L (F + g/2 (h_R² - h*_R²) n)`; reconstructed cells also get their
//!    centred bed source
//! 4. `U ← U - dt/A · residual`, then source terms and the wet/dry
//!    correction
//!
//! A step is atomic: it is computed into a separate buffer and only
//! committed when every value is finite. Large meshes evaluate the edge
//! fluxes with rayon; the results are scattered serially in edge order, so
//! the serial and parallel paths give bit-identical states.

use rayon::prelude::*;
use tf_config::{FluxKind, LimiterKind, ReconstructionKind, SimulationConfig, TimeScheme, WaveSpeedKind};
use tf_mesh::{EdgeGeometry, Face, MeshTopology, Point};

use super::time_integrator::{create_integrator, EulerOperator, StageReport, TimeIntegrator};
use super::timestep::{CflCalculator, TimeStepInfo};
use crate::bathymetry::Bathymetry;
use crate::boundary::{ghost_state, BoundaryKind};
use crate::diagnostics::Diagnostics;
use crate::error::{PhysicsError, PhysicsResult};
use crate::params::NumericalParams;
use crate::schemes::{
    create_solver, CellGradient, CellValues, CorrectionReport, HydrostaticReconstruction, MusclReconstruction,
    RiemannSolver, WettingDrying,
};
use crate::sources::SourceTerms;
use crate::state::FlowState;

// ============================================================
// Configuration
// ============================================================

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Numerical parameters
    pub params: NumericalParams,
    /// Edge flux
    pub flux: FluxKind,
    /// Wave speed estimate of the HLL flux
    pub wave_speeds: WaveSpeedKind,
    /// Edge reconstruction
    pub reconstruction: ReconstructionKind,
    /// Limiter of the MUSCL reconstruction
    pub limiter: LimiterKind,
    /// Time integrator
    pub time_scheme: TimeScheme,
    /// Coriolis and friction
    pub sources: SourceTerms,
    /// Triangle count from which edge fluxes are computed in parallel
    pub parallel_threshold: usize,
    /// Condition of every boundary edge until overridden
    pub default_boundary: BoundaryKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            params: NumericalParams::default(),
            flux: FluxKind::Hllc,
            wave_speeds: WaveSpeedKind::Einfeldt,
            reconstruction: ReconstructionKind::FirstOrder,
            limiter: LimiterKind::BarthJespersen,
            time_scheme: TimeScheme::ForwardEuler,
            sources: SourceTerms::default(),
            parallel_threshold: 20_000,
            default_boundary: BoundaryKind::Wall,
        }
    }
}

impl EngineConfig {
    /// From a run configuration
    pub fn from_simulation(config: &SimulationConfig) -> Self {
        Self {
            params: NumericalParams::from_config(config),
            flux: config.numerics.flux,
            wave_speeds: config.numerics.wave_speeds,
            reconstruction: config.numerics.reconstruction,
            limiter: config.numerics.limiter,
            time_scheme: config.numerics.time_scheme,
            sources: SourceTerms::from_config(&config.physics),
            parallel_threshold: config.numerics.parallel_threshold,
            default_boundary: BoundaryKind::Wall,
        }
    }
}

// ============================================================
// Statistics
// ============================================================

/// Running statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineStats {
    /// Committed steps
    pub steps: u64,
    /// Last committed step [s]
    pub last_dt: f64,
    /// Fastest edge signal of the last step [m/s]
    pub max_wave_speed: f64,
    /// Negative depths clamped during the last step
    pub clamped_cells: usize,
    /// Negative depths clamped since construction
    pub total_clamped: usize,
    /// Depth added by clamping during the last step, summed over cells [m]
    pub clamped_depth: f64,
    /// Dry cells after the last step
    pub dry_cells: usize,
}

// ============================================================
// Flux kernel
// ============================================================

/// Per-edge result before scattering
#[derive(Debug, Clone, Copy, Default)]
struct FaceContribution {
    owner: [f64; 3],
    neighbor: [f64; 3],
    max_speed: f64,
}

/// Residual accumulators
#[derive(Debug, Default)]
struct Residual {
    h: Vec<f64>,
    hu: Vec<f64>,
    hv: Vec<f64>,
}

impl Residual {
    fn new(n: usize) -> Self {
        Self { h: vec![0.0; n], hu: vec![0.0; n], hv: vec![0.0; n] }
    }

    fn reset(&mut self) {
        self.h.fill(0.0);
        self.hu.fill(0.0);
        self.hv.fill(0.0);
    }

    #[inline]
    fn scatter(&mut self, face: &Face, c: &FaceContribution) {
        let o = face.owner;
        self.h[o] += c.owner[0];
        self.hu[o] += c.owner[1];
        self.hv[o] += c.owner[2];
        if let Some(nb) = face.neighbor {
            self.h[nb] += c.neighbor[0];
            self.hu[nb] += c.neighbor[1];
            self.hv[nb] += c.neighbor[2];
        }
    }
}

/// Scratch space reused between steps
#[derive(Debug, Default)]
struct FluxWorkspace {
    residual: Residual,
    contributions: Vec<FaceContribution>,
    values: Vec<CellValues>,
    gradients: Vec<CellGradient>,
}

/// Cell values and limited gradients of one stage
#[derive(Clone, Copy)]
struct Slopes<'a> {
    values: &'a [CellValues],
    gradients: &'a [CellGradient],
}

/// Everything a stage reads but never writes
struct FluxKernel<'m, M: MeshTopology + ?Sized> {
    mesh: &'m M,
    bathymetry: Bathymetry,
    params: NumericalParams,
    solver: Box<dyn RiemannSolver>,
    reconstruction: HydrostaticReconstruction,
    muscl: Option<MusclReconstruction>,
    wetting_drying: WettingDrying,
    sources: SourceTerms,
    faces: Vec<Face>,
    geometry: Vec<EdgeGeometry>,
    boundary: Vec<BoundaryKind>,
    areas: Vec<f64>,
    parallel: bool,
}

impl<M: MeshTopology + ?Sized> FluxKernel<'_, M> {
    #[inline]
    fn cell_values(&self, input: &FlowState, t: usize) -> CellValues {
        let h = input.h[t];
        CellValues {
            h,
            vel: self.params.safe_velocity(input.hu[t], input.hv[t], h),
            z: self.bathymetry.get(t),
        }
    }

    /// Values of triangle `t` at an edge midpoint
    #[inline]
    fn edge_values(&self, input: &FlowState, slopes: Option<Slopes<'_>>, t: usize, midpoint: Point) -> CellValues {
        match (slopes, &self.muscl) {
            (Some(s), Some(muscl)) => s.gradients[t].extrapolate(s.values[t], muscl.offset(t, midpoint)),
            _ => self.cell_values(input, t),
        }
    }

    /// Cell values and limited gradients for every triangle
    fn reconstruct(
        &self,
        muscl: &MusclReconstruction,
        input: &FlowState,
        values: &mut Vec<CellValues>,
        gradients: &mut Vec<CellGradient>,
    ) {
        let n = input.len();
        if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|t| self.cell_values(input, t))
                .collect_into_vec(values);
        } else {
            values.clear();
            values.extend((0..n).map(|t| self.cell_values(input, t)));
        }

        let values: &[CellValues] = values;
        if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|t| muscl.gradient(t, values))
                .collect_into_vec(gradients);
        } else {
            gradients.clear();
            gradients.extend((0..n).map(|t| muscl.gradient(t, values)));
        }
    }

    /// Flux contribution of one edge; pure function of the input state
    fn face_contribution(&self, index: usize, input: &FlowState, slopes: Option<Slopes<'_>>) -> FaceContribution {
        let face = &self.faces[index];
        let geom = &self.geometry[index];
        let normal = geom.normal;

        let left = self.edge_values(input, slopes, face.owner, geom.midpoint);
        let right = match face.neighbor {
            Some(nb) => self.edge_values(input, slopes, nb, geom.midpoint),
            None => ghost_state(self.boundary[index], left, normal),
        };

        let rec = self.reconstruction.reconstruct(left, right);
        let flux = self.solver.solve(rec.left, rec.right, normal);

        let len = geom.length;
        let mom_left = flux.momentum() + normal * rec.left_correction;
        let mom_right = flux.momentum() + normal * rec.right_correction;
        FaceContribution {
            owner: [len * flux.mass, len * mom_left.x, len * mom_left.y],
            neighbor: [-len * flux.mass, -len * mom_right.x, -len * mom_right.y],
            max_speed: flux.max_wave_speed,
        }
    }

    /// Accumulate all edge fluxes, returns the fastest signal
    fn accumulate(&self, input: &FlowState, ws: &mut FluxWorkspace) -> f64 {
        let FluxWorkspace { residual, contributions, values, gradients } = ws;
        residual.reset();
        let mut max_speed = 0.0f64;

        let slopes = match &self.muscl {
            Some(muscl) => {
                self.reconstruct(muscl, input, values, gradients);
                Some(Slopes { values: values.as_slice(), gradients: gradients.as_slice() })
            }
            None => None,
        };

        if self.parallel {
            (0..self.faces.len())
                .into_par_iter()
                .map(|i| self.face_contribution(i, input, slopes))
                .collect_into_vec(contributions);
            for (face, c) in self.faces.iter().zip(contributions.iter()) {
                residual.scatter(face, c);
                max_speed = max_speed.max(c.max_speed);
            }
        } else {
            for (i, face) in self.faces.iter().enumerate() {
                let c = self.face_contribution(i, input, slopes);
                residual.scatter(face, &c);
                max_speed = max_speed.max(c.max_speed);
            }
        }

        if let (Some(muscl), Some(s)) = (&self.muscl, slopes) {
            for t in 0..s.values.len() {
                let source = muscl.bed_source(t, &s.values[t], &s.gradients[t]);
                residual.hu[t] -= source.x;
                residual.hv[t] -= source.y;
            }
        }
        max_speed
    }
}

/// One Euler stage bound to the engine's kernel and scratch space
struct FluxOperator<'a, 'm, M: MeshTopology + ?Sized> {
    kernel: &'a FluxKernel<'m, M>,
    workspace: &'a mut FluxWorkspace,
}

impl<M: MeshTopology + ?Sized> EulerOperator for FluxOperator<'_, '_, M> {
    fn euler_step(&mut self, input: &FlowState, output: &mut FlowState, dt: f64) -> StageReport {
        let k = self.kernel;
        let max_wave_speed = k.accumulate(input, self.workspace);

        let res = &self.workspace.residual;
        for t in 0..input.len() {
            let scale = dt / k.areas[t];
            output.h[t] = input.h[t] - scale * res.h[t];
            output.hu[t] = input.hu[t] - scale * res.hu[t];
            output.hv[t] = input.hv[t] - scale * res.hv[t];
        }
        k.sources.apply(input, output, dt);
        let correction = k.wetting_drying.correct(output);

        StageReport { max_wave_speed, correction }
    }

    fn correct(&self, state: &mut FlowState) -> CorrectionReport {
        self.kernel.wetting_drying.correct(state)
    }
}

// ============================================================
// Engine
// ============================================================

/// Finite-volume shallow-water engine
///
/// Borrows the mesh for its whole life; owns bathymetry and state.
pub struct ShallowWaterEngine<'m, M: MeshTopology + ?Sized> {
    kernel: FluxKernel<'m, M>,
    config: EngineConfig,
    integrator: Box<dyn TimeIntegrator>,
    cfl: CflCalculator,
    workspace: FluxWorkspace,
    state: FlowState,
    next: FlowState,
    time: f64,
    stats: EngineStats,
}

impl<'m, M: MeshTopology + ?Sized> ShallowWaterEngine<'m, M> {
    /// Bind a mesh, a bed and an initial state
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the bathymetry or any state array does not
    /// have one entry per triangle, `InvalidParameter` for out-of-range
    /// numerical parameters.
    pub fn new(
        mesh: &'m M,
        bathymetry: Bathymetry,
        initial_state: FlowState,
        config: EngineConfig,
    ) -> PhysicsResult<Self> {
        config.params.validate()?;
        let n = mesh.n_triangles();
        PhysicsError::check_len("bathymetry", n, bathymetry.len())?;
        PhysicsError::check_len("h", n, initial_state.h.len())?;
        PhysicsError::check_len("hu", n, initial_state.hu.len())?;
        PhysicsError::check_len("hv", n, initial_state.hv.len())?;

        let params = config.params;
        let parallel = n >= config.parallel_threshold;
        let faces = mesh.faces();
        let geometry: Vec<EdgeGeometry> = faces
            .iter()
            .map(|f| mesh.edge_geometry(f.owner, f.edge))
            .collect();
        let boundary = vec![config.default_boundary; faces.len()];
        let areas = (0..n).map(|t| mesh.area(t)).collect();
        let solver = create_solver(config.flux, config.wave_speeds, &params);
        let integrator = create_integrator(config.time_scheme, n);
        let muscl = match config.reconstruction {
            ReconstructionKind::FirstOrder => None,
            ReconstructionKind::Muscl => {
                Some(MusclReconstruction::new(mesh, config.limiter, params.h_dry, params.gravity))
            }
        };

        log::info!(
            "engine: {} triangles, {} edges ({} boundary), flux {}, {}, {}{}",
            n,
            faces.len(),
            faces.iter().filter(|f| f.is_boundary()).count(),
            solver.name(),
            integrator.name(),
            muscl
                .as_ref()
                .map_or_else(|| "first order".to_string(), |m| format!("MUSCL ({})", m.limiter_name())),
            if parallel { ", parallel fluxes" } else { "" },
        );

        let kernel = FluxKernel {
            mesh,
            bathymetry,
            params,
            solver,
            reconstruction: HydrostaticReconstruction::new(params.gravity),
            muscl,
            wetting_drying: WettingDrying::new(params.h_dry),
            sources: config.sources,
            faces,
            geometry,
            boundary,
            areas,
            parallel,
        };
        let stats = EngineStats {
            dry_cells: kernel.wetting_drying.count_dry(&initial_state),
            ..Default::default()
        };

        Ok(Self {
            cfl: CflCalculator::new(mesh, params, parallel),
            integrator,
            workspace: FluxWorkspace {
                residual: Residual::new(n),
                ..Default::default()
            },
            next: FlowState::new(n),
            state: initial_state,
            time: 0.0,
            kernel,
            config,
            stats,
        })
    }

    /// Start a builder
    pub fn builder(mesh: &'m M) -> EngineBuilder<'m, M> {
        EngineBuilder::new(mesh)
    }

    // ------------------------------------------------------------
    // Time stepping
    // ------------------------------------------------------------

    /// Largest stable step for the current state, never above `dt_max`
    pub fn compute_stable_dt(&self) -> f64 {
        self.time_step_info().dt
    }

    /// CFL evaluation with the limiting triangle
    pub fn time_step_info(&self) -> TimeStepInfo {
        self.cfl.compute(self.kernel.mesh, &self.state)
    }

    /// Advance by `dt`
    ///
    /// # Errors
    ///
    /// `InvalidTimeStep` if `dt` is not positive and finite;
    /// `NumericalInstability` if the new state has a non-finite value. In
    /// both cases state and time are left as they were.
    pub fn step(&mut self, dt: f64) -> PhysicsResult<&FlowState> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(PhysicsError::InvalidTimeStep { dt });
        }

        let report = {
            let mut op = FluxOperator {
                kernel: &self.kernel,
                workspace: &mut self.workspace,
            };
            self.integrator.advance(&mut op, &self.state, &mut self.next, dt)
        };

        if let Some((triangle, field, value)) = self.next.first_non_finite() {
            log::warn!(
                "step {} at t = {:.6e} rejected: {} = {} in triangle {}",
                self.stats.steps + 1,
                self.time,
                field,
                value,
                triangle
            );
            return Err(PhysicsError::NumericalInstability {
                time: self.time,
                triangle,
                field,
                value,
            });
        }

        std::mem::swap(&mut self.state, &mut self.next);
        self.time += dt;

        let clamped = report.correction.clamped;
        if clamped > 0 {
            log::debug!("t = {:.6e}: clamped {} negative depths", self.time, clamped);
        }
        self.stats.steps += 1;
        self.stats.last_dt = dt;
        self.stats.max_wave_speed = report.max_wave_speed;
        self.stats.clamped_cells = clamped;
        self.stats.total_clamped += clamped;
        self.stats.clamped_depth = report.correction.added_depth;
        self.stats.dry_cells = self.kernel.wetting_drying.count_dry(&self.state);

        Ok(&self.state)
    }

    /// Step with the stable time step until `t_end`, returns the step count
    ///
    /// The last step is shortened to land on `t_end`.
    pub fn advance_to(&mut self, t_end: f64) -> PhysicsResult<usize> {
        let tolerance = 1e-12 * t_end.abs().max(1.0);
        let mut steps = 0;
        while t_end - self.time > tolerance {
            let dt = self.compute_stable_dt().min(t_end - self.time);
            self.step(dt)?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Take `n` steps at the stable time step
    pub fn run_steps(&mut self, n: usize) -> PhysicsResult<()> {
        for _ in 0..n {
            let dt = self.compute_stable_dt();
            self.step(dt)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------
    // Boundaries
    // ------------------------------------------------------------

    fn face_index(&self, triangle: usize, edge: usize) -> Option<usize> {
        self.kernel
            .faces
            .binary_search_by(|f| (f.owner, f.edge).cmp(&(triangle, edge)))
            .ok()
            .filter(|&i| self.kernel.faces[i].is_boundary())
    }

    /// Condition of a boundary edge, `None` for interior edges
    pub fn boundary_kind(&self, triangle: usize, edge: usize) -> Option<BoundaryKind> {
        self.face_index(triangle, edge).map(|i| self.kernel.boundary[i])
    }

    /// Set the condition of one boundary edge
    pub fn set_boundary(&mut self, triangle: usize, edge: usize, kind: BoundaryKind) -> PhysicsResult<()> {
        let index = self.face_index(triangle, edge).ok_or_else(|| {
            PhysicsError::invalid(
                "boundary edge",
                format!("({triangle}, {edge})"),
                "not a boundary edge of the mesh",
            )
        })?;
        self.kernel.boundary[index] = kind;
        Ok(())
    }

    /// Set the condition of several boundary edges, returns how many
    pub fn set_boundaries<I>(&mut self, edges: I, kind: BoundaryKind) -> PhysicsResult<usize>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut count = 0;
        for (t, k) in edges {
            self.set_boundary(t, k, kind)?;
            count += 1;
        }
        Ok(count)
    }

    // ------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------

    /// Current state
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Current simulation time [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Committed steps
    pub fn step_count(&self) -> u64 {
        self.stats.steps
    }

    /// Running statistics
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Bed elevation
    pub fn bathymetry(&self) -> &Bathymetry {
        &self.kernel.bathymetry
    }

    /// The mesh
    pub fn mesh(&self) -> &'m M {
        self.kernel.mesh
    }

    /// Configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mass and energy integrals of the current state
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::compute(
            self.kernel.mesh,
            &self.state,
            &self.kernel.bathymetry,
            &self.kernel.params,
            self.time,
        )
    }
}

// ============================================================
// Builder
// ============================================================

/// Engine builder
///
/// Bathymetry defaults to a flat bed at zero, the state to a dry domain.
pub struct EngineBuilder<'m, M: MeshTopology + ?Sized> {
    mesh: &'m M,
    bathymetry: Option<Bathymetry>,
    state: Option<FlowState>,
    config: EngineConfig,
    boundaries: Vec<(usize, usize, BoundaryKind)>,
}

impl<'m, M: MeshTopology + ?Sized> EngineBuilder<'m, M> {
    /// Start from a mesh
    pub fn new(mesh: &'m M) -> Self {
        Self {
            mesh,
            bathymetry: None,
            state: None,
            config: EngineConfig::default(),
            boundaries: Vec::new(),
        }
    }

    /// Bed elevation
    pub fn bathymetry(mut self, bathymetry: Bathymetry) -> Self {
        self.bathymetry = Some(bathymetry);
        self
    }

    /// Initial state
    pub fn initial_state(mut self, state: FlowState) -> Self {
        self.state = Some(state);
        self
    }

    /// Engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Numerical parameters only
    pub fn params(mut self, params: NumericalParams) -> Self {
        self.config.params = params;
        self
    }

    /// Override one boundary edge
    pub fn boundary(mut self, triangle: usize, edge: usize, kind: BoundaryKind) -> Self {
        self.boundaries.push((triangle, edge, kind));
        self
    }

    /// Build
    pub fn build(self) -> PhysicsResult<ShallowWaterEngine<'m, M>> {
        let n = self.mesh.n_triangles();
        let mut engine = ShallowWaterEngine::new(
            self.mesh,
            self.bathymetry.unwrap_or_else(|| Bathymetry::flat(n, 0.0)),
            self.state.unwrap_or_else(|| FlowState::new(n)),
            self.config,
        )?;
        for (t, k, kind) in self.boundaries {
            engine.set_boundary(t, k, kind)?;
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_mesh::StructuredMesh;

    #[test]
    fn test_builder_defaults() {
        let mesh = StructuredMesh::new(3, 3, 1.0, 1.0).unwrap();
        let engine = EngineBuilder::new(&mesh).build().unwrap();
        assert_eq!(engine.state().len(), 18);
        assert_eq!(engine.stats().dry_cells, 18);
        assert_eq!(engine.compute_stable_dt(), engine.config().params.dt_max);
    }

    #[test]
    fn test_boundary_lookup() {
        let mesh = StructuredMesh::new(2, 2, 1.0, 1.0).unwrap();
        let engine = EngineBuilder::new(&mesh)
            .boundary(0, 0, BoundaryKind::Open)
            .build()
            .unwrap();
        assert_eq!(engine.boundary_kind(0, 0), Some(BoundaryKind::Open));
        assert_eq!(engine.boundary_kind(1, 0), None);
    }

    #[test]
    fn test_single_step_keeps_still_water() {
        let mesh = StructuredMesh::new(4, 4, 0.5, 0.5).unwrap();
        let n = mesh.n_triangles();
        let mut engine = EngineBuilder::new(&mesh)
            .initial_state(FlowState::uniform(n, 2.0))
            .build()
            .unwrap();
        let dt = engine.compute_stable_dt();
        let state = engine.step(dt).unwrap();
        assert!(state.h.iter().all(|h| (h - 2.0).abs() < 1e-12));
        assert_eq!(engine.step_count(), 1);
        assert!((engine.time() - dt).abs() < 1e-15);
    }

    #[test]
    fn test_advance_to_lands_on_end_time() {
        let mesh = StructuredMesh::new(4, 4, 0.25, 0.25).unwrap();
        let n = mesh.n_triangles();
        let mut engine = EngineBuilder::new(&mesh)
            .initial_state(FlowState::uniform(n, 0.5))
            .build()
            .unwrap();
        let steps = engine.advance_to(0.1).unwrap();
        assert!(steps > 1);
        assert!((engine.time() - 0.1).abs() < 1e-12);
    }
}
