// crates/tf_physics/src/schemes/limiter.rs

//! Slope limiters for the MUSCL reconstruction
//!
//! A limiter returns a factor `α ∈ [0, 1]` for one edge of a cell. The cell
//! gradient is scaled by the smallest factor over its edges:
//!
//! ```text
//! q_f = q_i + α ∇q · r_f
//! ```
//!
//! - [`BarthJespersen`]: `q_f` stays inside the range of the cell and all
//!   its neighbours
//! - [`Minmod`]: `q_f` stays between the cell and the neighbour across the
//!   same edge, and must move towards it
//!
//! Reference: Barth, T.J. and Jespersen, D.C. (1989). "The design and
//! application of upwind schemes on unstructured meshes". AIAA 89-0366.

use tf_config::LimiterKind;

/// Gradients smaller than this are not limited
const EPS: f64 = 1e-12;

/// Data for one edge of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterContext {
    /// Unlimited change to the edge, `∇q · r_f`
    pub delta: f64,
    /// `max(q_j) - q_i` over the cell and its neighbours, `>= 0`
    pub delta_max: f64,
    /// `min(q_j) - q_i` over the cell and its neighbours, `<= 0`
    pub delta_min: f64,
    /// `q_j - q_i` for the neighbour across this edge
    pub delta_across: Option<f64>,
}

/// Ratio of the allowed change to the requested one, clipped to `[0, 1]`
#[inline]
fn bounded_ratio(delta: f64, upper: f64, lower: f64) -> f64 {
    if delta.abs() <= EPS {
        return 1.0;
    }
    let allowed = if delta > 0.0 { upper } else { lower };
    if allowed.abs() <= EPS || allowed.signum() != delta.signum() {
        return 0.0;
    }
    (allowed / delta).min(1.0)
}

/// Edge limiter
pub trait SlopeLimiter: Send + Sync {
    /// Limiter name
    fn name(&self) -> &'static str;

    /// Factor in `[0, 1]` for one edge
    fn factor(&self, ctx: &LimiterContext) -> f64;
}

/// Barth-Jespersen limiter
#[derive(Debug, Clone, Copy, Default)]
pub struct BarthJespersen;

impl SlopeLimiter for BarthJespersen {
    fn name(&self) -> &'static str {
        "Barth-Jespersen"
    }

    fn factor(&self, ctx: &LimiterContext) -> f64 {
        bounded_ratio(ctx.delta, ctx.delta_max, ctx.delta_min)
    }
}

/// Minmod limiter
///
/// Boundary edges have no neighbour and fall back to the Barth-Jespersen
/// bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minmod;

impl SlopeLimiter for Minmod {
    fn name(&self) -> &'static str {
        "Minmod"
    }

    fn factor(&self, ctx: &LimiterContext) -> f64 {
        match ctx.delta_across {
            Some(d) => bounded_ratio(ctx.delta, d.max(0.0), d.min(0.0)),
            None => bounded_ratio(ctx.delta, ctx.delta_max, ctx.delta_min),
        }
    }
}

/// Build the configured limiter
pub fn create_limiter(kind: LimiterKind) -> Box<dyn SlopeLimiter> {
    match kind {
        LimiterKind::BarthJespersen => Box::new(BarthJespersen),
        LimiterKind::Minmod => Box::new(Minmod),
    }
}
