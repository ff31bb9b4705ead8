// crates/tf_physics/src/boundary.rs

//! Boundary conditions
//!
//! A boundary edge is closed with a ghost state and handed to the same
//! Riemann solver as an interior edge. Every edge starts as a wall; the
//! engine can switch individual edges to open.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::schemes::CellValues;

// ============================================================
// Boundary kinds
// ============================================================

/// Boundary condition of one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Impermeable wall
    ///
    /// Normal velocity reflected, tangential velocity kept.
    #[default]
    Wall,

    /// Zero-gradient open boundary
    ///
    /// Ghost equals the interior state, so waves leave the domain.
    Open,
}

impl BoundaryKind {
    /// Reflective?
    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Wall)
    }
}

// ============================================================
// Ghost states
// ============================================================

/// Ghost state outside a boundary edge with outward unit normal `normal`
#[inline]
pub fn ghost_state(kind: BoundaryKind, inner: CellValues, normal: DVec2) -> CellValues {
    match kind {
        BoundaryKind::Wall => {
            let vn = inner.vel.dot(normal);
            CellValues {
                vel: inner.vel - 2.0 * vn * normal,
                ..inner
            }
        }
        BoundaryKind::Open => inner,
    }
}
