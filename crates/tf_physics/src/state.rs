// crates/tf_physics/src/state.rs

//! Flow state
//!
//! Structure-of-arrays storage of the conserved variables, one entry per
//! triangle. Only the engine mutates it; callers get snapshots by
//! reference or clone.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tf_mesh::MeshTopology;

use crate::error::{PhysicsError, PhysicsResult};

/// Conserved variables of one triangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellState {
    /// Water depth [m]
    pub h: f64,
    /// x momentum [m²/s]
    pub hu: f64,
    /// y momentum [m²/s]
    pub hv: f64,
}

impl CellState {
    /// Depth and velocity
    pub fn from_velocity(h: f64, vel: DVec2) -> Self {
        Self { h, hu: h * vel.x, hv: h * vel.y }
    }
}

/// Conserved variables of the whole mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// Water depth [m]
    pub h: Vec<f64>,
    /// x momentum [m²/s]
    pub hu: Vec<f64>,
    /// y momentum [m²/s]
    pub hv: Vec<f64>,
}

impl FlowState {
    /// All zeros
    pub fn new(n: usize) -> Self {
        Self {
            h: vec![0.0; n],
            hu: vec![0.0; n],
            hv: vec![0.0; n],
        }
    }

    /// Uniform depth at rest
    pub fn uniform(n: usize, h: f64) -> Self {
        Self {
            h: vec![h; n],
            hu: vec![0.0; n],
            hv: vec![0.0; n],
        }
    }

    /// From component arrays of equal length
    pub fn from_components(h: Vec<f64>, hu: Vec<f64>, hv: Vec<f64>) -> PhysicsResult<Self> {
        PhysicsError::check_len("hu", h.len(), hu.len())?;
        PhysicsError::check_len("hv", h.len(), hv.len())?;
        Ok(Self { h, hu, hv })
    }

    /// From per-cell records
    pub fn from_cells(cells: &[CellState]) -> Self {
        Self {
            h: cells.iter().map(|c| c.h).collect(),
            hu: cells.iter().map(|c| c.hu).collect(),
            hv: cells.iter().map(|c| c.hv).collect(),
        }
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.h.len()
    }

    /// No cells?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }

    /// `self = a * self + b * other`
    pub fn blend(&mut self, a: f64, other: &FlowState, b: f64) {
        for (x, y) in self.h.iter_mut().zip(&other.h) {
            *x = a * *x + b * y;
        }
        for (x, y) in self.hu.iter_mut().zip(&other.hu) {
            *x = a * *x + b * y;
        }
        for (x, y) in self.hv.iter_mut().zip(&other.hv) {
            *x = a * *x + b * y;
        }
    }

    /// Water volume `Σ h A`
    pub fn total_mass<M: MeshTopology + ?Sized>(&self, mesh: &M) -> f64 {
        self.h
            .iter()
            .enumerate()
            .map(|(i, h)| h * mesh.area(i))
            .sum()
    }

    /// First non-finite value, in triangle order
    pub fn first_non_finite(&self) -> Option<(usize, &'static str, f64)> {
        (0..self.len()).find_map(|i| {
            if !self.h[i].is_finite() {
                Some((i, "h", self.h[i]))
            } else if !self.hu[i].is_finite() {
                Some((i, "hu", self.hu[i]))
            } else if !self.hv[i].is_finite() {
                Some((i, "hv", self.hv[i]))
            } else {
                None
            }
        })
    }
}
