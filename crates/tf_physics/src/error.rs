// crates/tf_physics/src/error.rs

//! Physics error types
//!
//! All errors are reported synchronously by the operation that detects
//! them. The wet/dry clamp is a physical correction, not an error.

use thiserror::Error;

/// Physics result type
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Physics error enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Array length disagrees with the mesh
    #[error("dimension mismatch: {what} has {actual} entries, mesh needs {expected}")]
    DimensionMismatch {
        /// Which array
        what: &'static str,
        /// Length required by the mesh
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Non-finite value after a step
    #[error("numerical instability at t = {time}: {field} = {value} in triangle {triangle}")]
    NumericalInstability {
        /// Simulation time at the start of the failed step
        time: f64,
        /// First offending triangle
        triangle: usize,
        /// Offending variable
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Time step not positive or not finite
    #[error("invalid time step {dt}")]
    InvalidTimeStep {
        /// Requested step
        dt: f64,
    },

    /// Parameter out of range
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: String,
        /// Reason
        reason: String,
    },
}

impl PhysicsError {
    /// Dimension check helper
    pub fn check_len(what: &'static str, expected: usize, actual: usize) -> PhysicsResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { what, expected, actual })
        }
    }

    /// Out-of-range helper
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
