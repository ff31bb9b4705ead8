// crates/tf_mesh/src/error.rs
//! Mesh error types
//!
//! Every construction-time violation of the mesh invariants is a
//! malformed-mesh error; see [`MeshError::is_malformed`]. File readers add
//! format and I/O failures on top.

use thiserror::Error;

/// Mesh result type
pub type MeshResult<T> = Result<T, MeshError>;

/// Mesh error enum
#[derive(Error, Debug)]
pub enum MeshError {
    /// The description contains no nodes or no triangles
    #[error("malformed mesh: {what} list is empty")]
    Empty {
        /// Which list was empty
        what: &'static str,
    },

    /// Two nodes carry the same tag
    #[error("malformed mesh: node tag {tag} is defined twice")]
    DuplicateNodeTag {
        /// Offending tag
        tag: i64,
    },

    /// Two triangles carry the same tag
    #[error("malformed mesh: triangle tag {tag} is defined twice")]
    DuplicateTriangleTag {
        /// Offending tag
        tag: i64,
    },

    /// A triangle references a node that does not exist
    #[error("malformed mesh: triangle {triangle} references unknown node {node}")]
    UnknownNode {
        /// Triangle tag
        triangle: i64,
        /// Referenced node tag
        node: i64,
    },

    /// A triangle references the same node more than once
    #[error("malformed mesh: triangle {triangle} repeats node {node}")]
    RepeatedNode {
        /// Triangle tag
        triangle: i64,
        /// Repeated node tag
        node: i64,
    },

    /// Triangle area at or below the degeneracy threshold
    #[error("malformed mesh: triangle {triangle} is degenerate (area {area:e})")]
    DegenerateTriangle {
        /// Triangle tag
        triangle: i64,
        /// Signed area found
        area: f64,
    },

    /// An edge is shared by more than two triangles
    #[error("malformed mesh: edge ({a}, {b}) is shared by more than two triangles")]
    NonManifoldEdge {
        /// First node tag
        a: i64,
        /// Second node tag
        b: i64,
    },

    /// Adjacency is not symmetric
    #[error("malformed mesh: triangle {triangle} lists {neighbor} as neighbour but not vice versa")]
    NonReciprocalNeighbor {
        /// Triangle tag
        triangle: i64,
        /// Neighbour tag
        neighbor: i64,
    },

    /// Supplied adjacency disagrees with the shared edges
    #[error("malformed mesh: triangle {triangle} edge {edge}: {details}")]
    NeighborMismatch {
        /// Triangle tag
        triangle: i64,
        /// Local edge index
        edge: usize,
        /// Description
        details: String,
    },

    /// Structured grid with invalid extent or spacing
    #[error("invalid grid: {details}")]
    InvalidGrid {
        /// Description
        details: String,
    },

    /// Mesh file syntax error
    #[error("mesh format error: {format}, line {line}: {message}")]
    Format {
        /// File format name
        format: &'static str,
        /// 1-based line number
        line: usize,
        /// Description
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Format error helper
    pub fn format(format: &'static str, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            format,
            line,
            message: message.into(),
        }
    }

    /// Whether this error reports a topology or geometry violation of the
    /// mesh description itself.
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            Self::InvalidGrid { .. } | Self::Format { .. } | Self::Io(_)
        )
    }
}
