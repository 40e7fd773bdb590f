//! Error types for mesh loading and measurement.

use thiserror::Error;

/// Errors that can occur while reading or measuring a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh input could not be read or decoded.
    ///
    /// Covers missing files, truncated binary records and malformed ASCII
    /// facets alike.
    #[error("failed to parse mesh from {origin}: {source}")]
    Parse {
        /// Where the bytes came from (a path, or `<memory>`).
        origin: String,
        /// Underlying reader failure.
        source: std::io::Error,
    },

    /// Writing STL output failed.
    #[error("failed to encode STL: {0}")]
    Encode(#[source] std::io::Error),

    /// Index or coordinate arrays do not describe whole triangles.
    #[error("mesh is malformed: {0}")]
    Malformed(String),

    /// The mesh bounds no measurable volume.
    #[error("mesh is degenerate: {0}")]
    Degenerate(String),
}

impl MeshError {
    /// Whether this error only warrants a warning with a zero-volume fallback.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, MeshError::Degenerate(_))
    }
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
