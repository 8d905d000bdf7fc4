// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for lattice construction, configuration and snapshots.
//!
//! Only construction and snapshot I/O can fail. Numerical drift off the
//! group manifold is repaired silently and an odd time extent under
//! multi-worker sweeps is a logged fallback, so neither appears here.

use thiserror::Error;

/// Errors arising from geometry validation, configuration or snapshot I/O.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// Dimensionality outside `2..=4`.
    #[error("invalid number of dimensions {ndims}, expected 2, 3 or 4")]
    InvalidDimensions { ndims: usize },

    /// An active extent below 1.
    #[error("invalid extent {extent} along axis {axis}, must be at least 1")]
    InvalidExtent { axis: usize, extent: usize },

    /// Snapshot byte count does not match the field geometry.
    #[error("snapshot size mismatch: expected {expected} bytes, found {found}")]
    SnapshotSize { expected: usize, found: usize },

    /// Configuration value outside its admissible range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LatticeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_dimensions() {
        let err = LatticeError::InvalidDimensions { ndims: 5 };
        assert_eq!(
            err.to_string(),
            "invalid number of dimensions 5, expected 2, 3 or 4"
        );
    }

    #[test]
    fn display_snapshot_size() {
        let err = LatticeError::SnapshotSize {
            expected: 4096,
            found: 100,
        };
        assert!(err.to_string().contains("4096"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn io_error_converts() {
        fn open_missing() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/nonexistent/snapshot.bin")?)
        }
        let err = open_missing().unwrap_err();
        assert!(matches!(err, LatticeError::Io(_)));
    }

    #[test]
    fn error_trait_works() {
        let err = LatticeError::InvalidExtent { axis: 2, extent: 0 };
        let dyn_err: &dyn std::error::Error = &err;
        assert!(dyn_err.to_string().contains("axis 2"));
    }
}
