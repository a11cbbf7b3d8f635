//! Error types for forcing preparation.
//!
//! All variants are deterministic data-validity failures raised synchronously
//! during construction or config loading; none are transient, so there is no
//! retry machinery. The pipeline fails fast in the order: constituent count,
//! longitude coverage, post-interpolation NaN scan.

use thiserror::Error;

/// Errors raised while preparing a forcing dataset.
#[derive(Debug, Error)]
pub enum ForcingError {
    /// Fewer constituents in the source dataset than requested.
    #[error(
        "The dataset contains fewer constituents than requested \
         ({available} available, {requested} requested)"
    )]
    InsufficientData { requested: usize, available: usize },

    /// Grid longitudes do not intersect the dataset's longitude range.
    #[error(
        "Selected longitude range does not intersect with dataset \
         (grid spans [{grid_min:.2}, {grid_max:.2}], dataset covers [{data_min:.2}, {data_max:.2}])"
    )]
    NoOverlap {
        grid_min: f64,
        grid_max: f64,
        data_min: f64,
        data_max: f64,
    },

    /// NaN values survived interpolation onto the grid.
    #[error("NaN values found in {count} cells of '{field}' for constituent {constituent}")]
    NanValues {
        field: &'static str,
        constituent: String,
        count: usize,
    },

    /// Malformed or incomplete YAML configuration.
    #[error("{0}")]
    Config(String),

    /// Unsupported atlas family in a source descriptor.
    #[error("Unknown source dataset: {0}")]
    UnknownSource(String),

    /// Structurally invalid atlas (non-monotonic axes, shape mismatch).
    #[error("Invalid atlas: {0}")]
    InvalidAtlas(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// VTK output error.
    #[error("VTK output error: {0}")]
    Vtk(#[from] crate::io::vtk::VtkError),

    /// NetCDF library error.
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = ForcingError::InsufficientData {
            requested: 10,
            available: 2,
        };
        assert!(err
            .to_string()
            .starts_with("The dataset contains fewer constituents than requested"));
    }

    #[test]
    fn test_no_overlap_message() {
        let err = ForcingError::NoOverlap {
            grid_min: 339.6,
            grid_max: 360.4,
            data_min: 228.0,
            data_max: 242.0,
        };
        assert!(err
            .to_string()
            .starts_with("Selected longitude range does not intersect with dataset"));
    }

    #[test]
    fn test_nan_values_message() {
        let err = ForcingError::NanValues {
            field: "ssh_Re",
            constituent: "M2".to_string(),
            count: 3,
        };
        assert!(err.to_string().starts_with("NaN values found"));
    }
}
