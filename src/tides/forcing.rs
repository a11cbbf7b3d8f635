//! Tidal forcing composition root.
//!
//! `TidalForcing` orchestrates the pipeline: constituent-count check,
//! longitude-coverage pre-check, bilinear regridding with vector rotation,
//! and (for regional atlases) the NaN post-scan. The result is frozen as a
//! multi-variable dataset; the object is immutable after construction and
//! supports export (NetCDF save, VTK plot, YAML config) but no in-place
//! mutation.

use std::path::Path;

use log::info;

use crate::config;
use crate::error::ForcingError;
use crate::field::Field2D;
use crate::grid::Grid;
use crate::tides::tpxo::{SourceResolver, TidalSource, TpxoAtlas};
use crate::tides::{constituents, coverage, interpolate};

/// Output variable names, each indexed by constituent and grid cell.
pub const FIELD_NAMES: [&str; 8] = [
    "ssh_Re", "ssh_Im", "pot_Re", "pot_Im", "u_Re", "u_Im", "v_Re", "v_Im",
];

/// Regridded fields of one constituent on the model grid.
///
/// Currents are already rotated into the grid's local frame.
#[derive(Debug, Clone)]
pub struct ConstituentFields {
    /// Constituent name (e.g., "M2")
    pub name: String,
    /// Angular frequency (rad/s)
    pub omega: f64,
    pub ssh_re: Field2D,
    pub ssh_im: Field2D,
    pub pot_re: Field2D,
    pub pot_im: Field2D,
    pub u_re: Field2D,
    pub u_im: Field2D,
    pub v_re: Field2D,
    pub v_im: Field2D,
}

impl ConstituentFields {
    /// All eight planes paired with their output variable names.
    pub fn planes(&self) -> [(&'static str, &Field2D); 8] {
        [
            ("ssh_Re", &self.ssh_re),
            ("ssh_Im", &self.ssh_im),
            ("pot_Re", &self.pot_re),
            ("pot_Im", &self.pot_im),
            ("u_Re", &self.u_re),
            ("u_Im", &self.u_im),
            ("v_Re", &self.v_re),
            ("v_Im", &self.v_im),
        ]
    }

    /// Look up one plane by its output variable name.
    pub fn plane(&self, varname: &str) -> Option<&Field2D> {
        self.planes()
            .into_iter()
            .find(|(name, _)| *name == varname)
            .map(|(_, field)| field)
    }

    fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.name == other.name
            && (self.omega - other.omega).abs() <= tol
            && self
                .planes()
                .into_iter()
                .zip(other.planes())
                .all(|((_, a), (_, b))| a.approx_eq(b, tol))
    }
}

/// The frozen multi-variable forcing dataset.
#[derive(Debug, Clone)]
pub struct ForcingDataset {
    /// Per-constituent fields, in significance order.
    pub constituents: Vec<ConstituentFields>,
}

impl ForcingDataset {
    /// Number of constituents in the dataset.
    pub fn ntides(&self) -> usize {
        self.constituents.len()
    }

    /// Whether the dataset carries the named variable.
    pub fn contains(&self, varname: &str) -> bool {
        varname == "omega" || FIELD_NAMES.contains(&varname)
    }

    /// Angular frequencies, one per constituent.
    pub fn omega(&self) -> Vec<f64> {
        self.constituents.iter().map(|c| c.omega).collect()
    }

    /// One field of one constituent, or None for unknown names/indices.
    pub fn field(&self, varname: &str, icon: usize) -> Option<&Field2D> {
        self.constituents.get(icon)?.plane(varname)
    }

    /// Compare field content within an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.constituents.len() == other.constituents.len()
            && self
                .constituents
                .iter()
                .zip(&other.constituents)
                .all(|(a, b)| a.approx_eq(b, tol))
    }
}

/// Tolerance for field comparison in `PartialEq`. A config round-trip
/// re-runs the same pipeline from the same inputs, so any difference past
/// float formatting indicates a real mismatch.
const FIELD_EQ_TOL: f64 = 1e-10;

/// Tidal boundary forcing on a model grid.
///
/// Constructed once from `(grid, source, ntides)` plus an atlas; immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct TidalForcing {
    /// The model grid the fields live on
    pub grid: Grid,
    /// Provenance of the atlas data
    pub source: TidalSource,
    /// Number of constituents kept
    pub ntides: usize,
    /// The regridded, validated dataset
    pub ds: ForcingDataset,
}

impl TidalForcing {
    /// Build a forcing dataset from an already-loaded atlas.
    ///
    /// Validation order: constituent count, longitude coverage,
    /// interpolation, NaN scan (regional atlases only).
    pub fn from_atlas(
        grid: &Grid,
        source: TidalSource,
        ntides: usize,
        atlas: &TpxoAtlas,
    ) -> Result<Self, ForcingError> {
        constituents::check_count(ntides, atlas.ncon())?;
        coverage::check_lon_overlap(grid, atlas)?;

        info!(
            "regridding {} constituents from {} onto a {}x{} grid",
            ntides, source.name, grid.nx, grid.ny
        );
        let fields = interpolate::regrid(atlas, grid, ntides);
        let ds = ForcingDataset {
            constituents: fields,
        };

        if !atlas.is_global() {
            coverage::scan_for_nans(&ds)?;
        }

        Ok(Self {
            grid: grid.clone(),
            source,
            ntides,
            ds,
        })
    }

    /// Build a forcing dataset, resolving the source through `resolver`.
    pub fn with_resolver(
        grid: &Grid,
        source: TidalSource,
        ntides: usize,
        resolver: &dyn SourceResolver,
    ) -> Result<Self, ForcingError> {
        let atlas = resolver.resolve(&source)?;
        Self::from_atlas(grid, source, ntides, &atlas)
    }

    /// Build a forcing dataset, loading the atlas from `source.path`.
    #[cfg(feature = "netcdf")]
    pub fn new(grid: &Grid, source: TidalSource, ntides: usize) -> Result<Self, ForcingError> {
        Self::with_resolver(grid, source, ntides, &crate::tides::tpxo::FileResolver)
    }

    /// Write one field of one constituent as a VTK file for inspection.
    pub fn plot(&self, varname: &str, icon: usize, path: &Path) -> Result<(), ForcingError> {
        let field = self.ds.field(varname, icon).ok_or_else(|| {
            ForcingError::Config(format!(
                "No field '{varname}' (constituent index {icon}) in the dataset"
            ))
        })?;
        crate::io::vtk::write_vtk_field(path, &self.grid, varname, field)?;
        Ok(())
    }

    /// Write the dataset to a NetCDF file.
    #[cfg(feature = "netcdf")]
    pub fn save(&self, path: &Path) -> Result<(), ForcingError> {
        crate::io::netcdf_io::write_forcing(path, self)
    }

    /// Write the configuration (grid, source, ntides) as a YAML document.
    pub fn to_yaml(&self, path: &Path) -> Result<(), ForcingError> {
        config::write_yaml(path, &self.grid, &self.source, self.ntides)
    }

    /// Rebuild a forcing dataset from a YAML config, resolving the source
    /// through `resolver`.
    ///
    /// Fails with a config error when the document lacks a `TidalForcing`
    /// section.
    pub fn from_yaml_with(
        path: &Path,
        resolver: &dyn SourceResolver,
    ) -> Result<Self, ForcingError> {
        let (grid, tf) = config::read_yaml(path)?;
        Self::with_resolver(&grid, tf.source, tf.ntides, resolver)
    }

    /// Rebuild a forcing dataset from a YAML config, loading the atlas from
    /// the file system.
    #[cfg(feature = "netcdf")]
    pub fn from_yaml(path: &Path) -> Result<Self, ForcingError> {
        Self::from_yaml_with(path, &crate::tides::tpxo::FileResolver)
    }
}

impl PartialEq for TidalForcing {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.source == other.source
            && self.ntides == other.ntides
            && self.ds.approx_eq(&other.ds, FIELD_EQ_TOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(value: f64) -> ForcingDataset {
        let plane = |v: f64| Field2D::from_fn(2, 2, |_, _| v);
        ForcingDataset {
            constituents: vec![ConstituentFields {
                name: "M2".to_string(),
                omega: 1.405189e-4,
                ssh_re: plane(value),
                ssh_im: plane(0.1),
                pot_re: plane(0.05),
                pot_im: plane(0.01),
                u_re: plane(0.2),
                u_im: plane(0.02),
                v_re: plane(0.1),
                v_im: plane(0.01),
            }],
        }
    }

    #[test]
    fn test_contains_variable_names() {
        let ds = dataset(0.5);
        assert!(ds.contains("omega"));
        for name in FIELD_NAMES {
            assert!(ds.contains(name));
        }
        assert!(!ds.contains("zeta"));
    }

    #[test]
    fn test_field_lookup() {
        let ds = dataset(0.5);
        let f = ds.field("ssh_Re", 0).unwrap();
        assert_eq!(f.get(0, 0), 0.5);
        assert!(ds.field("ssh_Re", 1).is_none());
        assert!(ds.field("bogus", 0).is_none());
    }

    #[test]
    fn test_dataset_approx_eq() {
        let a = dataset(0.5);
        let b = dataset(0.5 + 1e-12);
        let c = dataset(0.6);
        assert!(a.approx_eq(&b, 1e-10));
        assert!(!a.approx_eq(&c, 1e-10));
    }

    #[test]
    fn test_omega_accessor() {
        let ds = dataset(0.5);
        let omega = ds.omega();
        assert_eq!(omega.len(), 1);
        assert!((omega[0] - 1.405189e-4).abs() < 1e-15);
    }
}
