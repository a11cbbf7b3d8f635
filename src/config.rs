//! YAML configuration round-trip.
//!
//! A configuration file holds two YAML documents. The first is a small
//! header with the tool version; the second carries top-level `Grid` and
//! `TidalForcing` sections. Only the construction parameters are stored,
//! never field data; reading a config re-runs the full pipeline, so a
//! written-then-read forcing object reproduces the original.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::ForcingError;
use crate::grid::Grid;
use crate::tides::tpxo::TidalSource;

/// Version string written into the config header.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    roms_tools_version: String,
}

/// Grid construction parameters as they appear in the YAML `Grid` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub nx: usize,
    pub ny: usize,
    pub size_x: f64,
    pub size_y: f64,
    pub center_lon: f64,
    pub center_lat: f64,
    pub rot: f64,
}

impl GridConfig {
    /// Rebuild the grid from its stored parameters.
    pub fn build(&self) -> Grid {
        Grid::new(
            self.nx,
            self.ny,
            self.size_x,
            self.size_y,
            self.center_lon,
            self.center_lat,
            self.rot,
        )
    }
}

impl From<&Grid> for GridConfig {
    fn from(grid: &Grid) -> Self {
        Self {
            nx: grid.nx,
            ny: grid.ny,
            size_x: grid.size_x,
            size_y: grid.size_y,
            center_lon: grid.center_lon,
            center_lat: grid.center_lat,
            rot: grid.rot,
        }
    }
}

/// The YAML `TidalForcing` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidalForcingConfig {
    pub source: TidalSource,
    pub ntides: usize,
}

/// Top-level sections of the second YAML document.
///
/// Unknown sections are ignored, so configs written by a larger toolchain
/// (with surface forcing, initial conditions and so on alongside) still
/// parse.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Sections {
    #[serde(rename = "Grid", skip_serializing_if = "Option::is_none")]
    grid: Option<GridConfig>,
    #[serde(rename = "TidalForcing", skip_serializing_if = "Option::is_none")]
    tidal_forcing: Option<TidalForcingConfig>,
}

/// Write the header and sections documents to `path`.
pub fn write_yaml(
    path: &Path,
    grid: &Grid,
    source: &TidalSource,
    ntides: usize,
) -> Result<(), ForcingError> {
    let header = serde_yaml::to_string(&Header {
        roms_tools_version: TOOL_VERSION.to_string(),
    })?;
    let sections = serde_yaml::to_string(&Sections {
        grid: Some(GridConfig::from(grid)),
        tidal_forcing: Some(TidalForcingConfig {
            source: source.clone(),
            ntides,
        }),
    })?;

    fs::write(path, format!("---\n{header}---\n{sections}"))?;
    Ok(())
}

/// Read a config file back into grid and forcing parameters.
///
/// Scans every document for the sections; a missing `TidalForcing` section
/// is reported before a missing `Grid` section.
pub fn read_yaml(path: &Path) -> Result<(Grid, TidalForcingConfig), ForcingError> {
    let text = fs::read_to_string(path)?;
    parse_yaml(&text)
}

fn parse_yaml(text: &str) -> Result<(Grid, TidalForcingConfig), ForcingError> {
    let mut grid: Option<GridConfig> = None;
    let mut tidal_forcing: Option<TidalForcingConfig> = None;

    for doc in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(doc)?;
        if !value.is_mapping() {
            continue;
        }
        let sections: Sections = serde_yaml::from_value(value)?;
        grid = grid.or(sections.grid);
        tidal_forcing = tidal_forcing.or(sections.tidal_forcing);
    }

    let tidal_forcing = tidal_forcing.ok_or_else(|| {
        ForcingError::Config("No TidalForcing configuration found in the YAML file.".to_string())
    })?;
    let grid = grid.ok_or_else(|| {
        ForcingError::Config("No Grid configuration found in the YAML file.".to_string())
    })?;

    Ok((grid.build(), tidal_forcing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_documents() {
        let text = "\
---
roms_tools_version: 0.1.0
---
Grid:
  nx: 3
  ny: 3
  size_x: 1500.0
  size_y: 1500.0
  center_lon: 235.0
  center_lat: 25.0
  rot: -20.0
TidalForcing:
  source:
    name: TPXO
    path: /data/tpxo9.nc
  ntides: 10
";
        let (grid, tf) = parse_yaml(text).unwrap();
        assert_eq!(grid.nx, 3);
        assert_eq!(grid.center_lon, 235.0);
        assert_eq!(tf.ntides, 10);
        assert_eq!(tf.source.name, "TPXO");
    }

    #[test]
    fn test_missing_tidal_forcing_section() {
        let text = "\
---
roms_tools_version: 0.1.0
---
Grid:
  nx: 3
  ny: 3
  size_x: 1500.0
  size_y: 1500.0
  center_lon: 235.0
  center_lat: 25.0
  rot: -20.0
";
        let err = parse_yaml(text).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No TidalForcing configuration found in the YAML file."
        );
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let text = "\
---
roms_tools_version: 0.1.0
---
Grid:
  nx: 2
  ny: 2
  size_x: 100.0
  size_y: 100.0
  center_lon: 10.0
  center_lat: 60.0
  rot: 0.0
InitialConditions:
  ini_time: 2022-01-01
TidalForcing:
  source:
    name: TPXO
    path: atlas.nc
  ntides: 2
";
        let (_, tf) = parse_yaml(text).unwrap();
        assert_eq!(tf.ntides, 2);
    }

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let grid = Grid::new(3, 3, 1500.0, 1500.0, 235.0, 25.0, -20.0);
        let source = TidalSource::new("TPXO", "atlas.nc");
        write_yaml(&path, &grid, &source, 10).unwrap();

        let (grid2, tf) = read_yaml(&path).unwrap();
        assert_eq!(grid, grid2);
        assert_eq!(tf.source, source);
        assert_eq!(tf.ntides, 10);
    }
}
