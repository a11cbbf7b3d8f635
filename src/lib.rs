//! # roms-forcing
//!
//! Tools for preparing tidal boundary forcing for ROMS simulations.
//!
//! The crate builds a rotated lat/lon model grid, regrids TPXO tidal
//! constituents (elevation, potential, currents) onto it with wraparound-aware
//! bilinear interpolation, validates the result, and exports it:
//! - NetCDF output following CF-1.8 conventions (`netcdf` feature)
//! - VTU files for field inspection in ParaView
//! - YAML configs that round-trip the construction parameters
//!
//! The entry point is [`TidalForcing`]; atlas access goes through the
//! [`SourceResolver`] trait so applications and tests can supply their own
//! atlas storage.

pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod io;
pub mod tides;

pub use config::{GridConfig, TidalForcingConfig};
pub use error::ForcingError;
pub use field::Field2D;
pub use grid::Grid;
pub use tides::{
    check_count, omega, AtlasConstituent, Constituent, ConstituentFields, ForcingDataset,
    SourceKind, SourceResolver, TidalForcing, TidalSource, TpxoAtlas, FIELD_NAMES,
    TPXO_CONSTITUENTS,
};

#[cfg(feature = "netcdf")]
pub use tides::FileResolver;

pub use io::{write_vtk_field, VtkError};
#[cfg(feature = "netcdf")]
pub use io::{read_tpxo, write_forcing, FILL_VALUE_F64};
