//! I/O utilities for reading and writing data files.
//!
//! This module provides:
//! - **VTK output**: Field visualization in ParaView (VTU format)
//! - **NetCDF I/O**: TPXO atlas input and CF-conventions forcing output
//!   (requires `netcdf` feature)

#[cfg(feature = "netcdf")]
pub mod netcdf_io;
pub mod vtk;

#[cfg(feature = "netcdf")]
pub use netcdf_io::{read_tpxo, write_forcing, FILL_VALUE_F64};
pub use vtk::{write_vtk_field, VtkError};
