//! NetCDF I/O for tidal atlases and forcing datasets.
//!
//! The reader loads TPXO-style atlas files (global products or regional
//! extracts) into [`TpxoAtlas`]; the writer exports a finished forcing
//! dataset following CF-1.8 conventions with NaN mapped to the standard
//! fill value.

use std::path::Path;

use chrono::Utc;

use crate::error::ForcingError;
use crate::field::Field2D;
use crate::tides::constituents::TPXO_CONSTITUENTS;
use crate::tides::forcing::TidalForcing;
use crate::tides::tpxo::{AtlasConstituent, TpxoAtlas};

/// Fill value for missing data (CF-conventions standard).
pub const FILL_VALUE_F64: f64 = 9.96920996838687e+36;

/// long_name and units attributes for each output field.
const FIELD_METADATA: [(&str, &str, &str); 8] = [
    ("ssh_Re", "Tidal elevation, real part", "m"),
    ("ssh_Im", "Tidal elevation, complex part", "m"),
    ("pot_Re", "Tidal potential, real part", "m"),
    ("pot_Im", "Tidal potential, complex part", "m"),
    ("u_Re", "Tidal velocity in x-direction, real part", "m/s"),
    ("u_Im", "Tidal velocity in x-direction, complex part", "m/s"),
    ("v_Re", "Tidal velocity in y-direction, real part", "m/s"),
    ("v_Im", "Tidal velocity in y-direction, complex part", "m/s"),
];

/// Map fill values back to NaN on read.
#[inline]
fn to_nan(v: f64) -> f64 {
    if v.is_finite() && v.abs() < 1.0e+30 {
        v
    } else {
        f64::NAN
    }
}

/// Read a coordinate variable, trying each candidate name in order.
fn read_coord(file: &netcdf::File, names: &[&str]) -> Result<Vec<f64>, ForcingError> {
    for name in names {
        if let Some(var) = file.variable(name) {
            let data: Vec<f64> = var.get_values(..)?;
            return Ok(data);
        }
    }
    Err(ForcingError::InvalidAtlas(format!(
        "missing variable: {}",
        names.join(" or ")
    )))
}

/// Read one (lat, lon) plane of a constituent-indexed 3D variable.
fn read_plane(
    file: &netcdf::File,
    names: &[&str],
    k: usize,
    ny: usize,
    nx: usize,
) -> Result<Field2D, ForcingError> {
    for name in names {
        if let Some(var) = file.variable(name) {
            let raw: Vec<f64> = var.get_values((k, .., ..))?;
            if raw.len() != ny * nx {
                return Err(ForcingError::InvalidAtlas(format!(
                    "variable '{}' slice has {} values, expected {}",
                    name,
                    raw.len(),
                    ny * nx
                )));
            }
            let data: Vec<f64> = raw.into_iter().map(to_nan).collect();
            return Ok(Field2D { data, ny, nx });
        }
    }
    Err(ForcingError::InvalidAtlas(format!(
        "missing variable: {}",
        names.join(" or ")
    )))
}

/// Load a TPXO-style atlas file.
///
/// Expects 1D `lon`/`lat` axes, an `omega` vector, and 3D field variables
/// indexed (constituent, lat, lon). Constituent names come from the TPXO
/// significance ordering by index.
pub fn read_tpxo(path: &Path) -> Result<TpxoAtlas, ForcingError> {
    let file = netcdf::open(path)?;

    let lon = read_coord(&file, &["lon", "longitude"])?;
    let lat = read_coord(&file, &["lat", "latitude"])?;
    let omega = read_coord(&file, &["omega"])?;
    let (ny, nx) = (lat.len(), lon.len());

    let mut constituents = Vec::with_capacity(omega.len());
    for (k, &om) in omega.iter().enumerate() {
        let name = TPXO_CONSTITUENTS
            .get(k)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| format!("con{k}"));

        constituents.push(AtlasConstituent {
            name,
            omega: om,
            ssh_re: read_plane(&file, &["ssh_Re", "h_Re"], k, ny, nx)?,
            ssh_im: read_plane(&file, &["ssh_Im", "h_Im"], k, ny, nx)?,
            pot_re: read_plane(&file, &["pot_Re", "sal_Re"], k, ny, nx)?,
            pot_im: read_plane(&file, &["pot_Im", "sal_Im"], k, ny, nx)?,
            u_re: read_plane(&file, &["u_Re"], k, ny, nx)?,
            u_im: read_plane(&file, &["u_Im"], k, ny, nx)?,
            v_re: read_plane(&file, &["v_Re"], k, ny, nx)?,
            v_im: read_plane(&file, &["v_Im"], k, ny, nx)?,
        });
    }

    TpxoAtlas::new(lon, lat, constituents)
}

/// Write a forcing dataset as a CF-1.8 NetCDF file.
///
/// Dimensions are `ntides`, `eta_rho`, `xi_rho`; NaN cells are stored as
/// the fill value.
pub fn write_forcing(path: &Path, forcing: &TidalForcing) -> Result<(), ForcingError> {
    let grid = &forcing.grid;
    let mut file = netcdf::create(path)?;

    file.add_dimension("ntides", forcing.ds.ntides())?;
    file.add_dimension("eta_rho", grid.ny)?;
    file.add_dimension("xi_rho", grid.nx)?;

    {
        let mut lon_var = file.add_variable::<f64>("lon_rho", &["eta_rho", "xi_rho"])?;
        lon_var.put_attribute("long_name", "longitude of rho-points")?;
        lon_var.put_attribute("units", "degrees East")?;
        lon_var.put_values(&grid.lon.data, ..)?;
    }
    {
        let mut lat_var = file.add_variable::<f64>("lat_rho", &["eta_rho", "xi_rho"])?;
        lat_var.put_attribute("long_name", "latitude of rho-points")?;
        lat_var.put_attribute("units", "degrees North")?;
        lat_var.put_values(&grid.lat.data, ..)?;
    }
    {
        let mut omega_var = file.add_variable::<f64>("omega", &["ntides"])?;
        omega_var.put_attribute("long_name", "angular frequency")?;
        omega_var.put_attribute("units", "radians per second")?;
        omega_var.put_values(&forcing.ds.omega(), ..)?;
    }

    for (name, long_name, units) in FIELD_METADATA {
        let mut var = file.add_variable::<f64>(name, &["ntides", "eta_rho", "xi_rho"])?;
        var.put_attribute("long_name", long_name)?;
        var.put_attribute("units", units)?;
        var.put_attribute("_FillValue", FILL_VALUE_F64)?;

        for (k, con) in forcing.ds.constituents.iter().enumerate() {
            let plane = con.plane(name).ok_or_else(|| {
                ForcingError::Config(format!("field '{name}' missing from dataset"))
            })?;
            let data: Vec<f64> = plane
                .data
                .iter()
                .map(|&v| if v.is_nan() { FILL_VALUE_F64 } else { v })
                .collect();
            var.put_values(&data, (k, .., ..))?;
        }
    }

    file.add_attribute("Conventions", "CF-1.8")?;
    file.add_attribute("title", "ROMS tidal forcing file")?;
    file.add_attribute("source", forcing.source.name.as_str())?;
    file.add_attribute("ntides", forcing.ntides as i64)?;

    let now = Utc::now();
    file.add_attribute(
        "history",
        format!(
            "{}: Created by roms-forcing",
            now.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .as_str(),
    )?;

    Ok(())
}
