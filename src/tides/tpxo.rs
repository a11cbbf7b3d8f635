//! TPXO atlas access: source descriptors, in-memory atlas storage, and
//! resolvers.
//!
//! The atlas is held fully in memory on ascending 1D longitude/latitude
//! axes; a regional extract and a global product differ only in whether the
//! longitude axis wraps the full circle. Data access goes through the
//! [`SourceResolver`] trait so tests and embedding applications can inject
//! synthetic atlases instead of relying on ambient file-system lookups.

use serde::{Deserialize, Serialize};

use crate::error::ForcingError;
use crate::field::Field2D;

/// Provenance descriptor for a tidal atlas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TidalSource {
    /// Atlas identifier, e.g. "TPXO"
    pub name: String,
    /// Path to the atlas file
    pub path: String,
}

impl TidalSource {
    /// Create a source descriptor.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Supported atlas families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// TPXO barotropic tide atlas (global or regional extract)
    Tpxo,
}

impl SourceKind {
    /// Resolve the atlas family from a source name.
    pub fn from_name(name: &str) -> Result<Self, ForcingError> {
        if name.eq_ignore_ascii_case("TPXO") {
            Ok(SourceKind::Tpxo)
        } else {
            Err(ForcingError::UnknownSource(name.to_string()))
        }
    }
}

/// One atlas constituent: angular frequency plus the four complex fields,
/// each split into real/imaginary planes on the atlas (lat, lon) axes.
#[derive(Debug, Clone)]
pub struct AtlasConstituent {
    /// Constituent name (e.g., "M2")
    pub name: String,
    /// Angular frequency (rad/s)
    pub omega: f64,
    /// Sea-surface height, real part (m)
    pub ssh_re: Field2D,
    /// Sea-surface height, imaginary part (m)
    pub ssh_im: Field2D,
    /// Tidal potential, real part (m)
    pub pot_re: Field2D,
    /// Tidal potential, imaginary part (m)
    pub pot_im: Field2D,
    /// Eastward current, real part (m/s)
    pub u_re: Field2D,
    /// Eastward current, imaginary part (m/s)
    pub u_im: Field2D,
    /// Northward current, real part (m/s)
    pub v_re: Field2D,
    /// Northward current, imaginary part (m/s)
    pub v_im: Field2D,
}

impl AtlasConstituent {
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
}

/// In-memory tidal atlas.
///
/// Invariants checked at construction: at least two nodes per axis, strictly
/// ascending axes, and every constituent plane shaped `(lat.len(), lon.len())`.
#[derive(Debug, Clone)]
pub struct TpxoAtlas {
    lon: Vec<f64>,
    lat: Vec<f64>,
    constituents: Vec<AtlasConstituent>,
}

impl TpxoAtlas {
    /// Assemble an atlas, validating axes and plane shapes.
    pub fn new(
        lon: Vec<f64>,
        lat: Vec<f64>,
        constituents: Vec<AtlasConstituent>,
    ) -> Result<Self, ForcingError> {
        if lon.len() < 2 || lat.len() < 2 {
            return Err(ForcingError::InvalidAtlas(
                "longitude and latitude axes need at least two nodes".to_string(),
            ));
        }
        if !is_strictly_ascending(&lon) {
            return Err(ForcingError::InvalidAtlas(
                "longitude axis is not strictly ascending".to_string(),
            ));
        }
        if !is_strictly_ascending(&lat) {
            return Err(ForcingError::InvalidAtlas(
                "latitude axis is not strictly ascending".to_string(),
            ));
        }
        for con in &constituents {
            for (name, plane) in con.planes() {
                if plane.ny != lat.len() || plane.nx != lon.len() {
                    return Err(ForcingError::InvalidAtlas(format!(
                        "plane '{}' of constituent {} is {}x{}, expected {}x{}",
                        name,
                        con.name,
                        plane.ny,
                        plane.nx,
                        lat.len(),
                        lon.len()
                    )));
                }
            }
        }
        Ok(Self {
            lon,
            lat,
            constituents,
        })
    }

    /// Longitude axis (degrees, ascending).
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// Latitude axis (degrees, ascending).
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    /// Constituents in significance order.
    pub fn constituents(&self) -> &[AtlasConstituent] {
        &self.constituents
    }

    /// Number of constituents.
    pub fn ncon(&self) -> usize {
        self.constituents.len()
    }

    /// Longitude coverage as (min, max).
    pub fn lon_bounds(&self) -> (f64, f64) {
        (self.lon[0], self.lon[self.lon.len() - 1])
    }

    /// Latitude coverage as (min, max).
    pub fn lat_bounds(&self) -> (f64, f64) {
        (self.lat[0], self.lat[self.lat.len() - 1])
    }

    /// True when the longitude axis wraps the full circle.
    ///
    /// A global product omits the duplicate seam node, so the axis spans
    /// slightly less than 360 degrees; allow up to two node spacings short.
    pub fn is_global(&self) -> bool {
        let n = self.lon.len();
        let span = self.lon[n - 1] - self.lon[0];
        let spacing = span / (n - 1) as f64;
        span >= 360.0 - 2.0 * spacing
    }

    /// Load an atlas from a NetCDF file.
    #[cfg(feature = "netcdf")]
    pub fn from_file(path: &std::path::Path) -> Result<Self, ForcingError> {
        crate::io::netcdf_io::read_tpxo(path)
    }
}

fn is_strictly_ascending(axis: &[f64]) -> bool {
    axis.windows(2).all(|w| w[1] > w[0])
}

/// Resolves a source descriptor to an atlas.
pub trait SourceResolver {
    /// Open the atlas the descriptor points at.
    fn resolve(&self, source: &TidalSource) -> Result<TpxoAtlas, ForcingError>;
}

/// Resolver that opens atlas files from the file system.
#[cfg(feature = "netcdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolver;

#[cfg(feature = "netcdf")]
impl SourceResolver for FileResolver {
    fn resolve(&self, source: &TidalSource) -> Result<TpxoAtlas, ForcingError> {
        match SourceKind::from_name(&source.name)? {
            SourceKind::Tpxo => TpxoAtlas::from_file(std::path::Path::new(&source.path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(ny: usize, nx: usize, value: f64) -> Field2D {
        Field2D::from_fn(ny, nx, |_, _| value)
    }

    fn constituent(name: &str, ny: usize, nx: usize) -> AtlasConstituent {
        AtlasConstituent {
            name: name.to_string(),
            omega: 1.405189e-4,
            ssh_re: plane(ny, nx, 0.5),
            ssh_im: plane(ny, nx, 0.1),
            pot_re: plane(ny, nx, 0.05),
            pot_im: plane(ny, nx, 0.01),
            u_re: plane(ny, nx, 0.2),
            u_im: plane(ny, nx, 0.02),
            v_re: plane(ny, nx, 0.1),
            v_im: plane(ny, nx, 0.01),
        }
    }

    #[test]
    fn test_source_kind_from_name() {
        assert_eq!(SourceKind::from_name("TPXO").unwrap(), SourceKind::Tpxo);
        assert_eq!(SourceKind::from_name("tpxo").unwrap(), SourceKind::Tpxo);
        assert!(matches!(
            SourceKind::from_name("FES2014"),
            Err(ForcingError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_atlas_validation() {
        let lon = vec![0.0, 1.0, 2.0];
        let lat = vec![10.0, 11.0];

        let atlas = TpxoAtlas::new(lon.clone(), lat.clone(), vec![constituent("M2", 2, 3)]);
        assert!(atlas.is_ok());

        // Descending axis
        let bad = TpxoAtlas::new(vec![2.0, 1.0, 0.0], lat.clone(), vec![]);
        assert!(matches!(bad, Err(ForcingError::InvalidAtlas(_))));

        // Shape mismatch
        let bad = TpxoAtlas::new(lon, lat, vec![constituent("M2", 3, 2)]);
        assert!(matches!(bad, Err(ForcingError::InvalidAtlas(_))));
    }

    #[test]
    fn test_is_global() {
        let lat = vec![-80.0, 0.0, 80.0];

        // 2-degree spacing, last node at 358: wraps the circle
        let lon: Vec<f64> = (0..180).map(|i| 2.0 * i as f64).collect();
        let cons = vec![constituent("M2", 3, lon.len())];
        let atlas = TpxoAtlas::new(lon, lat.clone(), cons).unwrap();
        assert!(atlas.is_global());

        // Regional extract
        let lon: Vec<f64> = (0..57).map(|i| 228.0 + 0.25 * i as f64).collect();
        let cons = vec![constituent("M2", 3, lon.len())];
        let atlas = TpxoAtlas::new(lon, lat, cons).unwrap();
        assert!(!atlas.is_global());
    }

    #[test]
    fn test_bounds() {
        let lon: Vec<f64> = vec![228.0, 235.0, 242.0];
        let lat = vec![15.0, 25.0, 35.0];
        let cons = vec![constituent("M2", 3, 3)];
        let atlas = TpxoAtlas::new(lon, lat, cons).unwrap();
        assert_eq!(atlas.lon_bounds(), (228.0, 242.0));
        assert_eq!(atlas.lat_bounds(), (15.0, 35.0));
        assert_eq!(atlas.ncon(), 1);
    }
}
