//! Rotated tangent-plane model grid.
//!
//! The grid is defined by cell counts, physical extents (km), a geographic
//! center, and a rotation angle. Per-cell longitude, latitude, and local
//! rotation angle are derived once at construction on a local tangent plane
//! using WGS84 radii of curvature at the center latitude.
//!
//! Longitudes are normalized to [0, 360) so that atlases in either the
//! 0-360 or the -180-180 convention can be matched against the grid; a
//! domain straddling the dateline is representable without a discontinuity
//! in the construction itself (wraparound handling is the coverage and
//! interpolation layers' job).

use std::f64::consts::PI;

use crate::field::Field2D;

/// WGS84 equatorial radius in meters
const A: f64 = 6_378_137.0;
/// WGS84 flattening
const F: f64 = 1.0 / 298.257_223_563;

/// Rectangular model grid with derived geographic cell coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Number of cells in x-direction
    pub nx: usize,
    /// Number of cells in y-direction
    pub ny: usize,
    /// Domain extent in x-direction (km)
    pub size_x: f64,
    /// Domain extent in y-direction (km)
    pub size_y: f64,
    /// Longitude of the domain center (degrees)
    pub center_lon: f64,
    /// Latitude of the domain center (degrees)
    pub center_lat: f64,
    /// Rotation of the grid x-axis from east, counterclockwise (degrees)
    pub rot: f64,
    /// Cell-center longitudes (degrees, in [0, 360))
    pub lon: Field2D,
    /// Cell-center latitudes (degrees)
    pub lat: Field2D,
    /// Local grid rotation angle at each cell (radians)
    pub angle: Field2D,
}

impl Grid {
    /// Build a grid and compute its cell-center coordinates.
    ///
    /// # Arguments
    /// * `nx`, `ny` - Cell counts
    /// * `size_x`, `size_y` - Physical extents in km
    /// * `center_lon`, `center_lat` - Domain center in degrees
    /// * `rot` - Rotation in degrees, counterclockwise from east
    pub fn new(
        nx: usize,
        ny: usize,
        size_x: f64,
        size_y: f64,
        center_lon: f64,
        center_lat: f64,
        rot: f64,
    ) -> Self {
        let lat_rad = center_lat.to_radians();
        let e2 = 2.0 * F - F * F;
        let sin2 = lat_rad.sin() * lat_rad.sin();

        // Radii of curvature in meridian and prime vertical
        let rho = A * (1.0 - e2) / (1.0 - e2 * sin2).powf(1.5);
        let nu = A / (1.0 - e2 * sin2).sqrt();

        let m_per_deg_lat = rho * PI / 180.0;
        let m_per_deg_lon = nu * lat_rad.cos() * PI / 180.0;

        let theta = rot.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();

        let dx = size_x * 1000.0 / nx as f64;
        let dy = size_y * 1000.0 / ny as f64;
        let half_x = size_x * 1000.0 / 2.0;
        let half_y = size_y * 1000.0 / 2.0;

        let mut lon = Field2D::zeros(ny, nx);
        let mut lat = Field2D::zeros(ny, nx);
        let mut angle = Field2D::zeros(ny, nx);

        for j in 0..ny {
            for i in 0..nx {
                // Cell-center offsets from the domain center, before rotation
                let xs = (i as f64 + 0.5) * dx - half_x;
                let ys = (j as f64 + 0.5) * dy - half_y;

                let xr = xs * cos_t - ys * sin_t;
                let yr = xs * sin_t + ys * cos_t;

                lon.set(j, i, normalize_lon(center_lon + xr / m_per_deg_lon));
                lat.set(j, i, center_lat + yr / m_per_deg_lat);
                angle.set(j, i, theta);
            }
        }

        Self {
            nx,
            ny,
            size_x,
            size_y,
            center_lon,
            center_lat,
            rot,
            lon,
            lat,
            angle,
        }
    }
}

/// Wrap a longitude into [0, 360).
pub fn normalize_lon(lon: f64) -> f64 {
    let mut l = lon % 360.0;
    if l < 0.0 {
        l += 360.0;
    }
    l
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_normalize_lon() {
        assert!((normalize_lon(-10.0) - 350.0).abs() < TOL);
        assert!((normalize_lon(370.0) - 10.0).abs() < TOL);
        assert!((normalize_lon(0.0)).abs() < TOL);
        assert!((normalize_lon(360.0)).abs() < TOL);
        assert!((normalize_lon(235.0) - 235.0).abs() < TOL);
    }

    #[test]
    fn test_center_cell_of_odd_grid() {
        // For odd nx/ny the middle cell center coincides with the domain center.
        let grid = Grid::new(3, 3, 300.0, 300.0, 235.0, 25.0, 0.0);
        assert!((grid.lon.get(1, 1) - 235.0).abs() < 1e-9);
        assert!((grid.lat.get(1, 1) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrotated_grid_is_axis_aligned() {
        let grid = Grid::new(4, 4, 400.0, 400.0, 10.0, 60.0, 0.0);
        // Rows share latitude, columns share longitude.
        for j in 0..4 {
            for i in 1..4 {
                assert!((grid.lat.get(j, i) - grid.lat.get(j, 0)).abs() < TOL);
            }
        }
        for i in 0..4 {
            for j in 1..4 {
                assert!((grid.lon.get(j, i) - grid.lon.get(0, i)).abs() < TOL);
            }
        }
        // Longitudes increase eastward, latitudes northward.
        assert!(grid.lon.get(0, 1) > grid.lon.get(0, 0));
        assert!(grid.lat.get(1, 0) > grid.lat.get(0, 0));
    }

    #[test]
    fn test_rotation_angle_stored_per_cell() {
        let grid = Grid::new(3, 3, 300.0, 300.0, 0.0, 45.0, -20.0);
        for &a in &grid.angle.data {
            assert!((a - (-20.0f64).to_radians()).abs() < TOL);
        }
    }

    #[test]
    fn test_dateline_straddling_grid_wraps() {
        // Centered at -10 degrees with a wide extent: cells on both sides of
        // the 0/360 seam, all normalized into [0, 360).
        let grid = Grid::new(5, 5, 1800.0, 2400.0, -10.0, 30.0, 20.0);
        let mut west_of_seam = 0;
        let mut east_of_seam = 0;
        for &l in &grid.lon.data {
            assert!((0.0..360.0).contains(&l));
            if l > 180.0 {
                west_of_seam += 1;
            } else {
                east_of_seam += 1;
            }
        }
        assert!(west_of_seam > 0);
        assert!(east_of_seam > 0);
    }

    #[test]
    fn test_grid_equality_is_deterministic() {
        let a = Grid::new(3, 3, 1500.0, 1500.0, 235.0, 25.0, -20.0);
        let b = Grid::new(3, 3, 1500.0, 1500.0, 235.0, 25.0, -20.0);
        assert_eq!(a, b);

        let c = Grid::new(3, 3, 1800.0, 1500.0, 235.0, 25.0, -20.0);
        assert_ne!(a, c);
    }
}
