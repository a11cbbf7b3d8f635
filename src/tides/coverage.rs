//! Geographic coverage checks.
//!
//! Two checks bracket the interpolation step:
//! - a pre-check that the grid's longitude span intersects a regional
//!   atlas's range at all, so a hopeless regrid is rejected before any work;
//! - a post-check that no NaN survived interpolation, which catches grids
//!   that nominally intersect but poke past a regional atlas's edge.
//!
//! Longitude comparisons are wraparound-aware. A naive min/max span of a
//! dateline-straddling grid would cover nearly the whole circle and falsely
//! report overlap with any regional atlas.

use log::debug;

use crate::error::ForcingError;
use crate::grid::Grid;
use crate::tides::forcing::ForcingDataset;
use crate::tides::tpxo::TpxoAtlas;

/// Check that the grid's longitude span intersects the atlas's range.
///
/// Global atlases always pass. For regional atlases the grid's
/// wraparound-aware span is intersected with the atlas bounds as intervals,
/// also shifted by ±360 degrees so that the grid's [0, 360) convention
/// matches atlases stored in either frame. Testing the span rather than the
/// cell centers keeps a grid coarser than the atlas from slipping past the
/// check when it straddles the atlas range.
pub fn check_lon_overlap(grid: &Grid, atlas: &TpxoAtlas) -> Result<(), ForcingError> {
    if atlas.is_global() {
        return Ok(());
    }

    let (data_min, data_max) = atlas.lon_bounds();
    let (grid_min, grid_max) = wrapped_span(&grid.lon.data);
    for shift in [-360.0, 0.0, 360.0] {
        if grid_min + shift <= data_max && grid_max + shift >= data_min {
            debug!(
                "grid longitude span [{:.2}, {:.2}] overlaps dataset range [{:.2}, {:.2}]",
                grid_min, grid_max, data_min, data_max
            );
            return Ok(());
        }
    }

    Err(ForcingError::NoOverlap {
        grid_min,
        grid_max,
        data_min,
        data_max,
    })
}

/// Minimal wraparound-aware longitude span of a set of values in [0, 360).
///
/// The span is the complement of the largest angular gap between sorted
/// values. When it crosses the 0/360 seam, the western end is reported
/// shifted below zero so the returned interval stays contiguous.
pub fn wrapped_span(lons: &[f64]) -> (f64, f64) {
    debug_assert!(!lons.is_empty());
    let mut sorted: Vec<f64> = lons.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mut gap_at = n - 1; // gap between last and first (across the seam)
    let mut max_gap = sorted[0] + 360.0 - sorted[n - 1];
    for k in 0..n - 1 {
        let gap = sorted[k + 1] - sorted[k];
        if gap > max_gap {
            max_gap = gap;
            gap_at = k;
        }
    }

    if gap_at == n - 1 {
        (sorted[0], sorted[n - 1])
    } else {
        (sorted[gap_at + 1] - 360.0, sorted[gap_at])
    }
}

/// Scan every output field for NaNs left by interpolation.
///
/// Applied to regional atlases only: cells near the atlas edge can
/// interpolate to NaN even when the longitude ranges nominally intersect.
pub fn scan_for_nans(ds: &ForcingDataset) -> Result<(), ForcingError> {
    for con in &ds.constituents {
        for (name, field) in con.planes() {
            let count = field.count_nans();
            if count > 0 {
                return Err(ForcingError::NanValues {
                    field: name,
                    constituent: con.name.clone(),
                    count,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field2D;
    use crate::tides::tpxo::AtlasConstituent;

    const TOL: f64 = 1e-10;

    fn regional_atlas(lon_min: f64, lon_max: f64) -> TpxoAtlas {
        let n = 29;
        let dl = (lon_max - lon_min) / (n - 1) as f64;
        let lon: Vec<f64> = (0..n).map(|i| lon_min + dl * i as f64).collect();
        let lat: Vec<f64> = (0..41).map(|j| 10.0 + 0.5 * j as f64).collect();
        let plane = |v: f64| Field2D::from_fn(lat.len(), lon.len(), |_, _| v);
        let con = AtlasConstituent {
            name: "M2".to_string(),
            omega: 1.405189e-4,
            ssh_re: plane(0.5),
            ssh_im: plane(0.1),
            pot_re: plane(0.05),
            pot_im: plane(0.01),
            u_re: plane(0.2),
            u_im: plane(0.02),
            v_re: plane(0.1),
            v_im: plane(0.01),
        };
        TpxoAtlas::new(lon, lat, vec![con]).unwrap()
    }

    #[test]
    fn test_wrapped_span_plain() {
        let (min, max) = wrapped_span(&[230.0, 235.0, 240.0]);
        assert!((min - 230.0).abs() < TOL);
        assert!((max - 240.0).abs() < TOL);
    }

    #[test]
    fn test_wrapped_span_straddles_seam() {
        // Values on both sides of 0/360: a naive min/max would report
        // [2.0, 355.0]; the wrapped span is [-5, 5].
        let (min, max) = wrapped_span(&[355.0, 358.0, 2.0, 5.0]);
        assert!((min - (-5.0)).abs() < TOL);
        assert!((max - 5.0).abs() < TOL);
    }

    #[test]
    fn test_overlap_inside() {
        let grid = Grid::new(3, 3, 300.0, 300.0, 235.0, 25.0, 0.0);
        let atlas = regional_atlas(228.0, 242.0);
        assert!(check_lon_overlap(&grid, &atlas).is_ok());
    }

    #[test]
    fn test_overlap_disjoint() {
        let grid = Grid::new(3, 3, 300.0, 300.0, 10.0, 25.0, 0.0);
        let atlas = regional_atlas(228.0, 242.0);
        let err = check_lon_overlap(&grid, &atlas).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Selected longitude range does not intersect with dataset"));
    }

    #[test]
    fn test_overlap_coarse_grid_straddling_atlas() {
        // Two cells wide, with both cell centers outside the atlas range but
        // the grid span containing it. The span intersects, so the check
        // must pass.
        let grid = Grid::new(2, 2, 6000.0, 300.0, 235.0, 25.0, 0.0);
        let atlas = regional_atlas(228.0, 242.0);

        let (grid_min, grid_max) = wrapped_span(&grid.lon.data);
        assert!(grid_min < 228.0 && grid_max > 242.0);
        for &lon in &grid.lon.data {
            assert!(!(228.0..=242.0).contains(&lon));
        }

        assert!(check_lon_overlap(&grid, &atlas).is_ok());
    }

    #[test]
    fn test_overlap_dateline_grid_against_regional() {
        // Straddles 0/360 far from the atlas; must be judged disjoint, not
        // near-global.
        let grid = Grid::new(5, 5, 1800.0, 2400.0, -10.0, 30.0, 20.0);
        let atlas = regional_atlas(228.0, 242.0);
        assert!(matches!(
            check_lon_overlap(&grid, &atlas),
            Err(ForcingError::NoOverlap { .. })
        ));
    }

    #[test]
    fn test_overlap_negative_convention_atlas() {
        // Atlas stored in -180..180; grid longitudes are in [0, 360).
        let grid = Grid::new(3, 3, 300.0, 300.0, 350.0, 25.0, 0.0);
        let atlas = regional_atlas(-20.0, 0.0);
        assert!(check_lon_overlap(&grid, &atlas).is_ok());
    }

    #[test]
    fn test_nan_scan() {
        use crate::tides::forcing::ConstituentFields;

        let clean = Field2D::zeros(2, 2);
        let mut dirty = Field2D::zeros(2, 2);
        dirty.set(1, 0, f64::NAN);

        let fields = ConstituentFields {
            name: "M2".to_string(),
            omega: 1.405189e-4,
            ssh_re: dirty,
            ssh_im: clean.clone(),
            pot_re: clean.clone(),
            pot_im: clean.clone(),
            u_re: clean.clone(),
            u_im: clean.clone(),
            v_re: clean.clone(),
            v_im: clean,
        };
        let ds = ForcingDataset {
            constituents: vec![fields],
        };

        let err = scan_for_nans(&ds).unwrap_err();
        match err {
            ForcingError::NanValues {
                field,
                constituent,
                count,
            } => {
                assert_eq!(field, "ssh_Re");
                assert_eq!(constituent, "M2");
                assert_eq!(count, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
