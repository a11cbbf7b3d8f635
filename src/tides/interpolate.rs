//! Bilinear regridding of constituent fields onto the model grid.
//!
//! Real and imaginary parts are interpolated independently; interpolating
//! amplitude/phase instead would wrap at ±π and leave phase artifacts.
//!
//! Longitude handling: queries are shifted into the atlas's own frame
//! before bracketing. Global atlases interpolate periodically across the
//! seam between the last and first node; regional atlases yield NaN outside
//! their footprint (never a clamped or extrapolated value), and the
//! coverage post-scan decides what that means.
//!
//! Currents are rotated from the geographic east/north frame into the
//! grid's local frame using each cell's stored rotation angle.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::field::Field2D;
use crate::grid::Grid;
use crate::tides::forcing::ConstituentFields;
use crate::tides::tpxo::{AtlasConstituent, TpxoAtlas};

/// Regrid the first `ntides` atlas constituents onto the grid.
///
/// Callers are expected to have run the constituent-count and coverage
/// checks already; this function never errors and propagates NaN silently.
/// An `ntides` beyond the atlas count is clamped to what is available.
pub fn regrid(atlas: &TpxoAtlas, grid: &Grid, ntides: usize) -> Vec<ConstituentFields> {
    let cons = &atlas.constituents()[..ntides.min(atlas.ncon())];

    #[cfg(feature = "parallel")]
    {
        cons.par_iter()
            .map(|c| regrid_constituent(atlas, c, grid))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        cons.iter()
            .map(|c| regrid_constituent(atlas, c, grid))
            .collect()
    }
}

/// Regrid a single constituent and rotate its currents into the grid frame.
fn regrid_constituent(atlas: &TpxoAtlas, con: &AtlasConstituent, grid: &Grid) -> ConstituentFields {
    let periodic = atlas.is_global();

    let sample = |plane: &Field2D, j: usize, i: usize| {
        sample_plane(
            plane,
            atlas.lat(),
            atlas.lon(),
            grid.lat.get(j, i),
            grid.lon.get(j, i),
            periodic,
        )
    };

    let ssh_re = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.ssh_re, j, i));
    let ssh_im = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.ssh_im, j, i));
    let pot_re = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.pot_re, j, i));
    let pot_im = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.pot_im, j, i));
    let mut u_re = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.u_re, j, i));
    let mut u_im = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.u_im, j, i));
    let mut v_re = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.v_re, j, i));
    let mut v_im = Field2D::from_fn(grid.ny, grid.nx, |j, i| sample(&con.v_im, j, i));

    // Rotate east/north currents into the grid frame:
    //   u_grid =  u cos(a) + v sin(a)
    //   v_grid = -u sin(a) + v cos(a)
    for j in 0..grid.ny {
        for i in 0..grid.nx {
            let (sin_a, cos_a) = grid.angle.get(j, i).sin_cos();

            let (ur, vr) = (u_re.get(j, i), v_re.get(j, i));
            u_re.set(j, i, ur * cos_a + vr * sin_a);
            v_re.set(j, i, vr * cos_a - ur * sin_a);

            let (ui, vi) = (u_im.get(j, i), v_im.get(j, i));
            u_im.set(j, i, ui * cos_a + vi * sin_a);
            v_im.set(j, i, vi * cos_a - ui * sin_a);
        }
    }

    ConstituentFields {
        name: con.name.clone(),
        omega: con.omega,
        ssh_re,
        ssh_im,
        pot_re,
        pot_im,
        u_re,
        u_im,
        v_re,
        v_im,
    }
}

/// Bilinear sample of one atlas plane at (lat_t, lon_t).
///
/// Returns NaN outside the atlas footprint or when a stencil corner is NaN
/// (masked land propagates through the arithmetic).
fn sample_plane(
    plane: &Field2D,
    lat: &[f64],
    lon: &[f64],
    lat_t: f64,
    lon_t: f64,
    periodic: bool,
) -> f64 {
    let Some((j0, j1, fy)) = bracket(lat, lat_t) else {
        return f64::NAN;
    };
    let Some((i0, i1, fx)) = lon_bracket(lon, lon_t, periodic) else {
        return f64::NAN;
    };

    let v00 = plane.get(j0, i0);
    let v01 = plane.get(j0, i1);
    let v10 = plane.get(j1, i0);
    let v11 = plane.get(j1, i1);

    let v0 = v00 * (1.0 - fx) + v01 * fx;
    let v1 = v10 * (1.0 - fx) + v11 * fx;
    v0 * (1.0 - fy) + v1 * fy
}

/// Bracket a value in an ascending axis.
///
/// Returns the bounding node indices and the interpolation fraction, or
/// None outside the axis range.
fn bracket(axis: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    let n = axis.len();
    if n < 2 || value < axis[0] || value > axis[n - 1] {
        return None;
    }
    let k = axis.partition_point(|&a| a <= value).clamp(1, n - 1);
    let (i0, i1) = (k - 1, k);
    let f = (value - axis[i0]) / (axis[i1] - axis[i0]);
    Some((i0, i1, f))
}

/// Bracket a longitude after shifting it into the atlas frame.
///
/// The query is wrapped into [first, first + 360). A periodic axis
/// interpolates across the seam cell between the last node and the first
/// node + 360; a regional axis reports None past its last node.
fn lon_bracket(lon: &[f64], lon_t: f64, periodic: bool) -> Option<(usize, usize, f64)> {
    let n = lon.len();
    if n < 2 {
        return None;
    }
    let first = lon[0];
    let last = lon[n - 1];

    let mut l = lon_t;
    while l < first {
        l += 360.0;
    }
    while l >= first + 360.0 {
        l -= 360.0;
    }

    if l <= last {
        return bracket(lon, l);
    }
    if periodic {
        let width = first + 360.0 - last;
        let f = (l - last) / width;
        return Some((n - 1, 0, f));
    }
    None
}
