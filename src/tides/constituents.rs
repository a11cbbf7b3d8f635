//! TPXO tidal constituents in significance order.
//!
//! TPXO atlases store constituents pre-sorted by decreasing significance:
//! the semidiurnal species first (M2, S2, N2, K2), then the diurnal species
//! (K1, O1, P1, Q1), then the long-period constituents (Mm, Mf). Truncating
//! a forcing dataset to `ntides` means taking the leading entries of this
//! ordering.

use crate::error::ForcingError;

/// A tidal constituent: name and angular frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constituent {
    /// Name of the constituent (e.g., "M2", "S2", "K1")
    pub name: &'static str,
    /// Angular frequency (rad/s)
    pub omega: f64,
}

/// The ten TPXO constituents, by decreasing significance.
///
/// Angular frequencies match the ROMS tidal-forcing tables.
pub const TPXO_CONSTITUENTS: [Constituent; 10] = [
    Constituent { name: "M2", omega: 1.405189e-4 },
    Constituent { name: "S2", omega: 1.454441e-4 },
    Constituent { name: "N2", omega: 1.378797e-4 },
    Constituent { name: "K2", omega: 1.458423e-4 },
    Constituent { name: "K1", omega: 7.292117e-5 },
    Constituent { name: "O1", omega: 6.759774e-5 },
    Constituent { name: "P1", omega: 7.252295e-5 },
    Constituent { name: "Q1", omega: 6.495854e-5 },
    Constituent { name: "Mm", omega: 2.639203e-6 },
    Constituent { name: "Mf", omega: 5.323414e-6 },
];

/// Angular frequency for a constituent name, or None if unknown.
///
/// Case-insensitive, so "m2" and "M2" both resolve.
pub fn omega(name: &str) -> Option<f64> {
    TPXO_CONSTITUENTS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.omega)
}

/// Verify the source holds at least `requested` constituents.
///
/// All-or-nothing: this runs before any interpolation work so an
/// over-ambitious request fails without wasted computation.
pub fn check_count(requested: usize, available: usize) -> Result<(), ForcingError> {
    if requested > available {
        Err(ForcingError::InsufficientData {
            requested,
            available,
        })
    } else {
        Ok(())
    }
}
