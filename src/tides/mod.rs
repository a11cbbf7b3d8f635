//! Tidal forcing preparation.
//!
//! Pipeline, in construction order:
//! - [`constituents`]: constituent table and the strict count check
//! - [`tpxo`]: source descriptors, atlas storage, resolvers
//! - [`coverage`]: longitude-overlap pre-check and NaN post-scan
//! - [`interpolate`]: bilinear regridding with vector rotation
//! - [`forcing`]: the `TidalForcing` composition root

pub mod constituents;
pub mod coverage;
pub mod forcing;
pub mod interpolate;
pub mod tpxo;

pub use constituents::{check_count, omega, Constituent, TPXO_CONSTITUENTS};
pub use forcing::{ConstituentFields, ForcingDataset, TidalForcing, FIELD_NAMES};
#[cfg(feature = "netcdf")]
pub use tpxo::FileResolver;
pub use tpxo::{AtlasConstituent, SourceKind, SourceResolver, TidalSource, TpxoAtlas};
