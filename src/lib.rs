//! Tile based binned statistics (histogram, mode, median) over raster images.
//!
//! A [StatisticsEngine] pulls every tile of a [TileSource], filters samples by
//! sampling period, region of interest and no-data, and accumulates them into a
//! band × statistic grid. The grid is computed on first request and cached until
//! [StatisticsEngine::clear].

mod backends;
mod buffer;
mod components;
mod errors;
mod indexes;
mod intersection;

#[cfg(feature = "gdal")]
pub use backends::gdal_backend;
pub use buffer::Buffer;
pub use components::*;
pub use errors::{ConfigurationError, Result, TileFormatError, TileStatsError};
pub use indexes::Indexes;
pub use intersection::Intersection;
