pub mod bounds;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod nodata;
pub mod roi;
pub mod source;
pub mod stats;
pub mod tile;

pub use bounds::TileBounds;
pub use config::Configuration;
pub use engine::{StatisticsEngine, STATISTICS_PROPERTY};
pub use extractor::{SampleExtractor, SampleView, TileSamples};
pub use nodata::NoData;
pub use roi::{GeometryRoi, RasterRoi, Roi, RoiTest};
pub use source::{MemoryTileSource, TileGrid, TileIndex, TileSource};
pub use stats::{
    Accumulator, Bin, BinRange, Histogram, Moments, StatKind, StatValue, StatsGrid, StatsSnapshot,
};
pub use tile::{Encoding, Sample, Tile, TileData};
