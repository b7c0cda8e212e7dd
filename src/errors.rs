use crate::components::{BinRange, StatKind, TileIndex};

pub type Result<T> = std::result::Result<T, TileStatsError>;

#[derive(thiserror::Error, Debug)]
pub enum TileStatsError {
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error(transparent)]
    TileFormatError(#[from] TileFormatError),
    #[cfg(feature = "gdal")]
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error("Tile {0:?} is outside of the tile grid")]
    TileIndexOutOfRange(TileIndex),
    #[error("There is no intersection between bounds")]
    NoIntersection,
    #[error("Can not merge a {rhs} accumulator into a {lhs} accumulator")]
    IncompatibleKinds { lhs: StatKind, rhs: StatKind },
    #[error("Can not merge histograms binned by {rhs:?} into {lhs:?}")]
    IncompatibleBins { lhs: BinRange, rhs: BinRange },
}

/// Invalid construction parameters, always reported before any tile is read.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("No statistic kinds requested")]
    NoStatistics,
    #[error("Statistic {0} is not binned and can not be computed by this engine")]
    SimpleStatistic(StatKind),
    #[error("Expected {kinds} bin definitions, got {min} minimum bounds, {max} maximum bounds and {bins} bin counts")]
    BoundsLength {
        kinds: usize,
        min: usize,
        max: usize,
        bins: usize,
    },
    #[error("Bin range [{min}, {max}] of {kind} is empty or not finite")]
    InvalidBinRange { kind: StatKind, min: f64, max: f64 },
    #[error("Statistic {0} needs at least one bin")]
    ZeroBins(StatKind),
    #[error("Sampling periods must be at least 1, got ({0}, {1})")]
    ZeroPeriod(usize, usize),
    #[error("No bands selected")]
    NoBands,
    #[error("Band {0} selected more than once")]
    DuplicateBand(usize),
    #[error("Band {band} selected but the source has {count} bands")]
    BandOutOfRange { band: usize, count: usize },
}

/// Tile geometry or band layout inconsistent with the configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TileFormatError {
    #[error("Buffer of shape {shape:?} needs {expected} samples, got {actual}")]
    BufferLength {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("Tile bounds of shape {bounds:?} (width, height) do not match buffer shape {buffer:?} (width, height)")]
    ShapeMismatch {
        bounds: (usize, usize),
        buffer: (usize, usize),
    },
    #[error("Band {band} selected but the tile has {count} bands")]
    MissingBand { band: usize, count: usize },
    #[error("Roi mask of shape {mask:?} does not match tile shape {tile:?}")]
    RoiMaskShape {
        mask: (usize, usize),
        tile: (usize, usize),
    },
    #[error("Sample encoding {0} is not supported")]
    UnsupportedEncoding(String),
}
