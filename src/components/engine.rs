use std::{fmt::Debug, sync::Arc};

use log::{debug, info};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::{
    components::{
        config::Configuration,
        extractor::SampleExtractor,
        roi::Roi,
        source::TileSource,
        stats::{StatsGrid, StatsSnapshot},
        tile::Tile,
    },
    errors::Result,
};

/// Name of the property holding the [StatsSnapshot].
pub const STATISTICS_PROPERTY: &str = "statistics";

/// Lazily computed binned statistics over every tile of a [TileSource].
///
/// The first call to [StatisticsEngine::statistics] reads every tile on the
/// rayon pool and caches the result, later calls only copy the grid.
/// [StatisticsEngine::clear] drops the cache.
pub struct StatisticsEngine<S: TileSource> {
    source: S,
    config: Configuration,
    roi: Option<Arc<dyn Roi>>,
    bands: Box<[usize]>,
    grid: StatsGrid,
    /// Held across check, pass and snapshot, and across resets.
    computed: Mutex<bool>,
}

impl<S: TileSource> Debug for StatisticsEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticsEngine")
            .field("bounds", &self.source.bounds())
            .field("tile_grid", &self.source.tile_grid().shape())
            .field("grid", &self.grid)
            .field("period", &self.config.period())
            .field("roi", &self.roi)
            .field("nodata", &self.config.nodata())
            .finish()
    }
}

impl<S: TileSource> StatisticsEngine<S> {
    pub fn new(source: S, config: Configuration, roi: Option<Arc<dyn Roi>>) -> Result<Self> {
        config.validate()?;
        let bands = config.bands().indexes_from(source.band_count())?;
        let grid = StatsGrid::new(bands.clone(), &config);
        let engine = Self {
            source,
            config,
            roi,
            bands,
            grid,
            computed: Mutex::new(false),
        };
        info!("new {engine:?}");
        Ok(engine)
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolved image band indexes, in grid order.
    pub fn bands(&self) -> &[usize] {
        &self.bands
    }

    pub fn is_computed(&self) -> bool {
        *self.computed.lock()
    }

    /// Statistics of the whole image, computed on first request.
    ///
    /// A failed pass leaves already merged tiles in the grid,
    /// call [StatisticsEngine::clear] before retrying.
    pub fn statistics(&self) -> Result<StatsSnapshot> {
        let mut computed = self.computed.lock();
        if !*computed {
            self.compute()?;
            *computed = true;
        }
        Ok(self.grid.snapshot())
    }

    /// Named properties, only [STATISTICS_PROPERTY] is known.
    pub fn property(&self, name: &str) -> Result<Option<StatsSnapshot>> {
        match name {
            STATISTICS_PROPERTY => self.statistics().map(Some),
            _ => Ok(None),
        }
    }

    pub fn property_names(&self) -> &'static [&'static str] {
        &[STATISTICS_PROPERTY]
    }

    /// Resets every accumulator and marks the statistics as not computed.
    pub fn clear(&self) {
        let mut computed = self.computed.lock();
        self.grid.reset();
        *computed = false;
        info!("cleared statistics");
    }

    /// Merges one tile into the live grid, leaving the computed flag untouched.
    ///
    /// Safe to call concurrently for disjoint tiles.
    pub fn merge_tile(&self, tile: &Tile) -> Result<()> {
        let extractor = SampleExtractor::new(&self.config, &self.bands, self.roi.as_deref())
            .with_tile_shape(self.source.tile_grid().tile_shape());
        match extractor.extract(tile)? {
            Some(samples) => self.grid.accept(&samples),
            None => debug!("{:?} contributed no samples", tile.bounds()),
        }
        Ok(())
    }

    fn compute(&self) -> Result<()> {
        let indexes = self.source.tile_indexes();
        info!("computing statistics over {} tiles", indexes.len());
        indexes.into_par_iter().try_for_each(|index| {
            let tile = self.source.tile(index)?;
            self.merge_tile(&tile)
        })?;
        info!("statistics computed");
        Ok(())
    }
}
