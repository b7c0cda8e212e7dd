use std::fmt::Debug;

use parking_lot::Mutex;

use crate::components::{
    config::Configuration,
    extractor::TileSamples,
    stats::{
        accumulator::{Accumulator, StatValue},
        histogram::{Bin, Histogram},
        kind::StatKind,
    },
};

/// Band × statistic table of accumulators, fixed at construction.
///
/// Every cell has its own lock, so tiles touching different cells never wait
/// on each other.
pub struct StatsGrid {
    bands: Box<[usize]>,
    kinds: Box<[StatKind]>,
    // Row-major (band slot, kind)
    cells: Box<[Mutex<Accumulator>]>,
}

impl Debug for StatsGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.kinds.iter().map(|kind| kind.name()).collect();
        f.debug_struct("StatsGrid")
            .field("bands", &self.bands)
            .field("kinds", &kinds)
            .finish()
    }
}

impl StatsGrid {
    pub fn new(bands: Box<[usize]>, config: &Configuration) -> Self {
        let cells = bands
            .iter()
            .flat_map(|_| config.statistics())
            .map(|(kind, range)| Mutex::new(Accumulator::new(kind, range)))
            .collect();
        Self {
            bands,
            kinds: Box::from(config.kinds()),
            cells,
        }
    }

    pub fn bands(&self) -> &[usize] {
        &self.bands
    }

    pub fn kinds(&self) -> &[StatKind] {
        &self.kinds
    }

    fn slot_cells(&self, slot: usize) -> &[Mutex<Accumulator>] {
        let width = self.kinds.len();
        &self.cells[slot * width..(slot + 1) * width]
    }

    /// Feeds the samples of the band at `slot`, one lock per cell.
    pub fn accept_band(&self, slot: usize, values: &[f64]) {
        if values.is_empty() {
            return;
        }
        self.slot_cells(slot)
            .iter()
            .for_each(|cell| cell.lock().accept_all(values));
    }

    pub fn accept(&self, samples: &TileSamples) {
        samples
            .bands()
            .for_each(|(slot, values)| self.accept_band(slot, values));
    }

    pub fn reset(&self) {
        self.cells.iter().for_each(|cell| cell.lock().reset());
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bands: self.bands.clone(),
            kinds: self.kinds.clone(),
            cells: self.cells.iter().map(|cell| cell.lock().clone()).collect(),
        }
    }
}

/// Copy of a [StatsGrid], addressed by image band index and [StatKind].
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    bands: Box<[usize]>,
    kinds: Box<[StatKind]>,
    cells: Box<[Accumulator]>,
}

impl StatsSnapshot {
    pub fn bands(&self) -> &[usize] {
        &self.bands
    }

    pub fn kinds(&self) -> &[StatKind] {
        &self.kinds
    }

    pub fn get(&self, band: usize, kind: StatKind) -> Option<&Accumulator> {
        let slot = self.bands.iter().position(|selected| *selected == band)?;
        let kind_idx = self.kinds.iter().position(|selected| *selected == kind)?;
        self.cells.get(slot * self.kinds.len() + kind_idx)
    }

    /// Every cell as `(band, kind, accumulator)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, StatKind, &Accumulator)> {
        let width = self.kinds.len();
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.bands[idx / width], self.kinds[idx % width], cell))
    }

    pub fn value(&self, band: usize, kind: StatKind) -> Option<StatValue> {
        self.get(band, kind).map(Accumulator::value)
    }

    pub fn count(&self, band: usize, kind: StatKind) -> Option<u64> {
        self.get(band, kind).map(Accumulator::count)
    }

    pub fn mean(&self, band: usize, kind: StatKind) -> Option<f64> {
        self.get(band, kind).map(Accumulator::mean)
    }

    pub fn variance(&self, band: usize, kind: StatKind) -> Option<f64> {
        self.get(band, kind).map(Accumulator::variance)
    }

    pub fn std_dev(&self, band: usize, kind: StatKind) -> Option<f64> {
        self.get(band, kind).map(Accumulator::std_dev)
    }

    pub fn min(&self, band: usize, kind: StatKind) -> Option<f64> {
        self.get(band, kind).map(Accumulator::min)
    }

    pub fn max(&self, band: usize, kind: StatKind) -> Option<f64> {
        self.get(band, kind).map(Accumulator::max)
    }

    pub fn histogram(&self, band: usize, kind: StatKind) -> Option<&Histogram> {
        self.get(band, kind).and_then(Accumulator::histogram)
    }

    pub fn mode(&self, band: usize) -> Option<Bin> {
        self.get(band, StatKind::Mode).and_then(Accumulator::mode)
    }

    pub fn median(&self, band: usize) -> Option<Bin> {
        self.get(band, StatKind::Median).and_then(Accumulator::median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> StatsGrid {
        let config = Configuration::new(
            [3, 1],
            &[StatKind::Histogram, StatKind::Median],
            &[0., 0.],
            &[10., 10.],
            &[2, 5],
        )
        .unwrap();
        StatsGrid::new(Box::from([3, 1]), &config)
    }

    #[test]
    fn cells_per_band_and_kind() {
        let grid = grid();
        grid.accept_band(0, &[1., 2., 3.]);
        grid.accept_band(1, &[9.]);
        let snapshot = grid.snapshot();

        assert_eq!(snapshot.iter().count(), 4);
        assert_eq!(snapshot.count(3, StatKind::Histogram), Some(3));
        assert_eq!(snapshot.count(3, StatKind::Median), Some(3));
        assert_eq!(snapshot.count(1, StatKind::Histogram), Some(1));
        assert_eq!(
            snapshot.histogram(3, StatKind::Histogram).map(Histogram::counts),
            Some(&[3u64, 0][..])
        );
        assert_eq!(snapshot.median(3).map(|bin| bin.index), Some(1));
        assert_eq!(snapshot.median(1).map(|bin| bin.index), Some(4));
        assert_eq!(snapshot.mode(3), None);
        assert_eq!(snapshot.get(0, StatKind::Histogram), None);
        assert_eq!(snapshot.get(3, StatKind::Mode), None);
    }

    #[test]
    fn reset_keeps_layout() {
        let grid = grid();
        grid.accept_band(0, &[1.]);
        grid.reset();
        let snapshot = grid.snapshot();
        assert!(snapshot.iter().all(|(_, _, cell)| cell.count() == 0));
        assert_eq!(snapshot.bands(), &[3, 1]);
    }
}
