use crate::{
    components::stats::{kind::StatKind, moments::Moments},
    errors::{ConfigurationError, Result, TileStatsError},
};

/// `[min, max]` range split into `num_bins` equal bins.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BinRange {
    min: f64,
    max: f64,
    num_bins: usize,
}

impl BinRange {
    pub fn new(min: f64, max: f64, num_bins: usize) -> Self {
        Self { min, max, num_bins }
    }

    pub fn validate(&self, kind: StatKind) -> Result<()> {
        let span = self.max - self.min;
        if !(self.min.is_finite() && self.max.is_finite() && span.is_finite() && span > 0.) {
            Err(ConfigurationError::InvalidBinRange {
                kind,
                min: self.min,
                max: self.max,
            })?
        }
        if self.num_bins == 0 {
            Err(ConfigurationError::ZeroBins(kind))?
        }
        Ok(())
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Bin of `value`, `None` outside of `[min, max]`.
    ///
    /// `max` itself falls into the last bin.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        if self.num_bins == 0 || !(self.min..=self.max).contains(&value) {
            return None;
        }
        let position = (value - self.min) / (self.max - self.min) * self.num_bins as f64;
        Some((position.floor() as usize).min(self.num_bins - 1))
    }

    pub fn bin(&self, index: usize) -> Bin {
        let width = (self.max - self.min) / self.num_bins as f64;
        Bin {
            index,
            lower: self.min + width * index as f64,
            upper: self.min + width * (index + 1) as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub index: usize,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    range: BinRange,
    bins: Box<[u64]>,
    out_of_range: u64,
    /// Over every accepted sample, out of range ones included.
    moments: Moments,
}

impl Histogram {
    pub fn new(range: BinRange) -> Self {
        Self {
            range,
            bins: vec![0; range.num_bins].into_boxed_slice(),
            out_of_range: 0,
            moments: Moments::default(),
        }
    }

    pub fn accept(&mut self, value: f64) {
        self.moments.accept(value);
        match self.range.bin_of(value) {
            Some(index) => self.bins[index] += 1,
            None => self.out_of_range += 1,
        }
    }

    /// Fails unless both histograms share the same [BinRange].
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        if self.range != other.range {
            Err(TileStatsError::IncompatibleBins {
                lhs: self.range,
                rhs: other.range,
            })?
        }
        self.bins
            .iter_mut()
            .zip(other.bins.iter())
            .for_each(|(lhs, rhs)| *lhs += rhs);
        self.out_of_range += other.out_of_range;
        self.moments.merge(&other.moments);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.bins.fill(0);
        self.out_of_range = 0;
        self.moments = Moments::default();
    }

    pub fn range(&self) -> &BinRange {
        &self.range
    }

    pub fn counts(&self) -> &[u64] {
        &self.bins
    }

    pub fn out_of_range(&self) -> u64 {
        self.out_of_range
    }

    /// Samples that landed in a bin.
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    /// Fullest bin, lowest index on ties.
    pub fn mode(&self) -> Option<Bin> {
        let (index, count) = self
            .bins
            .iter()
            .enumerate()
            .fold((0, 0), |best, (index, count)| {
                if *count > best.1 {
                    (index, *count)
                } else {
                    best
                }
            });
        (count > 0).then(|| self.range.bin(index))
    }

    /// First bin where the cumulative count reaches half of [Histogram::total].
    pub fn median(&self) -> Option<Bin> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut cumulative = 0;
        self.bins
            .iter()
            .position(|count| {
                cumulative += count;
                2 * cumulative >= total
            })
            .map(|index| self.range.bin(index))
    }
}
