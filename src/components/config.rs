use crate::{
    components::{
        nodata::NoData,
        roi::RoiTest,
        stats::{BinRange, StatKind},
    },
    errors::{ConfigurationError, Result},
    Indexes,
};

/// Immutable parameters of a [crate::StatisticsEngine].
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Configuration {
    bands: Indexes,
    kinds: Box<[StatKind]>,
    ranges: Box<[BinRange]>,
    /// (x, y)
    period: (usize, usize),
    roi_test: RoiTest,
    nodata: Option<NoData>,
}

impl Configuration {
    /// One `(min_bounds[i], max_bounds[i], num_bins[i])` bin definition per `kinds[i]`.
    pub fn new(
        bands: impl Into<Indexes>,
        kinds: &[StatKind],
        min_bounds: &[f64],
        max_bounds: &[f64],
        num_bins: &[usize],
    ) -> Result<Self> {
        let lengths = [min_bounds.len(), max_bounds.len(), num_bins.len()];
        if lengths.iter().any(|len| *len != kinds.len()) {
            Err(ConfigurationError::BoundsLength {
                kinds: kinds.len(),
                min: lengths[0],
                max: lengths[1],
                bins: lengths[2],
            })?
        }
        let ranges = min_bounds
            .iter()
            .zip(max_bounds)
            .zip(num_bins)
            .map(|((min, max), num_bins)| BinRange::new(*min, *max, *num_bins))
            .collect();
        let config = Self {
            bands: bands.into(),
            kinds: Box::from(kinds),
            ranges,
            period: (1, 1),
            roi_test: RoiTest::default(),
            nodata: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_period(mut self, x_period: usize, y_period: usize) -> Result<Self> {
        self.period = (x_period, y_period);
        self.validate()?;
        Ok(self)
    }

    pub fn with_nodata(mut self, nodata: NoData) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn with_roi_test(mut self, roi_test: RoiTest) -> Self {
        self.roi_test = roi_test;
        self
    }

    /// Re-checks every invariant, also needed after deserializing.
    pub fn validate(&self) -> Result<()> {
        if self.kinds.is_empty() {
            Err(ConfigurationError::NoStatistics)?
        }
        if self.kinds.len() != self.ranges.len() {
            Err(ConfigurationError::BoundsLength {
                kinds: self.kinds.len(),
                min: self.ranges.len(),
                max: self.ranges.len(),
                bins: self.ranges.len(),
            })?
        }
        if let Some(kind) = self.kinds.iter().find(|kind| !kind.is_complex()) {
            Err(ConfigurationError::SimpleStatistic(*kind))?
        }
        for (kind, range) in self.kinds.iter().zip(self.ranges.iter()) {
            range.validate(*kind)?;
        }
        if self.period.0 == 0 || self.period.1 == 0 {
            Err(ConfigurationError::ZeroPeriod(self.period.0, self.period.1))?
        }
        self.bands.validate()
    }

    pub fn bands(&self) -> &Indexes {
        &self.bands
    }

    pub fn kinds(&self) -> &[StatKind] {
        &self.kinds
    }

    pub fn ranges(&self) -> &[BinRange] {
        &self.ranges
    }

    pub fn statistics(&self) -> impl Iterator<Item = (StatKind, BinRange)> + '_ {
        self.kinds.iter().copied().zip(self.ranges.iter().copied())
    }

    pub fn period(&self) -> (usize, usize) {
        self.period
    }

    pub fn roi_test(&self) -> RoiTest {
        self.roi_test
    }

    pub fn nodata(&self) -> Option<&NoData> {
        self.nodata.as_ref()
    }
}
