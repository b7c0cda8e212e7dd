use crate::{
    components::stats::{
        histogram::{Bin, BinRange, Histogram},
        kind::StatKind,
        moments::Moments,
    },
    errors::{Result, TileStatsError},
};

#[derive(Debug, Clone, PartialEq)]
pub enum AccumulatorState {
    Scalar(Moments),
    Binned(Histogram),
}

/// Value of a single statistic.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Scalar(f64),
    Extrema { min: f64, max: f64 },
    Histogram { bins: Box<[u64]>, out_of_range: u64 },
    Bin(Option<Bin>),
}

/// Running state of one statistic for one band.
///
/// Accepting and merging commute, so samples may arrive in any order
/// and partial accumulators may be merged in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    kind: StatKind,
    state: AccumulatorState,
}

impl Accumulator {
    /// `range` is only used by complex kinds.
    pub fn new(kind: StatKind, range: BinRange) -> Self {
        let state = if kind.is_complex() {
            AccumulatorState::Binned(Histogram::new(range))
        } else {
            AccumulatorState::Scalar(Moments::default())
        };
        Self { kind, state }
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn state(&self) -> &AccumulatorState {
        &self.state
    }

    pub fn accept(&mut self, value: f64) {
        match &mut self.state {
            AccumulatorState::Scalar(moments) => moments.accept(value),
            AccumulatorState::Binned(histogram) => histogram.accept(value),
        }
    }

    pub fn accept_all(&mut self, values: &[f64]) {
        match &mut self.state {
            AccumulatorState::Scalar(moments) => {
                values.iter().for_each(|value| moments.accept(*value))
            }
            AccumulatorState::Binned(histogram) => {
                values.iter().for_each(|value| histogram.accept(*value))
            }
        }
    }

    /// Merges a partial accumulator of the same kind and range.
    pub fn merge(&mut self, other: &Accumulator) -> Result<()> {
        let mismatch = TileStatsError::IncompatibleKinds {
            lhs: self.kind,
            rhs: other.kind,
        };
        if self.kind != other.kind {
            return Err(mismatch);
        }
        match (&mut self.state, &other.state) {
            (AccumulatorState::Scalar(lhs), AccumulatorState::Scalar(rhs)) => {
                lhs.merge(rhs);
                Ok(())
            }
            (AccumulatorState::Binned(lhs), AccumulatorState::Binned(rhs)) => lhs.merge(rhs),
            _ => Err(mismatch),
        }
    }

    /// Back to identity: zero count, empty bins, extrema at infinity.
    pub fn reset(&mut self) {
        match &mut self.state {
            AccumulatorState::Scalar(moments) => *moments = Moments::default(),
            AccumulatorState::Binned(histogram) => histogram.reset(),
        }
    }

    pub fn moments(&self) -> &Moments {
        match &self.state {
            AccumulatorState::Scalar(moments) => moments,
            AccumulatorState::Binned(histogram) => histogram.moments(),
        }
    }

    pub fn histogram(&self) -> Option<&Histogram> {
        match &self.state {
            AccumulatorState::Binned(histogram) => Some(histogram),
            AccumulatorState::Scalar(_) => None,
        }
    }

    pub fn count(&self) -> u64 {
        self.moments().count()
    }

    pub fn mean(&self) -> f64 {
        self.moments().mean()
    }

    pub fn variance(&self) -> f64 {
        self.moments().variance()
    }

    pub fn std_dev(&self) -> f64 {
        self.moments().std_dev()
    }

    pub fn min(&self) -> f64 {
        self.moments().min()
    }

    pub fn max(&self) -> f64 {
        self.moments().max()
    }

    pub fn mode(&self) -> Option<Bin> {
        self.histogram().and_then(Histogram::mode)
    }

    pub fn median(&self) -> Option<Bin> {
        self.histogram().and_then(Histogram::median)
    }

    pub fn value(&self) -> StatValue {
        let moments = self.moments();
        match self.kind {
            StatKind::Mean => StatValue::Scalar(moments.mean()),
            StatKind::Sum => StatValue::Scalar(moments.sum()),
            StatKind::SumSquares => StatValue::Scalar(moments.sum_squares()),
            StatKind::Min => StatValue::Scalar(moments.min()),
            StatKind::Max => StatValue::Scalar(moments.max()),
            StatKind::Extrema => StatValue::Extrema {
                min: moments.min(),
                max: moments.max(),
            },
            StatKind::Variance => StatValue::Scalar(moments.variance()),
            StatKind::StdDev => StatValue::Scalar(moments.std_dev()),
            StatKind::Histogram => match self.histogram() {
                Some(histogram) => StatValue::Histogram {
                    bins: Box::from(histogram.counts()),
                    out_of_range: histogram.out_of_range(),
                },
                None => StatValue::Histogram {
                    bins: Box::from([]),
                    out_of_range: 0,
                },
            },
            StatKind::Mode => StatValue::Bin(self.mode()),
            StatKind::Median => StatValue::Bin(self.median()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn samples() -> Vec<f64> {
        (0..97).map(|value| ((value * 37) % 101) as f64 / 3.).collect()
    }

    #[rstest]
    #[case(StatKind::Histogram)]
    #[case(StatKind::Mode)]
    #[case(StatKind::Median)]
    #[case(StatKind::Mean)]
    #[case(StatKind::Variance)]
    #[case(StatKind::Extrema)]
    fn order_independent_batches(#[case] kind: StatKind) {
        let range = BinRange::new(0., 34., 7);
        let values = samples();

        let mut sequential = Accumulator::new(kind, range);
        sequential.accept_all(&values);

        let mut batched = Accumulator::new(kind, range);
        let mut chunks: Vec<&[f64]> = values.chunks(13).collect();
        chunks.reverse();
        chunks.swap(1, 3);
        for chunk in chunks {
            let mut partial = Accumulator::new(kind, range);
            partial.accept_all(chunk);
            batched.merge(&partial).unwrap();
        }

        assert_eq!(batched.count(), sequential.count());
        assert_eq!(
            batched.histogram().map(Histogram::counts),
            sequential.histogram().map(Histogram::counts)
        );
        assert_eq!(batched.min(), sequential.min());
        assert_eq!(batched.max(), sequential.max());
        assert!((batched.mean() - sequential.mean()).abs() < 1e-9);
        assert!((batched.variance() - sequential.variance()).abs() < 1e-9);
        assert_eq!(batched.mode(), sequential.mode());
        assert_eq!(batched.median(), sequential.median());
    }

    #[test]
    fn scalar_values() {
        let mut accumulator = Accumulator::new(StatKind::Extrema, BinRange::new(0., 1., 1));
        accumulator.accept_all(&[3., -1., 7.]);
        assert_eq!(
            accumulator.value(),
            StatValue::Extrema { min: -1., max: 7. }
        );
        assert_eq!(accumulator.histogram(), None);
        assert_eq!(accumulator.mode(), None);
    }

    #[test]
    fn binned_values() {
        let mut accumulator = Accumulator::new(StatKind::Histogram, BinRange::new(0., 4., 2));
        accumulator.accept_all(&[0., 1., 3., 4., 5.]);
        assert_eq!(
            accumulator.value(),
            StatValue::Histogram {
                bins: Box::from([2, 2]),
                out_of_range: 1
            }
        );
        assert_eq!(accumulator.count(), 5);
        assert_eq!(accumulator.max(), 5.);
    }

    #[test]
    fn merge_rejects_other_kinds() {
        let range = BinRange::new(0., 4., 2);
        let mut mode = Accumulator::new(StatKind::Mode, range);
        let mut median = Accumulator::new(StatKind::Median, range);
        median.accept(1.);
        assert!(matches!(
            mode.merge(&median),
            Err(TileStatsError::IncompatibleKinds {
                lhs: StatKind::Mode,
                rhs: StatKind::Median
            })
        ));
        assert_eq!(mode.count(), 0);

        let mut mean = Accumulator::new(StatKind::Mean, range);
        assert!(mean.merge(&median).is_err());
    }

    #[test]
    fn reset_to_identity() {
        let range = BinRange::new(0., 4., 2);
        let mut accumulator = Accumulator::new(StatKind::Median, range);
        accumulator.accept_all(&[1., 2.]);
        accumulator.reset();
        assert_eq!(accumulator, Accumulator::new(StatKind::Median, range));
        assert_eq!(accumulator.value(), StatValue::Bin(None));
        assert!(accumulator.mean().is_nan());
    }
}
