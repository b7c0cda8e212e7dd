/// Sample values excluded from every statistic.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum NoData {
    Range {
        min: f64,
        max: f64,
        min_included: bool,
        max_included: bool,
    },
    Values(Box<[f64]>),
}

impl NoData {
    pub fn value(value: f64) -> Self {
        Self::range(value, value)
    }

    /// Inclusive on both ends.
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range {
            min,
            max,
            min_included: true,
            max_included: true,
        }
    }

    pub fn values(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Values(values.into_iter().collect())
    }

    pub fn contains(&self, value: f64) -> bool {
        match self {
            NoData::Range {
                min,
                max,
                min_included,
                max_included,
            } => {
                let above = if *min_included {
                    value >= *min
                } else {
                    value > *min
                };
                let below = if *max_included {
                    value <= *max
                } else {
                    value < *max
                };
                above & below
            }
            NoData::Values(values) => values.contains(&value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NoData::value(0.), 0., true)]
    #[case(NoData::value(0.), 1., false)]
    #[case(NoData::range(-5., 5.), 5., true)]
    #[case(NoData::Range { min: -5., max: 5., min_included: false, max_included: false }, 5., false)]
    #[case(NoData::Range { min: -5., max: 5., min_included: false, max_included: true }, -5., false)]
    #[case(NoData::values([1., 255.]), 255., true)]
    #[case(NoData::values([1., 255.]), 2., false)]
    fn contains(#[case] nodata: NoData, #[case] value: f64, #[case] expected: bool) {
        assert_eq!(nodata.contains(value), expected);
    }
}
