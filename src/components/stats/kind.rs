use std::fmt::Display;

/// Static description of a [StatKind].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDefinition {
    pub name: &'static str,
    /// Needs binned state (a histogram) rather than a scalar running aggregate.
    pub complex: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum StatKind {
    Mean,
    Sum,
    SumSquares,
    Min,
    Max,
    Extrema,
    Variance,
    StdDev,
    Histogram,
    Mode,
    Median,
}

impl StatKind {
    pub const ALL: [StatKind; 11] = [
        StatKind::Mean,
        StatKind::Sum,
        StatKind::SumSquares,
        StatKind::Min,
        StatKind::Max,
        StatKind::Extrema,
        StatKind::Variance,
        StatKind::StdDev,
        StatKind::Histogram,
        StatKind::Mode,
        StatKind::Median,
    ];

    pub const fn definition(self) -> StatDefinition {
        let (name, complex) = match self {
            StatKind::Mean => ("mean", false),
            StatKind::Sum => ("sum", false),
            StatKind::SumSquares => ("sum_squares", false),
            StatKind::Min => ("min", false),
            StatKind::Max => ("max", false),
            StatKind::Extrema => ("extrema", false),
            StatKind::Variance => ("variance", false),
            StatKind::StdDev => ("std_dev", false),
            StatKind::Histogram => ("histogram", true),
            StatKind::Mode => ("mode", true),
            StatKind::Median => ("median", true),
        };
        StatDefinition { name, complex }
    }

    pub const fn is_complex(self) -> bool {
        self.definition().complex
    }

    pub const fn name(self) -> &'static str {
        self.definition().name
    }
}

impl Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_binned_kinds_are_complex() {
        let complex: Vec<StatKind> = StatKind::ALL
            .into_iter()
            .filter(|kind| kind.is_complex())
            .collect();
        assert_eq!(
            complex,
            vec![StatKind::Histogram, StatKind::Mode, StatKind::Median]
        );
    }
}
