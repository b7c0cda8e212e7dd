use std::{collections::HashSet, sync::Arc};

use itertools::Itertools;

use crate::errors::{ConfigurationError, Result};

/// Band selection, either the listed bands in the given order
/// or every band but the listed ones (`drop`).
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Indexes {
    selection: Arc<[usize]>,
    drop: bool,
}

impl<const N: usize> From<([usize; N], bool)> for Indexes {
    fn from(value: ([usize; N], bool)) -> Self {
        let selection = Arc::from(value.0);
        let drop = value.1;
        Indexes { selection, drop }
    }
}

impl From<(std::ops::Range<usize>, bool)> for Indexes {
    fn from(value: (std::ops::Range<usize>, bool)) -> Self {
        let selection = value.0.collect();
        let drop = value.1;
        Indexes { selection, drop }
    }
}

impl<const N: usize> From<[usize; N]> for Indexes {
    fn from(value: [usize; N]) -> Self {
        let selection = Arc::from(value);
        Indexes {
            selection,
            drop: false,
        }
    }
}

impl From<Vec<usize>> for Indexes {
    fn from(value: Vec<usize>) -> Self {
        Indexes {
            selection: Arc::from(value),
            drop: false,
        }
    }
}

impl From<std::ops::Range<usize>> for Indexes {
    fn from(value: std::ops::Range<usize>) -> Self {
        let selection = value.collect();
        Indexes {
            selection,
            drop: false,
        }
    }
}

impl Indexes {
    /// Checks the selection itself, independent of any band count.
    pub fn validate(&self) -> Result<()> {
        if let Some(band) = self.selection.iter().duplicates().next() {
            Err(ConfigurationError::DuplicateBand(*band))?
        }
        if !self.drop && self.selection.is_empty() {
            Err(ConfigurationError::NoBands)?
        }
        Ok(())
    }

    /// Resolves the selected band indexes for a source with `band_count` bands.
    pub fn indexes_from(&self, band_count: usize) -> Result<Box<[usize]>> {
        self.validate()?;
        if let Some(band) = self.selection.iter().find(|band| **band >= band_count) {
            Err(ConfigurationError::BandOutOfRange {
                band: *band,
                count: band_count,
            })?
        }
        let idxs: Box<[usize]> = if self.drop {
            let drop_idxs: HashSet<usize> = self.selection.iter().copied().collect();
            (0..band_count)
                .filter(|idx| !drop_idxs.contains(idx))
                .collect()
        } else {
            Box::from(self.selection.as_ref())
        };
        if idxs.is_empty() {
            Err(ConfigurationError::NoBands)?
        }
        Ok(idxs)
    }

    pub fn all() -> Self {
        Self {
            selection: Arc::from([]),
            drop: true,
        }
    }
}
