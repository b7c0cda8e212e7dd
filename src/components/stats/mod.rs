pub mod accumulator;
pub mod grid;
pub mod histogram;
pub mod kind;
pub mod moments;

pub use accumulator::{Accumulator, AccumulatorState, StatValue};
pub use grid::{StatsGrid, StatsSnapshot};
pub use histogram::{Bin, BinRange, Histogram};
pub use kind::{StatDefinition, StatKind};
pub use moments::Moments;
