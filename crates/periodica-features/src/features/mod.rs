//! Feature computers
//!
//! Each feature computer implements the FeatureComputer trait and derives
//! one or more columns from the row index of a frame.

mod periodic;

pub use periodic::{PeriodicFeatureConfig, PeriodicSeasonalFeature};
