//! Periodica Features
//!
//! Feature computers that derive columns from period-indexed time series.

pub mod feature;
pub mod features;

pub use feature::FeatureComputer;
pub use features::*;
