//! Feature computer abstraction

use periodica_core::{FeatureFrame, Result};

/// Trait for computing features from a row-indexed frame
///
/// Implementations hold immutable configuration only, so one computer can
/// be shared across threads and called concurrently.
pub trait FeatureComputer: Send + Sync {
    /// Name of this feature
    fn name(&self) -> &str;

    /// Version of this feature computation (for versioning)
    fn version(&self) -> &str;

    /// Label applied to the produced column(s)
    fn output_name(&self) -> &str;

    /// Compute the feature for every row of `frame`
    ///
    /// The returned frame has the same row index as the input.
    fn transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame>;
}
