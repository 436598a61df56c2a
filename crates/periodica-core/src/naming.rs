//! Output column naming
//!
//! Feature computers do not relabel their own output. They hand the raw
//! frame to a [`ColumnNamer`] together with the configured output name.

use crate::error::Result;
use crate::frame::FeatureFrame;

/// Strategy for labelling the columns a feature produces
pub trait ColumnNamer: Send + Sync {
    fn rename(&self, frame: FeatureFrame, output_name: &str) -> Result<FeatureFrame>;
}

impl<F> ColumnNamer for F
where
    F: Fn(FeatureFrame, &str) -> Result<FeatureFrame> + Send + Sync,
{
    fn rename(&self, frame: FeatureFrame, output_name: &str) -> Result<FeatureFrame> {
        self(frame, output_name)
    }
}

/// Single column gets `output_name`, several get `output_name_0`, `output_name_1`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixNamer;

impl ColumnNamer for SuffixNamer {
    fn rename(&self, frame: FeatureFrame, output_name: &str) -> Result<FeatureFrame> {
        let names = match frame.columns().len() {
            1 => vec![output_name.to_string()],
            n => (0..n).map(|i| format!("{}_{}", output_name, i)).collect(),
        };
        frame.rename_columns(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RowIndex;

    fn frame_with(columns: &[&str]) -> FeatureFrame {
        columns.iter().fold(
            FeatureFrame::from_index(RowIndex::Integer(vec![0, 1])),
            |frame, name| frame.with_column(*name, vec![0.0, 1.0]).unwrap(),
        )
    }

    #[test]
    fn test_single_column_takes_output_name() {
        let renamed = SuffixNamer.rename(frame_with(&["0"]), "seasonal").unwrap();
        assert_eq!(renamed.column_names(), vec!["seasonal"]);
    }

    #[test]
    fn test_multiple_columns_are_suffixed() {
        let renamed = SuffixNamer
            .rename(frame_with(&["a", "b", "c"]), "seasonal")
            .unwrap();
        assert_eq!(
            renamed.column_names(),
            vec!["seasonal_0", "seasonal_1", "seasonal_2"]
        );
    }

    #[test]
    fn test_closure_namer() {
        let upper = |frame: FeatureFrame, name: &str| {
            let names = vec![name.to_uppercase(); frame.columns().len()];
            frame.rename_columns(names)
        };

        let renamed = upper.rename(frame_with(&["x"]), "seasonal").unwrap();
        assert_eq!(renamed.column_names(), vec!["SEASONAL"]);
    }
}
