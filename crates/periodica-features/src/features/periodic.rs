//! Periodic seasonal feature computer
//!
//! Maps every period of the index to `sin((t - start_date) / period)`, where
//! `t` is the start instant of the period.

use crate::feature::FeatureComputer;
use chrono::{Duration, NaiveDateTime};
use periodica_core::{
    duration_seconds, format_duration, normalize_period, parse_timestamp, ColumnNamer,
    FeatureError, FeatureFrame, Frequency, PeriodArg, Result, RowIndex, SuffixNamer,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Configuration for a periodic seasonal feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicFeatureConfig {
    /// Phase-zero instant, e.g. `"2020-01-01"`
    pub start_date: String,
    /// Period length, e.g. `"365 days"` or `"P1W"`
    pub period: String,
    pub amplitude: f64,
    pub output_name: String,
}

impl Default for PeriodicFeatureConfig {
    fn default() -> Self {
        Self {
            start_date: "1970-01-01".to_string(),
            period: "365 days".to_string(),
            amplitude: 1.0,
            output_name: "periodic_feature".to_string(),
        }
    }
}

/// Sinusoidal feature over a period index
///
/// `amplitude` is carried as configuration but the emitted values are plain
/// `sin(elapsed_periods)`.
pub struct PeriodicSeasonalFeature {
    start_date: NaiveDateTime,
    period: Duration,
    amplitude: f64,
    output_name: String,
    namer: Arc<dyn ColumnNamer>,
}

impl PeriodicSeasonalFeature {
    pub fn new(
        start_date: NaiveDateTime,
        period: impl Into<PeriodArg>,
        amplitude: f64,
        output_name: impl Into<String>,
    ) -> Result<Self> {
        let output_name = output_name.into();
        if output_name.trim().is_empty() {
            return Err(FeatureError::InvalidConfig(
                "output_name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            start_date,
            period: normalize_period(period)?,
            amplitude,
            output_name,
            namer: Arc::new(SuffixNamer),
        })
    }

    pub fn from_config(config: &PeriodicFeatureConfig) -> Result<Self> {
        let start_date = parse_timestamp(&config.start_date)?;
        Self::new(
            start_date,
            config.period.as_str(),
            config.amplitude,
            config.output_name.clone(),
        )
    }

    /// Use a custom naming strategy for the output columns
    pub fn with_namer(mut self, namer: Arc<dyn ColumnNamer>) -> Self {
        self.namer = namer;
        self
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    fn convert_index_to_datetime(&self, index: &RowIndex) -> Result<Vec<NaiveDateTime>> {
        let period_index = index.as_period_index()?;
        let timestamps = period_index.to_timestamp()?;
        self.check_sampling_frequency(period_index.freq())?;
        Ok(timestamps)
    }

    fn check_sampling_frequency(&self, freq: Frequency) -> Result<()> {
        let sampling = freq.nominal_duration();
        let sufficient = self
            .period
            .checked_add(&self.period)
            .map(|required| sampling >= required)
            .unwrap_or(false);

        if !sufficient {
            return Err(FeatureError::InsufficientSampling {
                sampling,
                period: self.period,
            });
        }
        Ok(())
    }

    fn compute_periodic_values(&self, timestamps: &[NaiveDateTime]) -> Vec<f64> {
        let period_seconds = duration_seconds(&self.period);
        timestamps
            .iter()
            .map(|t| {
                let elapsed = t.signed_duration_since(self.start_date);
                (duration_seconds(&elapsed) / period_seconds).sin()
            })
            .collect()
    }
}

impl fmt::Debug for PeriodicSeasonalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicSeasonalFeature")
            .field("start_date", &self.start_date)
            .field("period", &format_duration(&self.period))
            .field("amplitude", &self.amplitude)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl FeatureComputer for PeriodicSeasonalFeature {
    fn name(&self) -> &str {
        "periodic_seasonal"
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn output_name(&self) -> &str {
        &self.output_name
    }

    fn transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame> {
        let timestamps = self.convert_index_to_datetime(frame.index())?;
        let values = self.compute_periodic_values(&timestamps);

        let raw = FeatureFrame::from_index(frame.index().clone()).with_column("0", values)?;
        let output = self.namer.rename(raw, &self.output_name)?;

        debug!(
            feature = %self.name(),
            output_name = %self.output_name,
            rows = output.len(),
            period = %format_duration(&self.period),
            "Computed periodic feature"
        );

        Ok(output)
    }
}
