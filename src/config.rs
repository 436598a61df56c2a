//! Application configuration

use periodica_core::{ConfigError, FeatureError, Frequency, Period, PeriodIndex};
use periodica_features::PeriodicFeatureConfig;
use periodica_observability::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file paths
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_ENV_VAR: &str = "PERIODICA_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub feature: PeriodicFeatureConfig,
    pub index: IndexConfig,
}

/// Logging overrides; unset fields fall back to `LOG_FORMAT` / `LOG_LEVEL`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: Option<LogFormat>,
    pub level: Option<String>,
}

/// Period index to generate for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Frequency alias, e.g. `M`, `Q`, `7D`
    pub freq: String,
    /// Label of the first period, e.g. `2020-01`
    pub start: String,
    /// Number of periods
    pub periods: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            freq: "M".to_string(),
            start: "2020-01".to_string(),
            periods: 6,
        }
    }
}

impl IndexConfig {
    pub fn build(&self) -> Result<PeriodIndex, ConfigError> {
        let freq: Frequency = self
            .freq
            .parse()
            .map_err(|e: FeatureError| invalid("index.freq", e))?;
        let start = Period::parse(&self.start, freq).map_err(|e| invalid("index.start", e))?;
        PeriodIndex::range(start, self.periods).map_err(|e| invalid("index.periods", e))
    }
}

fn invalid(field: &str, err: FeatureError) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Load configuration
///
/// An explicit path (argument, then `PERIODICA_CONFIG`) must exist. Without
/// one, `config/default.toml` is used when present, else built-in defaults.
/// Returns the path the configuration was read from, if any.
pub fn load_config(path: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            let config = read_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                let config = read_config(&default_path)?;
                Ok((config, Some(default_path)))
            } else {
                Ok((AppConfig::default(), None))
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}
