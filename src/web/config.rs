use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid duration '{value}': {source}")]
    Duration {
        value: String,
        source: humantime::DurationError,
    },
    #[error("TLE refresh interval must be greater than zero")]
    ZeroRefresh,
    #[error("predict.max_days must not be negative")]
    NegativeMaxDays,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub tle: TleConfig,
    #[serde(default)]
    pub predict: PredictConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TleConfig {
    pub file: PathBuf,
    #[serde(default)]
    pub norad_id: Option<u64>,
    #[serde(default = "default_refresh")]
    pub refresh: String,
}

fn default_refresh() -> String {
    "1h".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictConfig {
    #[serde(default = "default_days")]
    pub days: i64,
    /// Largest `days` a single request may ask for
    #[serde(default = "default_max_days")]
    pub max_days: i64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            max_days: default_max_days(),
        }
    }
}

fn default_days() -> i64 {
    7
}

fn default_max_days() -> i64 {
    30
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.tle.refresh_interval()?;
        if config.predict.max_days < 0 {
            return Err(ConfigError::NegativeMaxDays);
        }
        Ok(config)
    }
}

impl TleConfig {
    pub fn refresh_interval(&self) -> Result<Duration, ConfigError> {
        let interval = humantime::parse_duration(self.refresh.trim()).map_err(|source| {
            ConfigError::Duration {
                value: self.refresh.clone(),
                source,
            }
        })?;
        if interval.is_zero() {
            return Err(ConfigError::ZeroRefresh);
        }
        Ok(interval)
    }
}
