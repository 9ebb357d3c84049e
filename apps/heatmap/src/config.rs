use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenv::dotenv;
use thiserror::Error;
use tracing::debug;

use crate::dataset::DEFAULT_DATASET_URL;
use crate::scale::Layout;

pub const ENV_DATASET_URL: &str = "HEATMAP_DATASET_URL";
pub const ENV_WIDTH: &str = "HEATMAP_WIDTH";
pub const ENV_HEIGHT: &str = "HEATMAP_HEIGHT";
pub const ENV_PADDING: &str = "HEATMAP_PADDING";
pub const ENV_LEGEND_WIDTH: &str = "HEATMAP_LEGEND_WIDTH";
pub const ENV_OUTPUT: &str = "HEATMAP_OUTPUT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid number")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: String },
}

/// Where the chart comes from and where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub dataset_url: String,
    pub layout: Layout,
    pub output: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            layout: Layout::default(),
            output: None,
        }
    }
}

impl ChartConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable lookup; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let dataset_url = lookup(ENV_DATASET_URL)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.dataset_url);

        let layout = Layout {
            width: positive(&lookup, ENV_WIDTH)?.unwrap_or(defaults.layout.width),
            height: positive(&lookup, ENV_HEIGHT)?.unwrap_or(defaults.layout.height),
            padding: number(&lookup, ENV_PADDING)?.unwrap_or(defaults.layout.padding),
            legend_width: positive(&lookup, ENV_LEGEND_WIDTH)?
                .unwrap_or(defaults.layout.legend_width),
            ..defaults.layout
        };

        let output = lookup(ENV_OUTPUT)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        debug!(%dataset_url, ?layout, ?output, "configuration resolved");

        Ok(Self {
            dataset_url,
            layout,
            output,
        })
    }
}

fn number<F>(lookup: &F, name: &'static str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            f64::from_str(value.trim())
                .ok()
                .filter(|parsed| parsed.is_finite())
                .ok_or(ConfigError::InvalidNumber { name, value })
        })
        .transpose()
}

fn positive<F>(lookup: &F, name: &'static str) -> Result<Option<f64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match number(lookup, name)? {
        Some(value) if value <= 0.0 => Err(ConfigError::NotPositive {
            name,
            value: value.to_string(),
        }),
        other => Ok(other),
    }
}
