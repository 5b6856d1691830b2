use crate::error::{DatasetError, DatasetResult};
use crate::models::TargetSelector;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_EXAMPLE_LENGTH: usize = 22; // ~22 trading days per month
pub const DEFAULT_MINI_BATCH_SIZE: usize = 128;
pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;

/// Windowing and split parameters for building a [`crate::SequenceDataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetConfig {
    pub example_length: usize,
    pub mini_batch_size: usize,
    /// Fraction of records, in file order, assigned to training.
    pub split_ratio: f64,
    pub category: TargetSelector,
    /// Keep only rows for this symbol; `None` keeps every row.
    pub symbol: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            example_length: DEFAULT_EXAMPLE_LENGTH,
            mini_batch_size: DEFAULT_MINI_BATCH_SIZE,
            split_ratio: DEFAULT_SPLIT_RATIO,
            category: TargetSelector::All,
            symbol: None,
        }
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> DatasetResult<()> {
        if self.example_length == 0 {
            return Err(DatasetError::InvalidConfig(
                "exampleLength must be >= 1".to_string(),
            ));
        }
        if self.mini_batch_size == 0 {
            return Err(DatasetError::InvalidConfig(
                "miniBatchSize must be >= 1".to_string(),
            ));
        }
        if !self.split_ratio.is_finite() || !(0.0..=1.0).contains(&self.split_ratio) {
            return Err(DatasetError::InvalidConfig(format!(
                "splitRatio must be within [0, 1] (value: {})",
                self.split_ratio
            )));
        }
        Ok(())
    }

    /// Reads a JSON object with `exampleLength`, `miniBatchSize`, `splitRatio`,
    /// `category` and optional `symbol`. Absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DatasetConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid dataset config in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from string settings. Only `SYMBOL` is optional.
    pub fn from_settings_map(settings: &HashMap<String, String>) -> Result<Self> {
        let example_length = require_setting_usize(settings, "EXAMPLE_LENGTH", 1)?;
        let mini_batch_size = require_setting_usize(settings, "MINI_BATCH_SIZE", 1)?;
        let split_ratio = require_setting_number(settings, "SPLIT_RATIO", Some(0.0), Some(1.0))?;
        let raw_category = require_setting(settings, "CATEGORY")?;
        let category = raw_category
            .parse::<TargetSelector>()
            .map_err(|err| anyhow!("Setting CATEGORY is invalid: {}", err))?;
        let symbol = settings
            .get("SYMBOL")
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let config = Self {
            example_length,
            mini_batch_size,
            split_ratio,
            category,
            symbol,
        };
        config.validate()?;
        Ok(config)
    }
}

fn require_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    settings
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("Missing required setting {}", key))
}

/// Parses a finite number and checks it against optional inclusive bounds.
fn require_setting_number(
    settings: &HashMap<String, String>,
    key: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<f64> {
    let raw = require_setting(settings, key)?;
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| anyhow!("Setting {} must be a finite number (value: {})", key, raw))?;
    if let Some(min_value) = min.filter(|min_value| value < *min_value) {
        return Err(anyhow!("Setting {} must be >= {} (value: {})", key, min_value, raw));
    }
    if let Some(max_value) = max.filter(|max_value| value > *max_value) {
        return Err(anyhow!("Setting {} must be <= {} (value: {})", key, max_value, raw));
    }
    Ok(value)
}

fn require_setting_usize(
    settings: &HashMap<String, String>,
    key: &str,
    min: usize,
) -> Result<usize> {
    let value = require_setting_number(settings, key, Some(min as f64), None)?;
    if value.fract() != 0.0 {
        return Err(anyhow!("Setting {} must be an integer (value: {})", key, value));
    }
    Ok(value as usize)
}
