pub mod epoch;
pub mod export_eval;
pub mod summary;

use crate::config::DatasetConfig;
use crate::dataset::SequenceDataset;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Loads the dataset for a CLI command, using defaults when no config file is given.
pub fn load_dataset(data_file: &Path, config_file: Option<&Path>) -> Result<SequenceDataset> {
    let config = match config_file {
        Some(path) => {
            info!("Using dataset config from {}", path.display());
            DatasetConfig::from_json_file(path)?
        }
        None => DatasetConfig::default(),
    };
    SequenceDataset::load(data_file, config)
        .with_context(|| format!("Failed to load dataset from {}", data_file.display()))
}
