pub mod batch;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod decoder;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod models;
pub mod ranges;
pub mod windows;

pub use config::DatasetConfig;
pub use dataset::{SequenceDataset, SequenceSource};
pub use error::{DatasetError, DatasetResult};
pub use models::{FeatureSlot, Record, TargetSelector, FEATURE_COUNT, PREDICT_LENGTH};
