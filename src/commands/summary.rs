use crate::commands::load_dataset;
use crate::models::FeatureSlot;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureRangeSummary {
    feature: &'static str,
    min: f64,
    max: f64,
    bounded: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetSummary {
    target: String,
    example_length: usize,
    train_records: usize,
    eval_records: usize,
    training_windows: usize,
    evaluation_pairs: usize,
    input_features: usize,
    output_features: usize,
    ranges: Vec<FeatureRangeSummary>,
}

pub fn run(data_file: &Path, config_file: Option<&Path>) -> Result<()> {
    let dataset = load_dataset(data_file, config_file)?;
    info!(
        "Loaded {} train and {} eval records from {}",
        dataset.train_len(),
        dataset.eval_len(),
        data_file.display()
    );

    let summary = DatasetSummary {
        target: dataset.target().to_string(),
        example_length: dataset.example_length(),
        train_records: dataset.train_len(),
        eval_records: dataset.eval_len(),
        training_windows: dataset.total_examples(),
        evaluation_pairs: dataset.evaluation_pairs().len(),
        input_features: crate::FEATURE_COUNT,
        output_features: dataset.target().output_count(),
        ranges: FeatureSlot::ALL
            .iter()
            .map(|slot| {
                let range = dataset.range(*slot);
                FeatureRangeSummary {
                    feature: slot.name(),
                    min: range.min,
                    max: range.max,
                    bounded: slot.is_bounded(),
                }
            })
            .collect(),
    };

    let rendered =
        serde_json::to_string_pretty(&summary).context("Failed to render dataset summary")?;
    println!("{}", rendered);
    Ok(())
}
