use crate::commands::load_dataset;
use crate::dataset::SequenceSource;
use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;

/// Drains every training batch for `epochs` passes, resetting between them.
pub fn run(data_file: &Path, config_file: Option<&Path>, epochs: usize) -> Result<()> {
    let mut dataset = load_dataset(data_file, config_file)?;
    let total = dataset.total_examples();
    if total == 0 {
        warn!(
            "Training partition of {} records is too short for windows of length {}",
            dataset.train_len(),
            dataset.example_length()
        );
        return Ok(());
    }

    for epoch in 0..epochs {
        info!("Epoch {}", epoch);
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .map_err(|err| anyhow!("Invalid progress bar template: {}", err))?
                .progress_chars("#>-"),
        );

        let mut batches = 0usize;
        while dataset.has_next() {
            let batch = dataset.next_default_batch()?;
            if batches == 0 {
                info!(
                    "Batch shapes: inputs {:?}, labels {:?}",
                    batch.inputs.shape(),
                    batch.labels.shape()
                );
            }
            batches += 1;
            pb.set_position(dataset.cursor() as u64);
        }
        pb.finish_and_clear();
        info!(
            "Epoch {} drew {} batches covering {} windows",
            epoch,
            batches,
            dataset.cursor()
        );
        dataset.reset();
    }

    Ok(())
}
