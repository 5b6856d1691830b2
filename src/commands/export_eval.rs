use crate::commands::load_dataset;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct ExportedPair {
    input: Vec<Vec<f64>>,
    label: Vec<f64>,
}

/// Writes the evaluation pairs as a JSON array of `{input, label}` objects.
pub fn run(data_file: &Path, config_file: Option<&Path>, output_path: &Path) -> Result<()> {
    let dataset = load_dataset(data_file, config_file)?;
    let pairs: Vec<ExportedPair> = dataset
        .evaluation_pairs()
        .iter()
        .map(|pair| ExportedPair {
            input: pair.input.rows().into_iter().map(|row| row.to_vec()).collect(),
            label: pair.label.to_vec(),
        })
        .collect();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }
    let file = File::create(output_path)
        .with_context(|| format!("Unable to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &pairs).context("Failed to serialize evaluation pairs")?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", output_path.display()))?;

    info!(
        "Wrote {} evaluation pairs to {}",
        pairs.len(),
        output_path.display()
    );
    Ok(())
}
