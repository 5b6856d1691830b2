use crate::batch::{Batch, BatchAssembler};
use crate::config::DatasetConfig;
use crate::decoder::{load_records, read_records, ColumnLayout};
use crate::error::DatasetResult;
use crate::evaluation::{build_evaluation_set, EvaluationPair};
use crate::models::{FeatureSlot, Record, TargetSelector, FEATURE_COUNT, PREDICT_LENGTH};
use crate::ranges::{FeatureRange, FeatureRanges};
use crate::windows::WindowIndexer;
use log::info;
use std::io::Read;
use std::path::Path;

/// Learner-facing contract of a training batch stream.
pub trait SequenceSource {
    fn next_batch(&mut self, size: usize) -> DatasetResult<Batch>;
    fn has_next(&self) -> bool;
    /// Starts a new epoch. Batches from different epochs never mix.
    fn reset(&mut self);
    fn input_feature_count(&self) -> usize;
    fn output_feature_count(&self) -> usize;
}

/// Chronologically split dataset: an iterative training side and a one-shot
/// evaluation set, both normalized with ranges from the training records.
///
/// Not meant for concurrent use: batch draws mutate the window queue.
#[derive(Debug, Clone)]
pub struct SequenceDataset {
    config: DatasetConfig,
    train: Vec<Record>,
    eval_len: usize,
    ranges: FeatureRanges,
    indexer: WindowIndexer,
    evaluation: Vec<EvaluationPair>,
}

/// Index separating the train prefix from the eval suffix.
pub fn split_index(record_count: usize, split_ratio: f64) -> usize {
    ((record_count as f64 * split_ratio).round() as usize).min(record_count)
}

impl SequenceDataset {
    pub fn from_records(mut records: Vec<Record>, config: DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;
        let split = split_index(records.len(), config.split_ratio);
        info!(
            "Splitting {} records at index {} for training and evaluation",
            records.len(),
            split
        );

        let eval = records.split_off(split);
        let train = records;
        let ranges = FeatureRanges::from_records(&train);
        let indexer = WindowIndexer::new(train.len(), config.example_length, PREDICT_LENGTH);
        let evaluation = build_evaluation_set(
            &eval,
            config.example_length,
            PREDICT_LENGTH,
            &ranges,
            config.category,
        );
        info!(
            "Prepared {} training windows and {} evaluation pairs (target {})",
            indexer.total_windows(),
            evaluation.len(),
            config.category
        );

        Ok(Self {
            config,
            train,
            eval_len: eval.len(),
            ranges,
            indexer,
            evaluation,
        })
    }

    pub fn from_reader<R: Read>(reader: R, config: DatasetConfig) -> DatasetResult<Self> {
        let records = read_records(reader, &ColumnLayout::default(), config.symbol.as_deref())?;
        Self::from_records(records, config)
    }

    pub fn load<P: AsRef<Path>>(path: P, config: DatasetConfig) -> DatasetResult<Self> {
        let records = load_records(path, &ColumnLayout::default(), config.symbol.as_deref())?;
        Self::from_records(records, config)
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn target(&self) -> TargetSelector {
        self.config.category
    }

    pub fn batch_size(&self) -> usize {
        self.config.mini_batch_size
    }

    pub fn example_length(&self) -> usize {
        self.config.example_length
    }

    pub fn train_records(&self) -> &[Record] {
        &self.train
    }

    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    pub fn eval_len(&self) -> usize {
        self.eval_len
    }

    pub fn ranges(&self) -> &FeatureRanges {
        &self.ranges
    }

    pub fn range(&self, slot: FeatureSlot) -> FeatureRange {
        self.ranges.get(slot)
    }

    pub fn min_values(&self) -> [f64; FEATURE_COUNT] {
        self.ranges.min_values()
    }

    pub fn max_values(&self) -> [f64; FEATURE_COUNT] {
        self.ranges.max_values()
    }

    pub fn total_examples(&self) -> usize {
        self.indexer.total_windows()
    }

    pub fn remaining(&self) -> usize {
        self.indexer.remaining()
    }

    pub fn cursor(&self) -> usize {
        self.indexer.cursor()
    }

    /// Draws a batch of the configured mini-batch size.
    pub fn next_default_batch(&mut self) -> DatasetResult<Batch> {
        let size = self.config.mini_batch_size;
        self.next_batch(size)
    }

    /// Evaluation pairs over the held-out suffix. Never consumed.
    pub fn evaluation_pairs(&self) -> &[EvaluationPair] {
        &self.evaluation
    }

    pub fn denormalize(&self, value: f64, slot: FeatureSlot) -> f64 {
        self.ranges.denormalize(value, slot)
    }

    /// Rescales a full `FEATURE_COUNT`-wide normalized vector.
    pub fn denormalize_all(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(FeatureSlot::ALL)
            .map(|(value, slot)| self.ranges.denormalize(*value, slot))
            .collect()
    }
}

impl SequenceSource for SequenceDataset {
    fn next_batch(&mut self, size: usize) -> DatasetResult<Batch> {
        BatchAssembler::new(&self.train, &self.ranges, self.config.category)
            .assemble(&mut self.indexer, size)
    }

    fn has_next(&self) -> bool {
        self.indexer.has_next()
    }

    fn reset(&mut self) {
        self.indexer.reset();
    }

    fn input_feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    fn output_feature_count(&self) -> usize {
        self.config.category.output_count()
    }
}

/// Yields configured-size batches until the epoch is drained.
impl Iterator for SequenceDataset {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if !self.indexer.has_next() {
            return None;
        }
        self.next_default_batch().ok()
    }
}
