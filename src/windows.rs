use crate::error::{DatasetError, DatasetResult};
use std::collections::VecDeque;

/// Number of valid window start offsets in a partition of `record_count`
/// records: `max(0, record_count - example_length - predict_length)`.
pub fn window_count(record_count: usize, example_length: usize, predict_length: usize) -> usize {
    record_count.saturating_sub(example_length + predict_length)
}

/// FIFO queue of training window offsets, drained once per epoch.
#[derive(Debug, Clone)]
pub struct WindowIndexer {
    record_count: usize,
    example_length: usize,
    predict_length: usize,
    offsets: VecDeque<usize>,
}

impl WindowIndexer {
    pub fn new(record_count: usize, example_length: usize, predict_length: usize) -> Self {
        let mut indexer = Self {
            record_count,
            example_length,
            predict_length,
            offsets: VecDeque::new(),
        };
        indexer.reset();
        indexer
    }

    /// Regenerates every offset in ascending order, discarding what was left.
    pub fn reset(&mut self) {
        self.offsets.clear();
        self.offsets.extend(0..self.total_windows());
    }

    pub fn has_next(&self) -> bool {
        !self.offsets.is_empty()
    }

    pub fn take_next(&mut self) -> DatasetResult<usize> {
        self.offsets.pop_front().ok_or(DatasetError::Exhausted)
    }

    pub fn remaining(&self) -> usize {
        self.offsets.len()
    }

    pub fn total_windows(&self) -> usize {
        window_count(self.record_count, self.example_length, self.predict_length)
    }

    /// Windows consumed since the last reset.
    pub fn cursor(&self) -> usize {
        self.total_windows() - self.remaining()
    }

    pub fn example_length(&self) -> usize {
        self.example_length
    }

    pub fn predict_length(&self) -> usize {
        self.predict_length
    }
}
