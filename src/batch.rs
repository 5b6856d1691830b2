use crate::error::{DatasetError, DatasetResult};
use crate::models::{FeatureSlot, Record, TargetSelector, FEATURE_COUNT};
use crate::ranges::FeatureRanges;
use crate::windows::WindowIndexer;
use ndarray::Array3;

/// Normalized training tensors for one draw.
///
/// `inputs` is `[batch, FEATURE_COUNT, example_length]`; `labels` is
/// `[batch, output_count, example_length]` and holds, at every time step, the
/// target feature(s) of the record one position ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub inputs: Array3<f64>,
    pub labels: Array3<f64>,
}

impl Batch {
    pub fn size(&self) -> usize {
        self.inputs.shape()[0]
    }
}

/// Materializes normalized batches from training records.
pub struct BatchAssembler<'a> {
    records: &'a [Record],
    ranges: &'a FeatureRanges,
    target: TargetSelector,
}

impl<'a> BatchAssembler<'a> {
    pub fn new(records: &'a [Record], ranges: &'a FeatureRanges, target: TargetSelector) -> Self {
        Self {
            records,
            ranges,
            target,
        }
    }

    /// Draws up to `requested` windows from `indexer`, consuming them.
    pub fn assemble(&self, indexer: &mut WindowIndexer, requested: usize) -> DatasetResult<Batch> {
        if !indexer.has_next() {
            return Err(DatasetError::Exhausted);
        }

        let example_length = indexer.example_length();
        let batch_size = requested.min(indexer.remaining());
        let mut inputs = Array3::<f64>::zeros((batch_size, FEATURE_COUNT, example_length));
        let mut labels =
            Array3::<f64>::zeros((batch_size, self.target.output_count(), example_length));

        for row in 0..batch_size {
            let offset = indexer.take_next()?;
            for step in 0..example_length {
                let current = &self.records[offset + step];
                let next = &self.records[offset + step + 1];

                for slot in FeatureSlot::ALL {
                    inputs[[row, slot.index(), step]] =
                        self.ranges.normalized_value(current, slot);
                }

                match self.target {
                    TargetSelector::All => {
                        for slot in FeatureSlot::ALL {
                            labels[[row, slot.index(), step]] =
                                self.ranges.normalized_value(next, slot);
                        }
                    }
                    TargetSelector::Feature(slot) => {
                        labels[[row, 0, step]] = self.ranges.normalized_value(next, slot);
                    }
                }
            }
        }

        Ok(Batch { inputs, labels })
    }
}
