use crate::models::{FeatureSlot, Record, TargetSelector, FEATURE_COUNT};
use crate::ranges::FeatureRanges;
use crate::windows::window_count;
use ndarray::{Array1, Array2};

/// One held-out example.
///
/// `input` is `[example_length, FEATURE_COUNT]`, normalized with training
/// ranges. `label` is the raw, unnormalized target value(s) of the record right
/// after the window, so it can be compared with rescaled model output.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationPair {
    pub input: Array2<f64>,
    pub label: Array1<f64>,
}

/// Builds every evaluation pair over `records`, in offset order.
pub fn build_evaluation_set(
    records: &[Record],
    example_length: usize,
    predict_length: usize,
    ranges: &FeatureRanges,
    target: TargetSelector,
) -> Vec<EvaluationPair> {
    let slots = target.slots();
    (0..window_count(records.len(), example_length, predict_length))
        .map(|offset| {
            let mut input = Array2::<f64>::zeros((example_length, FEATURE_COUNT));
            for step in 0..example_length {
                let record = &records[offset + step];
                for slot in FeatureSlot::ALL {
                    input[[step, slot.index()]] = ranges.normalized_value(record, slot);
                }
            }

            let following = &records[offset + example_length];
            let label = slots.iter().map(|slot| following.value(*slot)).collect();
            EvaluationPair { input, label }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(close: f64, sell: bool) -> Record {
        let mut features = [0.0; FEATURE_COUNT];
        features[FeatureSlot::Close.index()] = close;
        features[FeatureSlot::High.index()] = close + 1.0;
        let decision = if sell {
            FeatureSlot::Sell
        } else {
            FeatureSlot::NoDecision
        };
        features[decision.index()] = 1.0;
        features[FeatureSlot::NoExecute.index()] = 1.0;
        Record {
            date: String::new(),
            symbol: "AUD".to_string(),
            features,
        }
    }

    #[test]
    fn uses_training_ranges_and_raw_labels() {
        let train = vec![record(0.0, false), record(10.0, false)];
        let ranges = FeatureRanges::from_records(&train);
        let eval: Vec<Record> = [5.0, 20.0, 7.0, 2.0, 8.0]
            .iter()
            .enumerate()
            .map(|(idx, close)| record(*close, idx == 2))
            .collect();

        let pairs = build_evaluation_set(
            &eval,
            2,
            1,
            &ranges,
            TargetSelector::Feature(FeatureSlot::Close),
        );
        assert_eq!(pairs.len(), 2);

        let first = &pairs[0];
        assert_eq!(first.input.shape(), &[2, FEATURE_COUNT]);
        assert_eq!(first.input[[0, FeatureSlot::Close.index()]], 0.5);
        // Out-of-range eval values are not clipped.
        assert_eq!(first.input[[1, FeatureSlot::Close.index()]], 2.0);
        assert_eq!(first.label.to_vec(), vec![7.0]);
        assert_eq!(pairs[1].label.to_vec(), vec![2.0]);
    }

    #[test]
    fn all_target_label_is_the_full_raw_vector() {
        let train = vec![record(0.0, false), record(10.0, false)];
        let ranges = FeatureRanges::from_records(&train);
        let eval: Vec<Record> = (0..4).map(|idx| record(idx as f64 * 3.0, idx == 2)).collect();

        let pairs = build_evaluation_set(&eval, 1, 1, &ranges, TargetSelector::All);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].label.len(), FEATURE_COUNT);
        assert_eq!(pairs[1].label.to_vec(), eval[2].features.to_vec());
        assert_eq!(pairs[1].label[FeatureSlot::Sell.index()], 1.0);
    }

    #[test]
    fn short_partition_yields_no_pairs() {
        let ranges = FeatureRanges::from_records(&[record(1.0, false), record(2.0, false)]);
        let eval = vec![record(1.5, false)];
        assert!(build_evaluation_set(&eval, 2, 1, &ranges, TargetSelector::All).is_empty());
        assert!(build_evaluation_set(&[], 2, 1, &ranges, TargetSelector::All).is_empty());
    }
}
