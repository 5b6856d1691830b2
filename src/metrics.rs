use crate::error::{DatasetError, DatasetResult};
use crate::models::TargetSelector;
use crate::ranges::FeatureRanges;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Error statistics of rescaled predictions against raw evaluation labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionSummary {
    pub count: usize,
    pub mse: f64,
    pub mae: f64,
    pub rmse: f64,
    /// `None` when the actual values have no variance.
    pub r_squared: Option<f64>,
}

impl RegressionSummary {
    pub fn compute(predictions: &[f64], actuals: &[f64]) -> DatasetResult<Self> {
        if predictions.len() != actuals.len() {
            return Err(DatasetError::InvalidConfig(format!(
                "{} predictions cannot be scored against {} actual values",
                predictions.len(),
                actuals.len()
            )));
        }
        let count = actuals.len();
        if count == 0 {
            return Ok(Self {
                count,
                mse: 0.0,
                mae: 0.0,
                rmse: 0.0,
                r_squared: None,
            });
        }

        let mut squared_error = 0.0;
        let mut absolute_error = 0.0;
        for (predicted, actual) in predictions.iter().zip(actuals) {
            let diff = predicted - actual;
            squared_error += diff * diff;
            absolute_error += diff.abs();
        }

        let mean_actual = actuals.iter().mean();
        let total_variation: f64 = actuals
            .iter()
            .map(|actual| (actual - mean_actual).powi(2))
            .sum();
        let r_squared = if total_variation > 0.0 {
            Some(1.0 - squared_error / total_variation)
        } else {
            None
        };

        let mse = squared_error / count as f64;
        Ok(Self {
            count,
            mse,
            mae: absolute_error / count as f64,
            rmse: mse.sqrt(),
            r_squared,
        })
    }
}

/// Maps normalized model outputs back to raw units for `target`.
///
/// For a single-feature target every value uses that slot's range; for `All`
/// the values are read as consecutive `FEATURE_COUNT`-wide vectors.
pub fn rescale_predictions(
    normalized: &[f64],
    target: TargetSelector,
    ranges: &FeatureRanges,
) -> Vec<f64> {
    let slots = target.slots();
    normalized
        .iter()
        .enumerate()
        .map(|(idx, value)| ranges.denormalize(*value, slots[idx % slots.len()]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureSlot, Record, FEATURE_COUNT};

    #[test]
    fn perfect_predictions_score_zero_error() {
        let actuals = [1.0, 2.0, 4.0];
        let summary = RegressionSummary::compute(&actuals, &actuals).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mse, 0.0);
        assert_eq!(summary.mae, 0.0);
        assert_eq!(summary.r_squared, Some(1.0));
    }

    #[test]
    fn computes_error_statistics() {
        let summary = RegressionSummary::compute(&[2.0, 2.0, 5.0], &[1.0, 3.0, 5.0]).unwrap();
        assert!((summary.mse - 2.0 / 3.0).abs() < 1e-12);
        assert!((summary.mae - 2.0 / 3.0).abs() < 1e-12);
        assert!((summary.rmse - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // mean 3, total variation 8
        assert!((summary.r_squared.unwrap() - (1.0 - 2.0 / 8.0)).abs() < 1e-12);
    }

    #[test]
    fn constant_actuals_have_no_r_squared() {
        let summary = RegressionSummary::compute(&[1.0, 2.0], &[3.0, 3.0]).unwrap();
        assert!(summary.r_squared.is_none());
        assert!(RegressionSummary::compute(&[1.0], &[1.0, 2.0]).is_err());
        assert_eq!(RegressionSummary::compute(&[], &[]).unwrap().count, 0);
    }

    #[test]
    fn rescales_single_and_full_targets() {
        let mut low = [0.0; FEATURE_COUNT];
        let mut high = [0.0; FEATURE_COUNT];
        low[FeatureSlot::Close.index()] = 10.0;
        high[FeatureSlot::Close.index()] = 20.0;
        low[FeatureSlot::Open.index()] = 1.0;
        high[FeatureSlot::Open.index()] = 3.0;
        let records: Vec<Record> = [low, high]
            .into_iter()
            .map(|features| Record {
                date: String::new(),
                symbol: "AUD".to_string(),
                features,
            })
            .collect();
        let ranges = FeatureRanges::from_records(&records);

        let close = rescale_predictions(
            &[0.0, 0.5, 1.0],
            TargetSelector::Feature(FeatureSlot::Close),
            &ranges,
        );
        assert_eq!(close, vec![10.0, 15.0, 20.0]);

        let full = rescale_predictions(&[0.5; FEATURE_COUNT * 2], TargetSelector::All, &ranges);
        assert_eq!(full.len(), FEATURE_COUNT * 2);
        assert_eq!(full[FeatureSlot::Open.index()], 2.0);
        assert_eq!(full[FEATURE_COUNT + FeatureSlot::Close.index()], 15.0);
        assert_eq!(full[FeatureSlot::Buy.index()], 0.5);
    }
}
