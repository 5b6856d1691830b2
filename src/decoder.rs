//! Row decoding: raw delimited tokens into fixed-width [`Record`]s.
//!
//! Continuous columns parse as `f64` (blank tokens decode as `0`). The decision
//! and execution columns expand into mutually exclusive one-hot slots, so every
//! decoded record satisfies `buy + sell + no_decision == 1` and
//! `execute + no_execute == 1`.

use crate::error::{DatasetError, DatasetResult};
use crate::models::{FeatureSlot, Record, FEATURE_COUNT};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column positions of one input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub symbol_column: usize,
    pub date_column: usize,
    /// First of the consecutive continuous columns (open .. tesla9).
    pub first_feature_column: usize,
    pub decision_column: usize,
    pub execution_column: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let first_feature_column = 2;
        let decision_column = first_feature_column + FeatureSlot::CONTINUOUS.len();
        Self {
            symbol_column: 0,
            date_column: 1,
            first_feature_column,
            decision_column,
            execution_column: decision_column + 1,
        }
    }
}

impl ColumnLayout {
    fn feature_column(&self, position: usize) -> usize {
        self.first_feature_column + position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Buy,
    Sell,
    NoDecision,
}

impl Decision {
    /// Case-insensitive after trimming; blank means no decision.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(Decision::Buy),
            "sell" => Some(Decision::Sell),
            "no" | "" => Some(Decision::NoDecision),
            _ => None,
        }
    }

    pub fn slot(self) -> FeatureSlot {
        match self {
            Decision::Buy => FeatureSlot::Buy,
            Decision::Sell => FeatureSlot::Sell,
            Decision::NoDecision => FeatureSlot::NoDecision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Execute,
    NoExecute,
}

impl Execution {
    /// Case-insensitive after trimming; blank means no execution.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "execute" => Some(Execution::Execute),
            "no" | "" => Some(Execution::NoExecute),
            _ => None,
        }
    }

    pub fn slot(self) -> FeatureSlot {
        match self {
            Execution::Execute => FeatureSlot::Execute,
            Execution::NoExecute => FeatureSlot::NoExecute,
        }
    }
}

/// Trims and uppercases a symbol, returning `None` when nothing is left.
pub fn normalize_symbol(value: &str) -> Option<String> {
    let normalized = value.trim().to_uppercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn parse_numeric(token: &str, line: u64, column: usize) -> DatasetResult<f64> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DatasetError::InvalidNumber {
            line,
            column,
            value: token.to_string(),
        })
}

/// Decodes one data row. Missing trailing tokens decode as blank.
pub fn decode_row(row: &StringRecord, line: u64, layout: &ColumnLayout) -> DatasetResult<Record> {
    let token = |column: usize| row.get(column).unwrap_or("");
    let mut features = [0.0; FEATURE_COUNT];

    for (position, slot) in FeatureSlot::CONTINUOUS.iter().enumerate() {
        let column = layout.feature_column(position);
        features[slot.index()] = parse_numeric(token(column), line, column)?;
    }

    let raw_decision = token(layout.decision_column);
    let decision = Decision::parse(raw_decision).ok_or_else(|| DatasetError::Decode {
        line,
        column: layout.decision_column,
        kind: "decision",
        value: raw_decision.to_string(),
    })?;
    features[decision.slot().index()] = 1.0;

    let raw_execution = token(layout.execution_column);
    let execution = Execution::parse(raw_execution).ok_or_else(|| DatasetError::Decode {
        line,
        column: layout.execution_column,
        kind: "execution",
        value: raw_execution.to_string(),
    })?;
    features[execution.slot().index()] = 1.0;

    Ok(Record {
        date: token(layout.date_column).to_string(),
        symbol: token(layout.symbol_column).to_string(),
        features,
    })
}

/// Reads every data row from `reader`, skipping the header row.
///
/// With a `symbol` filter, rows for other symbols are dropped before decoding.
/// The first malformed row aborts the whole load.
pub fn read_records<R: Read>(
    reader: R,
    layout: &ColumnLayout,
    symbol: Option<&str>,
) -> DatasetResult<Vec<Record>> {
    let wanted = symbol.and_then(normalize_symbol);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    for result in csv_reader.records() {
        let row = result?;
        rows_read += 1;
        if let Some(wanted) = wanted.as_deref() {
            let row_symbol = row.get(layout.symbol_column).and_then(normalize_symbol);
            if row_symbol.as_deref() != Some(wanted) {
                continue;
            }
        }
        let line = row.position().map(|position| position.line()).unwrap_or(0);
        let record = decode_row(&row, line, layout)?;
        if records.is_empty() {
            debug!("First decoded record for verification: {:?}", record);
        }
        records.push(record);
    }

    info!(
        "Finished reading {} data rows, dataset size {}",
        rows_read,
        records.len()
    );
    Ok(records)
}

pub fn load_records<P: AsRef<Path>>(
    path: P,
    layout: &ColumnLayout,
    symbol: Option<&str>,
) -> DatasetResult<Vec<Record>> {
    let path = path.as_ref();
    info!("Reading records from {}", path.display());
    let file = File::open(path)?;
    read_records(file, layout, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tokens: &[&str]) -> StringRecord {
        StringRecord::from(tokens.to_vec())
    }

    fn full_row(decision: &str, execution: &str) -> StringRecord {
        row(&[
            "CHF",
            "20200616  09:30:00",
            "1.0574",
            "1.0583",
            "1.0573",
            "1.0583",
            "269",
            "1.0578",
            "111",
            "30",
            "0.408462",
            "0.81675",
            "1.225584",
            decision,
            execution,
        ])
    }

    #[test]
    fn decodes_continuous_columns_and_metadata() {
        let record = decode_row(&full_row("BUY", "NO"), 2, &ColumnLayout::default()).unwrap();
        assert_eq!(record.symbol, "CHF");
        assert_eq!(record.date, "20200616  09:30:00");
        assert_eq!(record.value(FeatureSlot::Open), 1.0574);
        assert_eq!(record.value(FeatureSlot::Volume), 269.0);
        assert_eq!(record.value(FeatureSlot::Minute), 30.0);
        assert_eq!(record.value(FeatureSlot::Tesla9), 1.225584);
    }

    #[test]
    fn decision_token_is_trimmed_and_case_insensitive() {
        let record = decode_row(&full_row("Buy ", ""), 2, &ColumnLayout::default()).unwrap();
        assert_eq!(record.value(FeatureSlot::Buy), 1.0);
        assert_eq!(record.value(FeatureSlot::Sell), 0.0);
        assert_eq!(record.value(FeatureSlot::NoDecision), 0.0);
        assert_eq!(record.value(FeatureSlot::Execute), 0.0);
        assert_eq!(record.value(FeatureSlot::NoExecute), 1.0);
    }

    #[test]
    fn one_hot_groups_always_sum_to_one() {
        for decision in ["buy", "SELL", "no", "", "  "] {
            for execution in ["execute", "No", ""] {
                let record =
                    decode_row(&full_row(decision, execution), 2, &ColumnLayout::default())
                        .unwrap();
                let decisions = record.value(FeatureSlot::Buy)
                    + record.value(FeatureSlot::Sell)
                    + record.value(FeatureSlot::NoDecision);
                let executions =
                    record.value(FeatureSlot::Execute) + record.value(FeatureSlot::NoExecute);
                assert_eq!(decisions, 1.0, "decision={:?}", decision);
                assert_eq!(executions, 1.0, "execution={:?}", execution);
            }
        }
    }

    #[test]
    fn unknown_decision_is_a_decode_error() {
        let err = decode_row(&full_row("maybe", "no"), 7, &ColumnLayout::default()).unwrap_err();
        match err {
            DatasetError::Decode {
                line, column, value, ..
            } => {
                assert_eq!(line, 7);
                assert_eq!(column, 13);
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_execution_is_a_decode_error() {
        let err = decode_row(&full_row("sell", "later"), 3, &ColumnLayout::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Decode { column: 14, .. }));
    }

    #[test]
    fn blank_and_missing_tokens_decode_as_zero() {
        let record = decode_row(&row(&["AUD", "d1", " ", "2.5"]), 2, &ColumnLayout::default())
            .unwrap();
        assert_eq!(record.value(FeatureSlot::Open), 0.0);
        assert_eq!(record.value(FeatureSlot::High), 2.5);
        assert_eq!(record.value(FeatureSlot::Tesla9), 0.0);
        assert_eq!(record.value(FeatureSlot::NoDecision), 1.0);
        assert_eq!(record.value(FeatureSlot::NoExecute), 1.0);
    }

    #[test]
    fn garbage_number_is_rejected() {
        let mut tokens = vec!["AUD", "d1", "abc"];
        tokens.resize(15, "");
        let err = decode_row(&row(&tokens), 4, &ColumnLayout::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber { column: 2, .. }));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for bad in ["NaN", "inf", "-Infinity"] {
            let mut tokens = vec!["AUD", "d1", "1.0", bad];
            tokens.resize(15, "");
            let err = decode_row(&row(&tokens), 6, &ColumnLayout::default()).unwrap_err();
            match err {
                DatasetError::InvalidNumber {
                    line, column, value,
                } => {
                    assert_eq!(line, 6);
                    assert_eq!(column, 3);
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {bad:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn header_is_skipped_and_symbol_filter_applies() {
        let input = "\
Currency,Date,Open,High,Low,Close,Volume,WAP,Count,Minute,Tesla3,Tesla6,Tesla9,Decision,Execute
AUD,d1,1,2,0.5,1.5,10,1.2,3,0,0.1,0.2,0.3,buy,execute
CHF,d1,9,9,9,9,9,9,9,9,9,9,9,sell,no
aud ,d2,1.1,2.1,0.6,1.6,11,1.3,4,1,0.1,0.2,0.3,,
";
        let all = read_records(input.as_bytes(), &ColumnLayout::default(), None).unwrap();
        assert_eq!(all.len(), 3);

        let aud = read_records(input.as_bytes(), &ColumnLayout::default(), Some("AUD")).unwrap();
        assert_eq!(aud.len(), 2);
        assert_eq!(aud[1].date, "d2");
        assert_eq!(aud[1].value(FeatureSlot::NoDecision), 1.0);
    }
}
