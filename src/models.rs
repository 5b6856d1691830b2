use crate::error::DatasetError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of numeric slots in every decoded record.
pub const FEATURE_COUNT: usize = 16;

/// Target horizon in records. Labels are always the next record.
pub const PREDICT_LENGTH: usize = 1;

/// Fixed position of a value inside a record's feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureSlot {
    Open,
    High,
    Low,
    Close,
    Volume,
    Wap,
    Count,
    Minute,
    Tesla3,
    Tesla6,
    Tesla9,
    Buy,
    Sell,
    NoDecision,
    Execute,
    NoExecute,
}

impl FeatureSlot {
    /// Every slot in tensor order.
    pub const ALL: [FeatureSlot; FEATURE_COUNT] = [
        FeatureSlot::Open,
        FeatureSlot::High,
        FeatureSlot::Low,
        FeatureSlot::Close,
        FeatureSlot::Volume,
        FeatureSlot::Wap,
        FeatureSlot::Count,
        FeatureSlot::Minute,
        FeatureSlot::Tesla3,
        FeatureSlot::Tesla6,
        FeatureSlot::Tesla9,
        FeatureSlot::Buy,
        FeatureSlot::Sell,
        FeatureSlot::NoDecision,
        FeatureSlot::Execute,
        FeatureSlot::NoExecute,
    ];

    /// Slots read directly from numeric columns, in column order.
    pub const CONTINUOUS: [FeatureSlot; 11] = [
        FeatureSlot::Open,
        FeatureSlot::High,
        FeatureSlot::Low,
        FeatureSlot::Close,
        FeatureSlot::Volume,
        FeatureSlot::Wap,
        FeatureSlot::Count,
        FeatureSlot::Minute,
        FeatureSlot::Tesla3,
        FeatureSlot::Tesla6,
        FeatureSlot::Tesla9,
    ];

    pub fn index(self) -> usize {
        match self {
            FeatureSlot::Open => 0,
            FeatureSlot::High => 1,
            FeatureSlot::Low => 2,
            FeatureSlot::Close => 3,
            FeatureSlot::Volume => 4,
            FeatureSlot::Wap => 5,
            FeatureSlot::Count => 6,
            FeatureSlot::Minute => 7,
            FeatureSlot::Tesla3 => 8,
            FeatureSlot::Tesla6 => 9,
            FeatureSlot::Tesla9 => 10,
            FeatureSlot::Buy => 11,
            FeatureSlot::Sell => 12,
            FeatureSlot::NoDecision => 13,
            FeatureSlot::Execute => 14,
            FeatureSlot::NoExecute => 15,
        }
    }

    /// One-hot slots whose value set is already {0, 1}.
    pub fn is_bounded(self) -> bool {
        matches!(
            self,
            FeatureSlot::Buy
                | FeatureSlot::Sell
                | FeatureSlot::NoDecision
                | FeatureSlot::Execute
                | FeatureSlot::NoExecute
        )
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureSlot::Open => "OPEN",
            FeatureSlot::High => "HIGH",
            FeatureSlot::Low => "LOW",
            FeatureSlot::Close => "CLOSE",
            FeatureSlot::Volume => "VOLUME",
            FeatureSlot::Wap => "WAP",
            FeatureSlot::Count => "COUNT",
            FeatureSlot::Minute => "MINUTE",
            FeatureSlot::Tesla3 => "TESLA3",
            FeatureSlot::Tesla6 => "TESLA6",
            FeatureSlot::Tesla9 => "TESLA9",
            FeatureSlot::Buy => "BUY",
            FeatureSlot::Sell => "SELL",
            FeatureSlot::NoDecision => "NO_DECISION",
            FeatureSlot::Execute => "EXECUTE",
            FeatureSlot::NoExecute => "NO_EXECUTE",
        }
    }
}

impl fmt::Display for FeatureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureSlot {
    type Err = DatasetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        FeatureSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DatasetError::InvalidConfig(format!("unknown feature slot '{}'", raw)))
    }
}

/// Which feature(s) the label tensors carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetSelector {
    #[default]
    All,
    Feature(FeatureSlot),
}

impl TargetSelector {
    pub fn output_count(self) -> usize {
        match self {
            TargetSelector::All => FEATURE_COUNT,
            TargetSelector::Feature(_) => PREDICT_LENGTH,
        }
    }

    /// Slots carried by a label, in label order.
    pub fn slots(self) -> Vec<FeatureSlot> {
        match self {
            TargetSelector::All => FeatureSlot::ALL.to_vec(),
            TargetSelector::Feature(slot) => vec![slot],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetSelector::All => "ALL",
            TargetSelector::Feature(slot) => slot.name(),
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TargetSelector {
    type Err = DatasetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(TargetSelector::All);
        }
        raw.parse::<FeatureSlot>()
            .map(TargetSelector::Feature)
            .map_err(|_| {
                DatasetError::InvalidConfig(format!(
                    "category must be ALL or a feature slot name (value: {})",
                    raw
                ))
            })
    }
}

impl Serialize for TargetSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TargetSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One decoded observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: String,
    pub symbol: String,
    pub features: [f64; FEATURE_COUNT],
}

impl Record {
    pub fn value(&self, slot: FeatureSlot) -> f64 {
        self.features[slot.index()]
    }
}
