use crate::models::{FeatureSlot, Record, FEATURE_COUNT};
use log::warn;

/// Min/max bounds of one feature slot over the training partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    /// Sentinel range that any observed value narrows.
    pub const EMPTY: FeatureRange = FeatureRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub const UNIT: FeatureRange = FeatureRange { min: 0.0, max: 1.0 };

    fn observe(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when the slot was never observed or held a single value.
    pub fn is_degenerate(&self) -> bool {
        !(self.span() > 0.0 && self.span().is_finite())
    }

    /// `(value - min) / (max - min)`, or `0` for a degenerate range.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (value - self.min) / self.span()
    }

    /// Inverse of [`normalize`](Self::normalize). A constant range maps back to
    /// its single value; an unobserved range returns `value` unchanged.
    pub fn denormalize(&self, value: f64) -> f64 {
        if !self.min.is_finite() || !self.max.is_finite() {
            return value;
        }
        value * self.span() + self.min
    }
}

/// Per-slot normalization bounds, computed once from training records and
/// shared read-only by both partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRanges {
    ranges: [FeatureRange; FEATURE_COUNT],
}

impl FeatureRanges {
    pub fn from_records(records: &[Record]) -> Self {
        let mut ranges = [FeatureRange::EMPTY; FEATURE_COUNT];
        for slot in FeatureSlot::ALL {
            if slot.is_bounded() {
                ranges[slot.index()] = FeatureRange::UNIT;
            }
        }

        for record in records {
            for slot in FeatureSlot::CONTINUOUS {
                ranges[slot.index()].observe(record.value(slot));
            }
        }

        if !records.is_empty() {
            for slot in FeatureSlot::CONTINUOUS {
                let range = ranges[slot.index()];
                if range.is_degenerate() {
                    warn!(
                        "Feature {} is constant at {} over the training partition; it normalizes to 0",
                        slot, range.min
                    );
                }
            }
        }

        Self { ranges }
    }

    pub fn get(&self, slot: FeatureSlot) -> FeatureRange {
        self.ranges[slot.index()]
    }

    pub fn normalize(&self, value: f64, slot: FeatureSlot) -> f64 {
        self.get(slot).normalize(value)
    }

    pub fn denormalize(&self, value: f64, slot: FeatureSlot) -> f64 {
        self.get(slot).denormalize(value)
    }

    pub fn normalized_value(&self, record: &Record, slot: FeatureSlot) -> f64 {
        self.normalize(record.value(slot), slot)
    }

    pub fn min_values(&self) -> [f64; FEATURE_COUNT] {
        self.ranges.map(|range| range.min)
    }

    pub fn max_values(&self) -> [f64; FEATURE_COUNT] {
        self.ranges.map(|range| range.max)
    }
}
