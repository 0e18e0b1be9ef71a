pub mod compute;
pub mod correlation;

use serde::ser::{Serialize, SerializeMap, Serializer};

use qixing_data::{DIGIT_SLOTS, POSITION_COUNT, Position};

pub use compute::compute_features;
pub use correlation::CorrelationTable;

/// Sparse mapping keyed by a digit (or a digit difference) in `0..DIGIT_SLOTS`.
/// Absent keys are distinct from zero values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitTable<T: Copy> {
    slots: [Option<T>; DIGIT_SLOTS],
}

impl<T: Copy> Default for DigitTable<T> {
    fn default() -> Self {
        Self { slots: [None; DIGIT_SLOTS] }
    }
}

impl<T: Copy> DigitTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u8) -> Option<T> {
        self.slots.get(key as usize).copied().flatten()
    }

    pub fn contains(&self, key: u8) -> bool {
        self.get(key).is_some()
    }

    /// Keys outside `0..DIGIT_SLOTS` are ignored.
    pub fn insert(&mut self, key: u8, value: T) {
        if let Some(slot) = self.slots.get_mut(key as usize) {
            *slot = Some(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(k, v)| v.map(|v| (k as u8, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.slots.iter().filter_map(|v| *v)
    }
}

impl DigitTable<f64> {
    /// Relative frequencies of the nonzero counts; empty when `total` is 0.
    pub fn from_counts(counts: &[u32; DIGIT_SLOTS], total: u32) -> Self {
        let mut table = Self::new();
        if total == 0 {
            return table;
        }
        for (key, &count) in counts.iter().enumerate() {
            if count > 0 {
                table.insert(key as u8, count as f64 / total as f64);
            }
        }
        table
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    pub fn min_value(&self) -> Option<f64> {
        self.values().min_by(f64::total_cmp)
    }
}

impl<T: Copy + Serialize> Serialize for DigitTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BigSmallRatio {
    pub big_ratio: f64,
    pub small_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OddEvenRatio {
    pub odd_ratio: f64,
    pub even_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Mod3Distribution {
    pub way_0: f64,
    pub way_1: f64,
    pub way_2: f64,
}

impl Mod3Distribution {
    pub fn way(&self, class: u8) -> f64 {
        match class % 3 {
            0 => self.way_0,
            1 => self.way_1,
            _ => self.way_2,
        }
    }

    pub fn total(&self) -> f64 {
        self.way_0 + self.way_1 + self.way_2
    }
}

/// The eight per-position statistics computed from one history snapshot.
/// Ratio features are `None` when the history is empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PositionFeatureSet {
    pub position: Position,
    pub frequency: DigitTable<f64>,
    pub missing_streak: DigitTable<u32>,
    pub prev_repeat: DigitTable<u32>,
    pub big_small_ratio: Option<BigSmallRatio>,
    pub odd_even_ratio: Option<OddEvenRatio>,
    pub mod3_distribution: Option<Mod3Distribution>,
    /// Keyed by absolute difference between consecutive draws.
    pub span_distribution: DigitTable<f64>,
    pub same_period_pattern: DigitTable<f64>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FeatureSnapshot {
    pub history_len: usize,
    /// Digits of the newest draw, used as "previous draw" when scoring.
    pub latest_digits: Option<[u8; POSITION_COUNT]>,
    /// Indexed by `Position::index`.
    pub positions: Vec<PositionFeatureSet>,
    /// One table per adjacent pair, P1-P2 through P6-P7.
    pub correlations: Vec<CorrelationTable>,
}

impl FeatureSnapshot {
    pub fn position(&self, position: Position) -> &PositionFeatureSet {
        &self.positions[position.index()]
    }

    pub fn previous_digit(&self, position: Position) -> Option<u8> {
        self.latest_digits.map(|d| d[position.index()])
    }

    /// The table conditioning `from.next()` on `from`.
    pub fn correlation(&self, from: Position) -> Option<&CorrelationTable> {
        self.correlations.iter().find(|t| t.from == from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_table_absent_vs_zero() {
        let mut table: DigitTable<u32> = DigitTable::new();
        assert!(table.is_empty());
        table.insert(3, 0);
        assert!(table.contains(3));
        assert_eq!(table.get(3), Some(0));
        assert_eq!(table.get(4), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_digit_table_ignores_out_of_range() {
        let mut table: DigitTable<u32> = DigitTable::new();
        table.insert(DIGIT_SLOTS as u8, 1);
        assert!(table.is_empty());
        assert_eq!(table.get(200), None);
    }

    #[test]
    fn test_from_counts() {
        let mut counts = [0u32; DIGIT_SLOTS];
        counts[1] = 3;
        counts[14] = 1;
        let table = DigitTable::from_counts(&counts, 4);
        assert_eq!(table.iter().collect::<Vec<_>>(), [(1, 0.75), (14, 0.25)]);
        assert!((table.total() - 1.0).abs() < 1e-12);
        assert_eq!(table.min_value(), Some(0.25));
        assert!(DigitTable::from_counts(&counts, 0).is_empty());
    }

    #[test]
    fn test_mod3_way() {
        let dist = Mod3Distribution { way_0: 0.5, way_1: 0.3, way_2: 0.2 };
        assert_eq!(dist.way(9), 0.5);
        assert_eq!(dist.way(13), 0.3);
        assert_eq!(dist.way(14), 0.2);
    }

    #[test]
    fn test_digit_table_serializes_as_map() {
        let mut table = DigitTable::new();
        table.insert(2, 0.5);
        table.insert(7, 0.5);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"2":0.5,"7":0.5}"#);
    }
}
