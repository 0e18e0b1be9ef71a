use qixing_data::{DrawRecord, RawDraw};

use crate::error::{EngineError, Result};
use crate::preprocess::{check_digits, preprocess};

/// Immutable snapshot of the preprocessed history, newest draw first.
#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    records: Vec<DrawRecord>,
}

pub(crate) fn parse_draw_id(draw_id: &str) -> Result<u64> {
    match draw_id.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(EngineError::InvalidDrawId(draw_id.to_string())),
    }
}

impl DrawHistory {
    /// Sorts records descending by numeric draw id and rejects duplicates
    /// and out-of-range digits.
    pub fn new(records: Vec<DrawRecord>) -> Result<Self> {
        let mut keyed = records
            .into_iter()
            .map(|r| {
                check_digits(&r.draw_id, &r.digits)?;
                parse_draw_id(&r.draw_id).map(|id| (id, r))
            })
            .collect::<Result<Vec<_>>>()?;

        keyed.sort_by(|a, b| b.0.cmp(&a.0));

        if let Some(pair) = keyed.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(EngineError::DuplicateDrawId(pair[1].1.draw_id.clone()));
        }

        let records: Vec<DrawRecord> = keyed.into_iter().map(|(_, r)| r).collect();
        tracing::debug!(
            draws = records.len(),
            latest = records.first().map(|r| r.draw_id.as_str()).unwrap_or("-"),
            "history snapshot built"
        );
        Ok(Self { records })
    }

    pub fn from_raw(raw: &[RawDraw]) -> Result<Self> {
        Self::new(preprocess(raw)?)
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&DrawRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// History built from `(draw_id, digits)` rows; draw times advance three
/// days per id from a fixed date.
#[cfg(test)]
pub(crate) fn test_history(rows: &[(u64, [u8; 7])]) -> DrawHistory {
    DrawHistory::new(rows.iter().map(|&(id, digits)| test_record(id, digits)).collect()).unwrap()
}

#[cfg(test)]
pub(crate) fn test_record(id: u64, digits: [u8; 7]) -> DrawRecord {
    use chrono::{Datelike, NaiveDate, TimeDelta};

    let origin = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(21, 25, 0).unwrap();
    let draw_time = origin + TimeDelta::days(3 * id as i64);
    DrawRecord {
        draw_id: id.to_string(),
        draw_time,
        digits,
        weekday: draw_time.weekday(),
        month: draw_time.month(),
        year: draw_time.year(),
    }
}

/// `n` pseudo-varied draws with ids `n..=1`.
#[cfg(test)]
pub(crate) fn make_test_history(n: usize) -> DrawHistory {
    let rows: Vec<(u64, [u8; 7])> = (1..=n as u64)
        .map(|id| {
            let base = id * 7 + id / 3;
            let digits = [
                base % 10,
                (base / 2) % 10,
                (base * 3 + 1) % 10,
                id % 10,
                (base + 5) % 10,
                (id * 11 / 7) % 10,
                (base * 2) % 15,
            ];
            (id, digits.map(|d| d as u8))
        })
        .collect();
    test_history(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qixing_data::Position;

    #[test]
    fn test_sorted_newest_first() {
        let history = test_history(&[(101, [0; 7]), (103, [1; 7]), (102, [2; 7])]);
        let ids: Vec<&str> = history.records().iter().map(|r| r.draw_id.as_str()).collect();
        assert_eq!(ids, ["103", "102", "101"]);
        assert_eq!(history.latest().unwrap().draw_id, "103");
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let history = test_history(&[(99, [0; 7]), (100, [1; 7])]);
        assert_eq!(history.latest().unwrap().draw_id, "100");
    }

    #[test]
    fn test_duplicate_rejected() {
        let records = vec![test_record(5, [0; 7]), test_record(5, [1; 7])];
        assert!(matches!(DrawHistory::new(records), Err(EngineError::DuplicateDrawId(id)) if id == "5"));
    }

    #[test]
    fn test_invalid_id_rejected() {
        let mut record = test_record(5, [0; 7]);
        record.draw_id = "24a01".to_string();
        assert!(matches!(DrawHistory::new(vec![record]), Err(EngineError::InvalidDrawId(_))));
        let mut record = test_record(5, [0; 7]);
        record.draw_id = "0".to_string();
        assert!(matches!(DrawHistory::new(vec![record]), Err(EngineError::InvalidDrawId(_))));
    }

    #[test]
    fn test_out_of_range_digit_rejected() {
        let mut record = test_record(24001, [1, 2, 3, 4, 5, 6, 14]);
        record.digits[6] = 15;
        match DrawHistory::new(vec![test_record(24002, [0; 7]), record]) {
            Err(EngineError::MalformedRecord { draw_id, .. }) => assert_eq!(draw_id, "24001"),
            other => panic!("expected malformed record, got {:?}", other.map(|h| h.len())),
        }

        let mut record = test_record(24003, [0; 7]);
        record.digits[0] = 10;
        assert!(matches!(DrawHistory::new(vec![record]), Err(EngineError::MalformedRecord { .. })));
    }

    #[test]
    fn test_empty() {
        let history = DrawHistory::new(Vec::new()).unwrap();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_make_test_history_valid() {
        let history = make_test_history(60);
        assert_eq!(history.len(), 60);
        for record in history.records() {
            for position in Position::ALL {
                assert!(position.contains(record.digit(position)));
            }
        }
    }
}
