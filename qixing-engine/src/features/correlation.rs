use qixing_data::{DIGIT_SLOTS, Position};

use super::DigitTable;

/// Conditional frequencies P(digit at `to` | digit at `from`) for one
/// adjacent position pair, estimated from co-occurrence counts. Only
/// observed `from` digits have a row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CorrelationTable {
    pub from: Position,
    pub to: Position,
    pub rows: DigitTable<DigitTable<f64>>,
}

impl CorrelationTable {
    pub fn row(&self, from_digit: u8) -> Option<DigitTable<f64>> {
        self.rows.get(from_digit)
    }

    pub fn conditional(&self, from_digit: u8, to_digit: u8) -> Option<f64> {
        self.row(from_digit).and_then(|row| row.get(to_digit))
    }

    /// The `k` most frequent successors of `from_digit`, smaller digit first on ties.
    pub fn likely_successors(&self, from_digit: u8, k: usize) -> Vec<(u8, f64)> {
        let Some(row) = self.row(from_digit) else {
            return Vec::new();
        };
        let mut successors: Vec<(u8, f64)> = row.iter().collect();
        successors.sort_by(|a, b| b.1.total_cmp(&a.1));
        successors.truncate(k);
        successors
    }
}

/// Joint counts for one pair, filled during the single history pass.
pub(crate) struct PairAccumulator {
    from: Position,
    to: Position,
    joint: [[u32; DIGIT_SLOTS]; DIGIT_SLOTS],
    totals: [u32; DIGIT_SLOTS],
}

impl PairAccumulator {
    pub(crate) fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            joint: [[0; DIGIT_SLOTS]; DIGIT_SLOTS],
            totals: [0; DIGIT_SLOTS],
        }
    }

    pub(crate) fn observe(&mut self, digits: &[u8]) {
        let a = digits[self.from.index()] as usize;
        let b = digits[self.to.index()] as usize;
        self.joint[a][b] += 1;
        self.totals[a] += 1;
    }

    pub(crate) fn finish(self) -> CorrelationTable {
        let mut rows = DigitTable::new();
        for (a, &total) in self.totals.iter().enumerate() {
            if total > 0 {
                rows.insert(a as u8, DigitTable::from_counts(&self.joint[a], total));
            }
        }
        CorrelationTable {
            from: self.from,
            to: self.to,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[u8; 7]]) -> CorrelationTable {
        let mut acc = PairAccumulator::new(Position::ALL[0], Position::ALL[1]);
        for digits in rows {
            acc.observe(digits);
        }
        acc.finish()
    }

    #[test]
    fn test_conditional_frequencies() {
        let table = table(&[
            [1, 2, 0, 0, 0, 0, 0],
            [1, 2, 0, 0, 0, 0, 0],
            [1, 5, 0, 0, 0, 0, 0],
            [3, 9, 0, 0, 0, 0, 0],
        ]);
        assert!((table.conditional(1, 2).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((table.conditional(1, 5).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(table.conditional(3, 9), Some(1.0));
        assert_eq!(table.conditional(1, 9), None);
        assert!(table.row(0).is_none());
    }

    #[test]
    fn test_rows_sum_to_one() {
        let table = table(&[
            [4, 1, 0, 0, 0, 0, 0],
            [4, 2, 0, 0, 0, 0, 0],
            [4, 3, 0, 0, 0, 0, 0],
            [7, 3, 0, 0, 0, 0, 0],
        ]);
        for (_, row) in table.rows.iter() {
            assert!((row.total() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_likely_successors_tie_break() {
        let table = table(&[
            [1, 8, 0, 0, 0, 0, 0],
            [1, 3, 0, 0, 0, 0, 0],
            [1, 3, 0, 0, 0, 0, 0],
            [1, 6, 0, 0, 0, 0, 0],
        ]);
        let successors = table.likely_successors(1, 2);
        assert_eq!(successors[0], (3, 0.5));
        assert_eq!(successors[1].0, 6);
        assert!(table.likely_successors(9, 3).is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(table(&[]).rows.is_empty());
    }
}
