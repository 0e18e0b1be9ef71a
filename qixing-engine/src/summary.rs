use std::collections::BTreeSet;

use serde::Serialize;

use qixing_data::{DrawRecord, POSITION_COUNT, Position};

/// Shape of a single draw across its 7 digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawSummary {
    pub draw_id: String,
    pub sum: u32,
    /// Largest digit minus smallest digit.
    pub spread: u8,
    pub big: usize,
    pub small: usize,
    pub odd: usize,
    pub even: usize,
    pub ways: [usize; 3],
    /// Digits beyond the first occurrence of each distinct value.
    pub repeated: usize,
}

impl DrawSummary {
    pub fn of(record: &DrawRecord) -> Self {
        let digits = &record.digits;
        let big = Position::ALL
            .into_iter()
            .filter(|&p| p.is_big(record.digit(p)))
            .count();
        let odd = digits.iter().filter(|&&d| d % 2 == 1).count();
        let mut ways = [0usize; 3];
        for &d in digits {
            ways[(d % 3) as usize] += 1;
        }
        let distinct: BTreeSet<u8> = digits.iter().copied().collect();
        let max = digits.iter().copied().max().unwrap_or(0);
        let min = digits.iter().copied().min().unwrap_or(0);

        Self {
            draw_id: record.draw_id.clone(),
            sum: digits.iter().map(|&d| d as u32).sum(),
            spread: max - min,
            big,
            small: POSITION_COUNT - big,
            odd,
            even: POSITION_COUNT - odd,
            ways,
            repeated: POSITION_COUNT - distinct.len(),
        }
    }
}
