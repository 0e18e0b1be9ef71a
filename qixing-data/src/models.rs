use std::fmt;
use std::ops::RangeInclusive;

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize, Serializer};

/// Number of positional digits in a draw.
pub const POSITION_COUNT: usize = 7;

/// Widest digit range of any position (position 7 spans 0-14).
pub const DIGIT_SLOTS: usize = 15;

/// One of the 7 slots of a draw, stored 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u8);

impl Position {
    pub const ALL: [Position; POSITION_COUNT] = [
        Position(0),
        Position(1),
        Position(2),
        Position(3),
        Position(4),
        Position(5),
        Position(6),
    ];

    /// Builds a position from its 1-based number.
    pub fn new(number: usize) -> Option<Self> {
        if (1..=POSITION_COUNT).contains(&number) {
            Some(Position((number - 1) as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn number(self) -> usize {
        self.0 as usize + 1
    }

    pub fn max_digit(self) -> u8 {
        match self.0 {
            6 => 14,
            _ => 9,
        }
    }

    pub fn size(self) -> usize {
        self.max_digit() as usize + 1
    }

    /// Digits strictly above this value count as "big".
    pub fn midpoint(self) -> u8 {
        self.max_digit() / 2
    }

    pub fn is_big(self, digit: u8) -> bool {
        digit > self.midpoint()
    }

    pub fn digits(self) -> RangeInclusive<u8> {
        0..=self.max_digit()
    }

    pub fn contains(self, digit: u8) -> bool {
        digit <= self.max_digit()
    }

    /// The adjacent position to the right, if any.
    pub fn next(self) -> Option<Position> {
        Position::new(self.number() + 1)
    }
}

/// Serialized as its 1-based number.
impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number() as u8)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// A draw as delivered by the record store, before positional expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDraw {
    pub draw_id: String,
    pub draw_time: NaiveDateTime,
    /// Seven whitespace-separated integers, e.g. `"1 2 3 4 5 6 13"`.
    pub numbers: String,
}

/// A draw expanded into positional digits with calendar fields attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub draw_id: String,
    pub draw_time: NaiveDateTime,
    pub digits: [u8; POSITION_COUNT],
    pub weekday: Weekday,
    pub month: u32,
    pub year: i32,
}

impl DrawRecord {
    pub fn digit(&self, position: Position) -> u8 {
        self.digits[position.index()]
    }

    pub fn numbers_string(&self) -> String {
        self.digits
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&DrawRecord> for RawDraw {
    fn from(record: &DrawRecord) -> Self {
        RawDraw {
            draw_id: record.draw_id.clone(),
            draw_time: record.draw_time,
            numbers: record.numbers_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_position_ranges() {
        for position in Position::ALL.iter().take(6) {
            assert_eq!(position.max_digit(), 9);
            assert_eq!(position.size(), 10);
            assert_eq!(position.midpoint(), 4);
        }
        let last = Position::ALL[6];
        assert_eq!(last.max_digit(), 14);
        assert_eq!(last.size(), DIGIT_SLOTS);
        assert_eq!(last.midpoint(), 7);
    }

    #[test]
    fn test_position_numbering() {
        assert_eq!(Position::new(0), None);
        assert_eq!(Position::new(8), None);
        assert_eq!(Position::new(1).unwrap().index(), 0);
        assert_eq!(Position::new(7).unwrap().number(), 7);
        assert_eq!(Position::new(6).unwrap().next(), Position::new(7));
        assert_eq!(Position::new(7).unwrap().next(), None);
        assert_eq!(Position::new(3).unwrap().to_string(), "P3");
    }

    #[test]
    fn test_big_small_split() {
        let first = Position::ALL[0];
        assert!(!first.is_big(4));
        assert!(first.is_big(5));
        let last = Position::ALL[6];
        assert!(!last.is_big(7));
        assert!(last.is_big(8));
    }

    #[test]
    fn test_contains() {
        assert!(Position::ALL[0].contains(9));
        assert!(!Position::ALL[0].contains(10));
        assert!(Position::ALL[6].contains(14));
        assert!(!Position::ALL[6].contains(15));
    }

    #[test]
    fn test_raw_from_record() {
        let draw_time = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(21, 25, 0)
            .unwrap();
        let record = DrawRecord {
            draw_id: "24001".to_string(),
            draw_time,
            digits: [1, 2, 3, 4, 5, 6, 14],
            weekday: Weekday::Tue,
            month: 1,
            year: 2024,
        };
        let raw = RawDraw::from(&record);
        assert_eq!(raw.draw_id, "24001");
        assert_eq!(raw.numbers, "1 2 3 4 5 6 14");
        assert_eq!(raw.draw_time, draw_time);
    }
}
