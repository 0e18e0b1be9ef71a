use chrono::Datelike;

use qixing_data::{DrawRecord, POSITION_COUNT, Position, RawDraw};

use crate::error::{EngineError, Result};

/// Expands every raw draw into positional digits and calendar fields.
/// Input order is preserved; the first malformed record aborts the load.
pub fn preprocess(raw: &[RawDraw]) -> Result<Vec<DrawRecord>> {
    raw.iter().map(preprocess_draw).collect()
}

pub fn preprocess_draw(raw: &RawDraw) -> Result<DrawRecord> {
    let digits = parse_digits(&raw.draw_id, &raw.numbers)?;
    Ok(DrawRecord {
        draw_id: raw.draw_id.clone(),
        draw_time: raw.draw_time,
        digits,
        weekday: raw.draw_time.weekday(),
        month: raw.draw_time.month(),
        year: raw.draw_time.year(),
    })
}

fn parse_digits(draw_id: &str, numbers: &str) -> Result<[u8; POSITION_COUNT]> {
    let tokens: Vec<&str> = numbers.split_whitespace().collect();
    if tokens.len() != POSITION_COUNT {
        return Err(EngineError::malformed(
            draw_id,
            format!("expected {} digits, found {} in {:?}", POSITION_COUNT, tokens.len(), numbers),
        ));
    }

    let mut digits = [0u8; POSITION_COUNT];
    for (position, token) in Position::ALL.into_iter().zip(tokens) {
        digits[position.index()] = token
            .parse()
            .map_err(|_| EngineError::malformed(draw_id, format!("invalid digit {:?} at {}", token, position)))?;
    }
    check_digits(draw_id, &digits)?;
    Ok(digits)
}

/// Every digit must lie in its position's range.
pub(crate) fn check_digits(draw_id: &str, digits: &[u8; POSITION_COUNT]) -> Result<()> {
    for position in Position::ALL {
        let digit = digits[position.index()];
        if !position.contains(digit) {
            return Err(EngineError::malformed(
                draw_id,
                format!("digit {} out of range 0-{} at {}", digit, position.max_digit(), position),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn raw(id: &str, numbers: &str) -> RawDraw {
        RawDraw {
            draw_id: id.to_string(),
            draw_time: NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(21, 25, 0)
                .unwrap(),
            numbers: numbers.to_string(),
        }
    }

    #[test]
    fn test_expands_digits_and_calendar() {
        let record = preprocess_draw(&raw("24027", "1 2 3 4 5 6 14")).unwrap();
        assert_eq!(record.digits, [1, 2, 3, 4, 5, 6, 14]);
        assert_eq!(record.weekday, Weekday::Sun);
        assert_eq!(record.month, 3);
        assert_eq!(record.year, 2024);
    }

    #[test]
    fn test_extra_whitespace_tolerated() {
        let record = preprocess_draw(&raw("1", "  0 0\t0 0 0  0 0 ")).unwrap();
        assert_eq!(record.digits, [0; 7]);
    }

    #[test]
    fn test_wrong_count_names_draw() {
        let err = preprocess_draw(&raw("24011", "1 2 3 4 5 6")).unwrap_err();
        match err {
            EngineError::MalformedRecord { draw_id, .. } => assert_eq!(draw_id, "24011"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(preprocess_draw(&raw("24011", "1 2 3 4 5 6 7 8")).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(preprocess_draw(&raw("1", "10 2 3 4 5 6 7")).is_err());
        assert!(preprocess_draw(&raw("1", "1 2 3 4 5 6 15")).is_err());
        assert!(preprocess_draw(&raw("1", "1 2 3 4 5 -6 7")).is_err());
        assert!(preprocess_draw(&raw("1", "1 2 3 4 5 x 7")).is_err());
    }

    #[test]
    fn test_whole_load_rejected_on_one_bad_record() {
        let draws = vec![raw("3", "1 2 3 4 5 6 7"), raw("2", "1 2 3"), raw("1", "1 2 3 4 5 6 7")];
        let err = preprocess(&draws).unwrap_err();
        assert!(err.to_string().contains("malformed record 2"), "{err}");
    }

    #[test]
    fn test_order_preserved() {
        let draws = vec![raw("1", "1 1 1 1 1 1 1"), raw("3", "3 3 3 3 3 3 3"), raw("2", "2 2 2 2 2 2 2")];
        let records = preprocess(&draws).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.draw_id.as_str()).collect();
        assert_eq!(ids, ["1", "3", "2"]);
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let first = preprocess_draw(&raw("24027", "9  0 3 0 0 0 12")).unwrap();
        let second = preprocess_draw(&RawDraw::from(&first)).unwrap();
        assert_eq!(first, second);
    }
}
