use qixing_data::{DIGIT_SLOTS, POSITION_COUNT, Position};

use super::correlation::PairAccumulator;
use super::{BigSmallRatio, DigitTable, FeatureSnapshot, Mod3Distribution, OddEvenRatio, PositionFeatureSet};
use crate::history::DrawHistory;

/// Length of the draw id suffix that defines a "same period" draw.
pub const PERIOD_SUFFIX_LEN: usize = 3;

/// Running aggregates for one position, updated draw by draw from the
/// newest draw to the oldest.
struct PositionAccumulator {
    position: Position,
    total: u32,
    counts: [u32; DIGIT_SLOTS],
    seen: [bool; DIGIT_SLOTS],
    streaks: [u32; DIGIT_SLOTS],
    previous: Option<u8>,
    repeats: [u32; DIGIT_SLOTS],
    spans: [u32; DIGIT_SLOTS],
    span_total: u32,
    big: u32,
    odd: u32,
    ways: [u32; 3],
    same_period: [u32; DIGIT_SLOTS],
    same_period_total: u32,
}

impl PositionAccumulator {
    fn new(position: Position) -> Self {
        Self {
            position,
            total: 0,
            counts: [0; DIGIT_SLOTS],
            seen: [false; DIGIT_SLOTS],
            streaks: [0; DIGIT_SLOTS],
            previous: None,
            repeats: [0; DIGIT_SLOTS],
            spans: [0; DIGIT_SLOTS],
            span_total: 0,
            big: 0,
            odd: 0,
            ways: [0; 3],
            same_period: [0; DIGIT_SLOTS],
            same_period_total: 0,
        }
    }

    fn observe(&mut self, digit: u8, same_period: bool) {
        let idx = digit as usize;

        // A digit's streak grows until its newest occurrence, then freezes.
        for d in self.position.digits() {
            let d = d as usize;
            if self.seen[d] {
                continue;
            }
            if d == idx {
                self.seen[d] = true;
            } else {
                self.streaks[d] += 1;
            }
        }

        if let Some(previous) = self.previous {
            if previous == digit {
                self.repeats[idx] += 1;
            }
            self.spans[previous.abs_diff(digit) as usize] += 1;
            self.span_total += 1;
        }
        self.previous = Some(digit);

        self.total += 1;
        self.counts[idx] += 1;
        if self.position.is_big(digit) {
            self.big += 1;
        }
        if digit % 2 == 1 {
            self.odd += 1;
        }
        self.ways[(digit % 3) as usize] += 1;

        if same_period {
            self.same_period[idx] += 1;
            self.same_period_total += 1;
        }
    }

    fn finish(self, period_known: bool) -> PositionFeatureSet {
        let total = self.total as f64;
        let ratios = (self.total > 0).then(|| {
            (
                BigSmallRatio {
                    big_ratio: self.big as f64 / total,
                    small_ratio: (self.total - self.big) as f64 / total,
                },
                OddEvenRatio {
                    odd_ratio: self.odd as f64 / total,
                    even_ratio: (self.total - self.odd) as f64 / total,
                },
                Mod3Distribution {
                    way_0: self.ways[0] as f64 / total,
                    way_1: self.ways[1] as f64 / total,
                    way_2: self.ways[2] as f64 / total,
                },
            )
        });

        let mut missing_streak = DigitTable::new();
        for d in self.position.digits() {
            missing_streak.insert(d, self.streaks[d as usize]);
        }

        let mut prev_repeat = DigitTable::new();
        for (d, &count) in self.repeats.iter().enumerate() {
            if count > 0 {
                prev_repeat.insert(d as u8, count);
            }
        }

        let same_period_pattern = if period_known {
            DigitTable::from_counts(&self.same_period, self.same_period_total)
        } else {
            DigitTable::new()
        };

        PositionFeatureSet {
            position: self.position,
            frequency: DigitTable::from_counts(&self.counts, self.total),
            missing_streak,
            prev_repeat,
            big_small_ratio: ratios.map(|r| r.0),
            odd_even_ratio: ratios.map(|r| r.1),
            mod3_distribution: ratios.map(|r| r.2),
            span_distribution: DigitTable::from_counts(&self.spans, self.span_total),
            same_period_pattern,
        }
    }
}

/// Trailing `PERIOD_SUFFIX_LEN` characters, or `None` for shorter ids.
pub fn period_suffix(draw_id: &str) -> Option<&str> {
    let (start, _) = draw_id.char_indices().rev().nth(PERIOD_SUFFIX_LEN - 1)?;
    Some(&draw_id[start..])
}

/// Computes every position's feature set and the adjacent-pair correlation
/// tables in a single newest-to-oldest traversal of `history`.
pub fn compute_features(history: &DrawHistory) -> FeatureSnapshot {
    let latest = history.latest();
    let suffix = latest.and_then(|r| period_suffix(&r.draw_id));
    if let (Some(latest), None) = (latest, suffix) {
        tracing::warn!(draw_id = %latest.draw_id, "draw id too short for same-period pattern, signal skipped");
    }

    let mut positions: Vec<PositionAccumulator> = Position::ALL.into_iter().map(PositionAccumulator::new).collect();
    let mut pairs: Vec<PairAccumulator> = Position::ALL
        .into_iter()
        .filter_map(|p| p.next().map(|next| PairAccumulator::new(p, next)))
        .collect();

    for record in history.records() {
        let same_period = suffix.is_some() && period_suffix(&record.draw_id) == suffix;
        for acc in &mut positions {
            acc.observe(record.digit(acc.position), same_period);
        }
        for pair in &mut pairs {
            pair.observe(&record.digits);
        }
    }

    let snapshot = FeatureSnapshot {
        history_len: history.len(),
        latest_digits: latest.map(|r| r.digits),
        positions: positions.into_iter().map(|acc| acc.finish(suffix.is_some())).collect(),
        correlations: pairs.into_iter().map(PairAccumulator::finish).collect(),
    };
    debug_assert_eq!(snapshot.positions.len(), POSITION_COUNT);

    tracing::debug!(
        draws = snapshot.history_len,
        pairs = snapshot.correlations.len(),
        "features computed"
    );
    snapshot
}
