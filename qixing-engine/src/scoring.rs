use qixing_data::Position;
use serde::Serialize;

use crate::config::ScoringWeights;
use crate::features::{FeatureSnapshot, PositionFeatureSet};

/// Scores of every valid digit at one position, indexed by digit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBoard {
    pub position: Position,
    pub scores: Vec<f64>,
}

impl ScoreBoard {
    /// `(digit, score)` pairs in ascending digit order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.scores.iter().enumerate().map(|(d, &s)| (d as u8, s))
    }
}

/// Fixed-weight linear heuristic over one feature snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    snapshot: &'a FeatureSnapshot,
    weights: &'a ScoringWeights,
}

impl<'a> Scorer<'a> {
    pub fn new(snapshot: &'a FeatureSnapshot, weights: &'a ScoringWeights) -> Self {
        Self { snapshot, weights }
    }

    pub fn weights(&self) -> &'a ScoringWeights {
        self.weights
    }

    /// Score in `[0, max_score]`. The adjustments are summed in a fixed order
    /// and the running total is divided once at the end.
    pub fn score(&self, position: Position, digit: u8) -> f64 {
        let w = self.weights;
        let features = self.snapshot.position(position);

        let mut total = w.base;
        total += features.frequency.get(digit).unwrap_or(0.0) * w.frequency;

        let streak = features.missing_streak.get(digit).unwrap_or(0).min(w.streak_cap);
        total += streak as f64 * w.streak;

        if features.prev_repeat.get(digit).is_some_and(|count| count > 0) {
            total -= w.repeat_penalty;
        }

        if let Some(ratio) = features.big_small_ratio {
            let under_represented = if position.is_big(digit) {
                ratio.big_ratio < w.big_small_threshold
            } else {
                ratio.small_ratio < w.big_small_threshold
            };
            if under_represented {
                total += w.big_small_bonus;
            }
        }

        if let Some(ratio) = features.odd_even_ratio {
            let under_represented = if digit % 2 == 1 {
                ratio.odd_ratio < w.odd_even_threshold
            } else {
                ratio.even_ratio < w.odd_even_threshold
            };
            if under_represented {
                total += w.odd_even_bonus;
            }
        }

        if let Some(dist) = features.mod3_distribution {
            total += dist.way(digit % 3) * w.mod3;
        }

        total += self.span_frequency(features, position, digit) * w.span;

        if let Some(freq) = features.same_period_pattern.get(digit) {
            total += freq * w.same_period;
        }

        (total / w.divisor).clamp(0.0, w.max_score)
    }

    /// Historical frequency of the gap between `digit` and the previous draw's
    /// digit; falls back to the rarest observed gap, or a fixed floor.
    fn span_frequency(&self, features: &PositionFeatureSet, position: Position, digit: u8) -> f64 {
        let spans = &features.span_distribution;
        let fallback = || spans.min_value().unwrap_or(self.weights.span_fallback);
        match self.snapshot.previous_digit(position) {
            Some(previous) => spans.get(previous.abs_diff(digit)).unwrap_or_else(fallback),
            None => fallback(),
        }
    }

    pub fn score_board(&self, position: Position) -> ScoreBoard {
        ScoreBoard {
            position,
            scores: position.digits().map(|d| self.score(position, d)).collect(),
        }
    }
}
