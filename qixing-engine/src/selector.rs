use rand::SeedableRng;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;

use qixing_data::{POSITION_COUNT, Position};

use crate::config::ScoringWeights;
use crate::error::Result;
use crate::features::{FeatureSnapshot, compute_features};
use crate::history::DrawHistory;
use crate::schedule::{DrawSchedule, NextDraw};
use crate::scoring::Scorer;

pub const TOP_K: usize = 3;
pub const DEFAULT_COMBINATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub digit: u8,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionPrediction {
    pub position: Position,
    /// Best first.
    pub candidates: Vec<Candidate>,
    /// Mean score of the candidates over the maximum score, in `[0, 1]`.
    pub confidence: f64,
}

impl PositionPrediction {
    pub fn digits(&self) -> Vec<u8> {
        self.candidates.iter().map(|c| c.digit).collect()
    }

    /// Sampling weights: the confidence for rank 1, the remainder split evenly.
    pub fn sampling_weights(&self) -> Vec<f64> {
        let rest = self.candidates.len().saturating_sub(1);
        (0..self.candidates.len())
            .map(|rank| {
                if rank == 0 {
                    self.confidence
                } else {
                    (1.0 - self.confidence) / rest as f64
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub positions: Vec<PositionPrediction>,
    pub combinations: Vec<[u8; POSITION_COUNT]>,
    /// `None` on an empty history.
    pub next_draw: Option<NextDraw>,
}

/// Ranks candidate digits per position from a scored snapshot.
pub struct Selector<'a> {
    scorer: Scorer<'a>,
}

impl<'a> Selector<'a> {
    pub fn new(scorer: Scorer<'a>) -> Self {
        Self { scorer }
    }

    /// Top candidates by descending score; equal scores keep the smaller digit first.
    pub fn predict_position(&self, position: Position) -> PositionPrediction {
        let board = self.scorer.score_board(position);
        let mut ranked: Vec<Candidate> = board
            .entries()
            .map(|(digit, score)| Candidate { digit, score })
            .collect();
        // Stable sort over ascending digits.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(TOP_K);

        let max_total = self.scorer.weights().max_score * TOP_K as f64;
        let confidence = (ranked.iter().map(|c| c.score).sum::<f64>() / max_total).clamp(0.0, 1.0);

        PositionPrediction {
            position,
            candidates: ranked,
            confidence,
        }
    }

    /// Positions are independent, so they are ranked in parallel.
    pub fn predict_all(&self) -> Vec<PositionPrediction> {
        Position::ALL
            .par_iter()
            .map(|&position| self.predict_position(position))
            .collect()
    }
}

/// Draws `count` full combinations, each digit sampled from its position's
/// candidates with the confidence-derived weights. `seed` makes the output
/// reproducible.
pub fn generate_combinations(
    predictions: &[PositionPrediction],
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<[u8; POSITION_COUNT]>> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let samplers = predictions
        .iter()
        .map(|p| Ok((p.position, p.digits(), WeightedIndex::new(p.sampling_weights())?)))
        .collect::<Result<Vec<_>>>()?;

    let mut combinations = Vec::with_capacity(count);
    for _ in 0..count {
        let mut combination = [0u8; POSITION_COUNT];
        for (position, digits, dist) in &samplers {
            combination[position.index()] = digits[dist.sample(&mut rng)];
        }
        combinations.push(combination);
    }
    Ok(combinations)
}

/// One full prediction run over a history snapshot.
#[derive(Debug, Clone, Default)]
pub struct Predictor {
    pub weights: ScoringWeights,
    pub schedule: DrawSchedule,
}

impl Predictor {
    pub fn new(weights: ScoringWeights, schedule: DrawSchedule) -> Self {
        Self { weights, schedule }
    }

    pub fn predict(&self, history: &DrawHistory, count: usize, seed: Option<u64>) -> Result<Prediction> {
        let snapshot = compute_features(history);
        self.predict_from(&snapshot, history, count, seed)
    }

    pub fn predict_from(
        &self,
        snapshot: &FeatureSnapshot,
        history: &DrawHistory,
        count: usize,
        seed: Option<u64>,
    ) -> Result<Prediction> {
        let selector = Selector::new(Scorer::new(snapshot, &self.weights));
        let positions = selector.predict_all();
        let combinations = generate_combinations(&positions, count, seed)?;
        let next_draw = history
            .latest()
            .map(|latest| self.schedule.next_draw(latest))
            .transpose()?;

        tracing::info!(
            draws = history.len(),
            combinations = combinations.len(),
            next = next_draw.as_ref().map(|n| n.draw_id.as_str()).unwrap_or("-"),
            "prediction complete"
        );

        Ok(Prediction {
            positions,
            combinations,
            next_draw,
        })
    }
}
