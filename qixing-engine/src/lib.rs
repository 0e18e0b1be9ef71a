//! Statistical summarization of a seven-position draw history: per-position
//! features, a fixed-weight scoring heuristic, and top-candidate selection.
//!
//! Everything is recomputed from an immutable [`DrawHistory`] snapshot on
//! each run. Nothing here claims predictive power over the next draw.

pub mod config;
pub mod error;
pub mod features;
pub mod history;
pub mod preprocess;
pub mod schedule;
pub mod scoring;
pub mod selector;
pub mod summary;

pub use config::ScoringWeights;
pub use error::{EngineError, Result};
pub use features::{FeatureSnapshot, PositionFeatureSet, compute_features};
pub use history::DrawHistory;
pub use preprocess::preprocess;
pub use schedule::{DrawSchedule, NextDraw};
pub use scoring::{ScoreBoard, Scorer};
pub use selector::{Prediction, PositionPrediction, Predictor, Selector, generate_combinations};
pub use summary::DrawSummary;
