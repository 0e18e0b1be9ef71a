use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The digit field did not yield exactly 7 in-range integers.
    #[error("malformed record {draw_id}: {reason}")]
    MalformedRecord { draw_id: String, reason: String },

    #[error("duplicate draw id {0}")]
    DuplicateDrawId(String),

    #[error("invalid draw id {0:?}: expected a positive integer")]
    InvalidDrawId(String),

    #[error("weighted sampling failed: {0}")]
    Sampling(#[from] rand::distr::weighted::Error),

    #[error("weights file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EngineError {
    pub(crate) fn malformed(draw_id: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedRecord {
            draw_id: draw_id.to_string(),
            reason: reason.into(),
        }
    }
}
