use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::matrix::MatrixError;
use crate::core::models::structure::StructureError;
use crate::core::scoring::accuracy::ScoringError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid probability matrix: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),

    #[error("Expected-accuracy scoring failed: {source}")]
    Scoring {
        #[from]
        source: ScoringError,
    },

    #[error("Traceback failed at interval ({i}, {j}): {reason}")]
    Traceback { i: usize, j: usize, reason: String },
}
