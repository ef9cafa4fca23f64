use crate::core::models::matrix::ProbabilityMatrix;
use crate::core::models::structure::{PairingMatrix, Structure};
use crate::core::scoring::accuracy::{AccuracyScorer, AccuracyStats};
use crate::engine::config::MeaConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::workflows::predict::MeaPredictor;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub structure: Structure,
    pub stats: AccuracyStats,
    pub optimal_weight: f64,
}

/// Scores any binary pairing matrix against the probability matrix.
#[instrument(skip_all, name = "score_workflow", fields(n = matrix.size()))]
pub fn score(
    matrix: &ProbabilityMatrix,
    pairing: &PairingMatrix,
) -> Result<AccuracyStats, EngineError> {
    let stats = AccuracyScorer::new(matrix).score(pairing)?;
    info!(
        sensitivity = stats.sensitivity,
        ppv = stats.ppv,
        mcc = stats.mcc,
        f_score = stats.f_score,
        "Expected accuracy computed."
    );
    Ok(stats)
}

/// Scores a structure given in dot-bracket notation.
pub fn score_dot_bracket(
    matrix: &ProbabilityMatrix,
    dot_bracket: &str,
) -> Result<AccuracyStats, EngineError> {
    let structure = Structure::from_dot_bracket(dot_bracket)?;
    score(matrix, structure.pairing_matrix())
}

/// Predicts the MEA structure and scores it against the same matrix.
pub fn predict_and_score(
    matrix: &ProbabilityMatrix,
    config: &MeaConfig,
    reporter: &ProgressReporter,
) -> Result<Evaluation, EngineError> {
    let mut predictor = MeaPredictor::new(matrix, *config)?;
    predictor.run(reporter)?;
    let stats = predictor.score_expected()?;
    let optimal_weight = predictor.optimal_weight().unwrap_or_default();
    Ok(Evaluation {
        structure: predictor.into_structure()?,
        stats,
        optimal_weight,
    })
}
