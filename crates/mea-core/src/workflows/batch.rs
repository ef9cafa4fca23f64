use crate::core::models::matrix::ProbabilityMatrix;
use crate::core::models::structure::Structure;
use crate::engine::config::MeaConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::workflows::predict;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Predicts every matrix independently with the same configuration.
///
/// Each prediction owns its own tables, so with the `parallel` feature the matrices are
/// processed on the rayon thread pool. Results keep the input order.
#[instrument(skip_all, name = "batch_prediction", fields(count = matrices.len()))]
pub fn predict_batch(
    matrices: &[ProbabilityMatrix],
    config: &MeaConfig,
) -> Vec<Result<Structure, EngineError>> {
    #[cfg(not(feature = "parallel"))]
    let iterator = matrices.iter();

    #[cfg(feature = "parallel")]
    let iterator = matrices.par_iter();

    let results: Vec<_> = iterator
        .map(|matrix| predict::run(matrix, config, &ProgressReporter::new()))
        .collect();

    info!(
        "Batch complete: {} of {} predictions succeeded.",
        results.iter().filter(|r| r.is_ok()).count(),
        results.len()
    );
    results
}
