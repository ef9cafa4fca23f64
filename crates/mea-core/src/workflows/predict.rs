use crate::core::models::matrix::ProbabilityMatrix;
use crate::core::models::structure::Structure;
use crate::core::scoring::accuracy::{AccuracyScorer, AccuracyStats};
use crate::engine::config::MeaConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tables::DpTables;
use crate::engine::tasks::{fill, traceback};
use tracing::{debug, info, instrument};

/// MEA prediction over one probability matrix.
///
/// The matrix and configuration are fixed at construction. The first call that needs a
/// result fills the tables and runs the traceback; later calls reuse the frozen result.
#[derive(Debug)]
pub struct MeaPredictor<'a> {
    matrix: &'a ProbabilityMatrix,
    config: MeaConfig,
    tables: Option<DpTables>,
    structure: Option<Structure>,
}

impl<'a> MeaPredictor<'a> {
    pub fn new(matrix: &'a ProbabilityMatrix, config: MeaConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            matrix,
            config,
            tables: None,
            structure: None,
        })
    }

    pub fn config(&self) -> &MeaConfig {
        &self.config
    }

    pub fn is_evaluated(&self) -> bool {
        self.structure.is_some()
    }

    /// Runs the recurrence and traceback unless a result already exists.
    #[instrument(skip_all, name = "mea_prediction", fields(n = self.matrix.size()))]
    pub fn run(&mut self, reporter: &ProgressReporter) -> Result<&Structure, EngineError> {
        let structure = match self.structure.take() {
            Some(structure) => structure,
            None => self.evaluate(reporter)?,
        };
        Ok(self.structure.insert(structure))
    }

    /// The predicted structure, evaluating silently if needed.
    pub fn structure(&mut self) -> Result<&Structure, EngineError> {
        self.run(&ProgressReporter::new())
    }

    /// The frozen DP tables, available once the predictor has been evaluated.
    pub fn tables(&self) -> Option<&DpTables> {
        self.tables.as_ref()
    }

    /// `W[0, N-1]` of the evaluated tables.
    pub fn optimal_weight(&self) -> Option<f64> {
        self.tables.as_ref().map(DpTables::optimal_weight)
    }

    /// Expected-accuracy statistics of the predicted structure against its own matrix.
    pub fn score_expected(&mut self) -> Result<AccuracyStats, EngineError> {
        let matrix = self.matrix;
        let structure = self.structure()?;
        let stats = AccuracyScorer::new(matrix).score(structure.pairing_matrix())?;
        Ok(stats)
    }

    pub fn into_structure(mut self) -> Result<Structure, EngineError> {
        self.structure()?;
        self.structure.take().ok_or_else(|| EngineError::Traceback {
            i: 0,
            j: self.matrix.size().saturating_sub(1),
            reason: "prediction produced no structure".to_string(),
        })
    }

    fn evaluate(&mut self, reporter: &ProgressReporter) -> Result<Structure, EngineError> {
        let n = self.matrix.size();
        info!(
            "Predicting MEA structure for {} positions (gamma = {}).",
            n, self.config.gamma
        );

        let tables = reporter.phase("Filling weight table", || {
            fill::run(self.matrix, &self.config, reporter)
        });
        if !reporter.is_silent() {
            reporter.report(Progress::Message(format!(
                "Optimal weight W[0, {}] = {:.6}",
                n.saturating_sub(1),
                tables.optimal_weight()
            )));
        }
        let pairs = reporter.phase("Tracing back", || {
            traceback::run(&tables, self.config.split_search)
        })?;
        let structure = Structure::from_pairs(n, pairs)?;

        debug!(
            num_pairs = structure.num_pairs(),
            optimal_weight = tables.optimal_weight(),
            "Prediction complete: {}",
            structure.dot_bracket()
        );
        self.tables = Some(tables);
        Ok(structure)
    }
}

/// Predicts the MEA structure of `matrix` with the given γ and default settings otherwise.
pub fn predict(matrix: &ProbabilityMatrix, gamma: f64) -> Result<Structure, EngineError> {
    run(matrix, &MeaConfig::with_gamma(gamma)?, &ProgressReporter::new())
}

pub fn run(
    matrix: &ProbabilityMatrix,
    config: &MeaConfig,
    reporter: &ProgressReporter,
) -> Result<Structure, EngineError> {
    let mut predictor = MeaPredictor::new(matrix, *config)?;
    predictor.run(reporter)?;
    predictor.into_structure()
}
