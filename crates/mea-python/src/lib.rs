use meafold::core::models::matrix::ProbabilityMatrix;
use meafold::core::models::structure::{BasePair, PairingMatrix, Structure, StructureError};
use meafold::engine::config::{HairpinRule, MeaConfig, MeaConfigBuilder};
use meafold::engine::error::EngineError;
use meafold::engine::progress::ProgressReporter;
use meafold::workflows::{evaluate, predict::MeaPredictor};
use nalgebra::DMatrix;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

type Rows = Vec<Vec<f64>>;

fn engine_err(e: EngineError) -> PyErr {
    match e {
        EngineError::Traceback { .. } => PyRuntimeError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn probability_matrix(bpps: &[Vec<f64>]) -> PyResult<ProbabilityMatrix> {
    ProbabilityMatrix::from_rows(bpps).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Accepts either a symmetric 0/1 matrix or the upper-triangular form where only
/// `m[i][j]` with `i < j` is set, which is mirrored.
fn pairing_matrix(rows: &[Vec<f64>]) -> Result<PairingMatrix, StructureError> {
    let n = rows.len();
    if let Some(row) = rows.iter().find(|row| row.len() != n) {
        return Err(StructureError::NotSquare {
            rows: n,
            cols: row.len(),
        });
    }
    let upper_only = (0..n).all(|i| (0..i).all(|j| rows[i][j] == 0.0));
    let data = DMatrix::from_fn(n, n, |i, j| {
        if upper_only && i > j {
            rows[j][i]
        } else {
            rows[i][j]
        }
    });
    PairingMatrix::new(data)
}

fn config(gamma: f64, min_hairpin_span: usize, strict_hairpin: bool) -> PyResult<MeaConfig> {
    let rule = if strict_hairpin {
        HairpinRule::Strict
    } else {
        HairpinRule::Soft
    };
    MeaConfigBuilder::new()
        .gamma(gamma)
        .min_hairpin_span(min_hairpin_span)
        .hairpin_rule(rule)
        .build()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

fn to_rows(matrix: &DMatrix<f64>) -> Rows {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Maximum expected accuracy structure of a base-pairing probability matrix.
///
/// The structure is predicted on construction; the object is read-only afterwards.
#[pyclass(name = "MEA", frozen)]
pub struct PyMea {
    matrix: ProbabilityMatrix,
    structure: Structure,
    weights: DMatrix<f64>,
    #[pyo3(get)]
    gamma: f64,
}

#[pymethods]
impl PyMea {
    #[new]
    #[pyo3(signature = (bpps, gamma=1.0, min_hairpin_span=3, strict_hairpin=false))]
    fn new(
        bpps: Rows,
        gamma: f64,
        min_hairpin_span: usize,
        strict_hairpin: bool,
    ) -> PyResult<Self> {
        let matrix = probability_matrix(&bpps)?;
        let config = config(gamma, min_hairpin_span, strict_hairpin)?;

        let mut predictor = MeaPredictor::new(&matrix, config).map_err(engine_err)?;
        predictor
            .run(&ProgressReporter::new())
            .map_err(engine_err)?;
        let weights = predictor
            .tables()
            .map(|tables| tables.weights().clone())
            .unwrap_or_else(|| DMatrix::zeros(matrix.size(), matrix.size()));
        let structure = predictor.into_structure().map_err(engine_err)?;

        Ok(Self {
            matrix,
            structure,
            weights,
            gamma,
        })
    }

    #[getter(N)]
    fn length(&self) -> usize {
        self.matrix.size()
    }

    /// Predicted base pairs `(i, j)`, sorted by `i`.
    #[getter]
    fn bp_list(&self) -> Vec<BasePair> {
        self.structure.pairs().to_vec()
    }

    #[getter]
    fn structure(&self) -> String {
        self.structure.dot_bracket().to_string()
    }

    /// Symmetric 0/1 matrix of the predicted pairs.
    #[getter]
    fn bp_matrix(&self) -> Rows {
        to_rows(self.structure.pairing_matrix().as_matrix())
    }

    /// The filled weight table `W`; `W[0][N-1]` is the optimal objective.
    #[getter(W)]
    fn weights(&self) -> Rows {
        to_rows(&self.weights)
    }

    /// Expected `[sensitivity, ppv, mcc, f_score]` of the prediction.
    fn score_expected(&self) -> PyResult<[f64; 4]> {
        evaluate::score(&self.matrix, self.structure.pairing_matrix())
            .map(|stats| stats.to_array())
            .map_err(engine_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "MEA(N={}, gamma={}, structure='{}')",
            self.matrix.size(),
            self.gamma,
            self.structure.dot_bracket()
        )
    }
}

/// Predicts the MEA structure of `bpps`.
///
/// Returns `(bp_list, bp_matrix, structure)`.
#[pyfunction]
#[pyo3(signature = (bpps, gamma=1.0, min_hairpin_span=3, strict_hairpin=false))]
fn predict(
    bpps: Rows,
    gamma: f64,
    min_hairpin_span: usize,
    strict_hairpin: bool,
) -> PyResult<(Vec<BasePair>, Rows, String)> {
    let matrix = probability_matrix(&bpps)?;
    let config = config(gamma, min_hairpin_span, strict_hairpin)?;
    let structure = meafold::workflows::predict::run(&matrix, &config, &ProgressReporter::new())
        .map_err(engine_err)?;
    Ok((
        structure.pairs().to_vec(),
        to_rows(structure.pairing_matrix().as_matrix()),
        structure.dot_bracket().to_string(),
    ))
}

/// Expected `[sensitivity, ppv, mcc, f_score]` of a 0/1 pairing matrix against `bpps`.
#[pyfunction]
fn score_expected(bpps: Rows, bp_matrix: Rows) -> PyResult<[f64; 4]> {
    let matrix = probability_matrix(&bpps)?;
    let pairing =
        pairing_matrix(&bp_matrix).map_err(|e| PyValueError::new_err(e.to_string()))?;
    evaluate::score(&matrix, &pairing)
        .map(|stats| stats.to_array())
        .map_err(engine_err)
}

/// Expected accuracy of a dot-bracket structure against `bpps`.
#[pyfunction]
fn score_structure(bpps: Rows, structure: &str) -> PyResult<[f64; 4]> {
    let matrix = probability_matrix(&bpps)?;
    evaluate::score_dot_bracket(&matrix, structure)
        .map(|stats| stats.to_array())
        .map_err(engine_err)
}

/// meafold - maximum expected accuracy secondary structures from base-pairing probabilities.
#[pymodule]
fn pymeafold(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMea>()?;
    m.add_function(wrap_pyfunction!(predict, m)?)?;
    m.add_function(wrap_pyfunction!(score_expected, m)?)?;
    m.add_function(wrap_pyfunction!(score_structure, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_triangular_pairing_matrix_is_mirrored() {
        let rows = vec![
            vec![0.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ];
        let pairing = pairing_matrix(&rows).unwrap();
        assert_eq!(pairing.get(0, 3), 1.0);
        assert_eq!(pairing.get(3, 0), 1.0);
        assert_eq!(pairing.pairs(), vec![(0, 3)]);
    }

    #[test]
    fn symmetric_pairing_matrix_is_kept_as_is() {
        let rows = vec![
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ];
        let pairing = pairing_matrix(&rows).unwrap();
        assert_eq!(pairing, PairingMatrix::from_pairs(3, &[(0, 2)]).unwrap());
    }

    #[test]
    fn lower_triangular_pairing_matrix_is_asymmetric() {
        let rows = vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ];
        assert!(matches!(
            pairing_matrix(&rows),
            Err(StructureError::Asymmetric { .. })
        ));
    }

    #[test]
    fn ragged_pairing_matrix_is_rejected() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert_eq!(
            pairing_matrix(&rows),
            Err(StructureError::NotSquare { rows: 2, cols: 1 })
        );
    }

    #[test]
    fn mirrored_upper_triangle_scores_like_the_symmetric_matrix() {
        let bpps = ProbabilityMatrix::from_pairs(6, &[(0, 5, 0.3)]).unwrap();
        let mut upper = vec![vec![0.0; 6]; 6];
        upper[0][5] = 1.0;
        let mut symmetric = upper.clone();
        symmetric[5][0] = 1.0;

        let from_upper = evaluate::score(&bpps, &pairing_matrix(&upper).unwrap()).unwrap();
        let from_symmetric = evaluate::score(&bpps, &pairing_matrix(&symmetric).unwrap()).unwrap();
        assert_eq!(from_upper, from_symmetric);
    }
}
