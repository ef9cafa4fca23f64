use crate::core::models::matrix::ProbabilityMatrix;
use crate::core::models::structure::PairingMatrix;
use serde::Serialize;
use thiserror::Error;

/// Pseudocount added to every confusion term so that no denominator is exactly zero.
pub const PSEUDOCOUNT: f64 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error(
        "Pairing matrix size {pairing} does not match probability matrix size {probabilities}"
    )]
    SizeMismatch { probabilities: usize, pairing: usize },

    #[error("Expected-accuracy statistics are undefined for sequence length {0} (need at least 2)")]
    DegenerateLength(usize),

    #[error("Statistic '{statistic}' evaluated to a non-finite value")]
    NonFinite { statistic: &'static str },
}

/// Expected confusion-matrix counts over the strict upper triangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ConfusionTerms {
    pub true_positive: f64,
    pub false_positive: f64,
    pub false_negative: f64,
    pub true_negative: f64,
    /// False-positive mass on pairs whose positions are both unpaired in the prediction.
    pub compensated_false_positive: f64,
}

impl ConfusionTerms {
    #[inline]
    fn adjusted_false_positive(&self) -> f64 {
        self.false_positive - self.compensated_false_positive
    }

    pub fn sensitivity(&self) -> f64 {
        self.true_positive / (self.true_positive + self.false_negative)
    }

    pub fn ppv(&self) -> f64 {
        self.true_positive / (self.true_positive + self.adjusted_false_positive())
    }

    pub fn mcc(&self) -> f64 {
        let tp = self.true_positive;
        let tn = self.true_negative;
        let fp = self.adjusted_false_positive();
        let fn_ = self.false_negative;
        (tp * tn - fp * fn_) / ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt()
    }

    pub fn f_score(&self) -> f64 {
        let tp = self.true_positive;
        2.0 * tp / (2.0 * tp + self.adjusted_false_positive() + self.false_negative)
    }
}

/// Expected sensitivity, positive predictive value, Matthews correlation coefficient
/// and F-score of a structure against a pairing-probability ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyStats {
    pub sensitivity: f64,
    pub ppv: f64,
    pub mcc: f64,
    pub f_score: f64,
}

impl AccuracyStats {
    /// The statistics in `[sensitivity, ppv, mcc, f_score]` order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.sensitivity, self.ppv, self.mcc, self.f_score]
    }
}

pub struct AccuracyScorer<'a> {
    probabilities: &'a ProbabilityMatrix,
}

impl<'a> AccuracyScorer<'a> {
    pub fn new(probabilities: &'a ProbabilityMatrix) -> Self {
        Self { probabilities }
    }

    pub fn confusion_terms(&self, pairing: &PairingMatrix) -> Result<ConfusionTerms, ScoringError> {
        let n = self.probabilities.size();
        if pairing.size() != n {
            return Err(ScoringError::SizeMismatch {
                probabilities: n,
                pairing: pairing.size(),
            });
        }
        if n < 2 {
            return Err(ScoringError::DegenerateLength(n));
        }

        let partners: Vec<usize> = (0..n).map(|i| pairing.partner_count(i)).collect();

        let mut tp = 0.0;
        let mut fp = 0.0;
        let mut fn_ = 0.0;
        let mut predicted_total = 0.0;
        let mut probability_total = 0.0;
        let mut cfp = PSEUDOCOUNT;

        for (i, j, prob) in self.probabilities.upper_triangle() {
            let pred = pairing.get(i, j);
            tp += pred * prob;
            fp += pred * (1.0 - prob);
            fn_ += (1.0 - pred) * prob;
            predicted_total += pred;
            probability_total += prob;
            if partners[i] + partners[j] == 0 {
                cfp += pred * (1.0 - prob);
            }
        }

        let n = n as f64;
        let true_positive = tp + PSEUDOCOUNT;
        Ok(ConfusionTerms {
            true_positive,
            false_positive: fp + PSEUDOCOUNT,
            false_negative: fn_ + PSEUDOCOUNT,
            true_negative: 0.5 * n * n - 1.0 - predicted_total - probability_total
                + true_positive
                + PSEUDOCOUNT,
            compensated_false_positive: cfp,
        })
    }

    pub fn score(&self, pairing: &PairingMatrix) -> Result<AccuracyStats, ScoringError> {
        let terms = self.confusion_terms(pairing)?;
        let stats = AccuracyStats {
            sensitivity: finite("sensitivity", terms.sensitivity())?,
            ppv: finite("ppv", terms.ppv())?,
            mcc: finite("mcc", terms.mcc())?,
            f_score: finite("f_score", terms.f_score())?,
        };
        Ok(stats)
    }
}

fn finite(statistic: &'static str, value: f64) -> Result<f64, ScoringError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoringError::NonFinite { statistic })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::Structure;

    const TOLERANCE: f64 = 1e-9;

    fn hairpin_matrix() -> ProbabilityMatrix {
        ProbabilityMatrix::from_pairs(
            12,
            &[
                (0, 11, 0.9),
                (1, 10, 0.85),
                (2, 9, 0.8),
                (3, 8, 0.3),
                (0, 10, 0.05),
                (1, 11, 0.05),
                (2, 10, 0.04),
                (4, 7, 0.1),
                (1, 9, 0.03),
            ],
        )
        .unwrap()
    }

    fn assert_stats(actual: AccuracyStats, expected: [f64; 4]) {
        for (value, reference) in actual.to_array().iter().zip(expected.iter()) {
            assert!(
                (value - reference).abs() < TOLERANCE,
                "expected {reference}, got {value}"
            );
        }
    }

    #[test]
    fn score_matches_known_values_for_hairpin() {
        let probabilities = hairpin_matrix();
        let structure = Structure::from_dot_bracket("(((......)))").unwrap();
        let stats = AccuracyScorer::new(&probabilities)
            .score(structure.pairing_matrix())
            .unwrap();
        assert_stats(
            stats,
            [
                0.8173074889054558,
                0.8500000499999834,
                0.8260030631364462,
                0.8333332516340269,
            ],
        );
    }

    #[test]
    fn empty_prediction_has_unit_ppv_and_near_zero_sensitivity() {
        let probabilities = ProbabilityMatrix::from_pairs(6, &[(0, 5, 0.3)]).unwrap();
        let structure = Structure::unpaired(6);
        let stats = AccuracyScorer::new(&probabilities)
            .score(structure.pairing_matrix())
            .unwrap();
        assert_stats(
            stats,
            [
                3.3333111112592587e-06,
                1.0,
                0.0018095545828477255,
                6.6666000006666605e-06,
            ],
        );
    }

    #[test]
    fn compensation_stays_at_pseudocount_for_valid_pairings() {
        let probabilities = hairpin_matrix();
        let structure = Structure::from_dot_bracket("((........))").unwrap();
        let terms = AccuracyScorer::new(&probabilities)
            .confusion_terms(structure.pairing_matrix())
            .unwrap();
        assert_eq!(terms.compensated_false_positive, PSEUDOCOUNT);
    }

    #[test]
    fn confusion_terms_accumulate_expected_counts() {
        let probabilities = ProbabilityMatrix::from_pairs(4, &[(0, 3, 0.75), (1, 2, 0.5)]).unwrap();
        let structure = Structure::from_pairs(4, vec![(0, 3)]).unwrap();
        let terms = AccuracyScorer::new(&probabilities)
            .confusion_terms(structure.pairing_matrix())
            .unwrap();
        assert!((terms.true_positive - (0.75 + PSEUDOCOUNT)).abs() < TOLERANCE);
        assert!((terms.false_positive - (0.25 + PSEUDOCOUNT)).abs() < TOLERANCE);
        assert!((terms.false_negative - (0.5 + PSEUDOCOUNT)).abs() < TOLERANCE);
        let expected_tn = 0.5 * 16.0 - 1.0 - 1.0 - 1.25 + 0.75 + 2.0 * PSEUDOCOUNT;
        assert!((terms.true_negative - expected_tn).abs() < TOLERANCE);
    }

    #[test]
    fn single_position_is_a_domain_error() {
        let probabilities = ProbabilityMatrix::from_pairs(1, &[]).unwrap();
        let structure = Structure::unpaired(1);
        assert_eq!(
            AccuracyScorer::new(&probabilities).score(structure.pairing_matrix()),
            Err(ScoringError::DegenerateLength(1))
        );
    }

    #[test]
    fn two_positions_are_scored() {
        let probabilities = ProbabilityMatrix::from_pairs(2, &[(0, 1, 0.5)]).unwrap();
        let structure = Structure::unpaired(2);
        let stats = AccuracyScorer::new(&probabilities)
            .score(structure.pairing_matrix())
            .unwrap();
        assert_stats(
            stats,
            [
                1.9999920000319997e-06,
                1.0,
                0.0009999985000033748,
                3.999976000143999e-06,
            ],
        );
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let probabilities = hairpin_matrix();
        let structure = Structure::unpaired(10);
        assert_eq!(
            AccuracyScorer::new(&probabilities).score(structure.pairing_matrix()),
            Err(ScoringError::SizeMismatch {
                probabilities: 12,
                pairing: 10
            })
        );
    }

    #[test]
    fn non_finite_values_are_reported_by_name() {
        assert_eq!(finite("ppv", 0.5), Ok(0.5));
        assert_eq!(
            finite("mcc", f64::NAN),
            Err(ScoringError::NonFinite { statistic: "mcc" })
        );
        assert_eq!(
            finite("f_score", f64::INFINITY),
            Err(ScoringError::NonFinite {
                statistic: "f_score"
            })
        );
    }
}
