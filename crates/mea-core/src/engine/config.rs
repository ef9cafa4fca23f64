use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GAMMA: f64 = 1.0;
pub const DEFAULT_MIN_HAIRPIN_SPAN: usize = 3;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Gamma must be a finite positive number, got {0}")]
    InvalidGamma(f64),

    #[error("Minimum hairpin span must be at least 1, got {0}")]
    InvalidMinHairpinSpan(usize),
}

/// How the minimum hairpin span constrains base pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HairpinRule {
    /// Intervals shorter than the span are never filled and score zero, but a pair
    /// enclosing such an interval is still allowed.
    #[default]
    Soft,
    /// A pair `(i, j)` is only allowed when `j - i - 1 >= min_hairpin_span`.
    Strict,
}

/// How the traceback recovers the split point of a bifurcation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitSearch {
    /// Use the first maximizing split recorded while filling the table.
    #[default]
    Stored,
    /// Search for the first `k` with `W[i,j] == W[i,k] + W[k+1,j]`.
    Equality,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MeaConfig {
    pub gamma: f64,
    pub min_hairpin_span: usize,
    pub hairpin_rule: HairpinRule,
    pub split_search: SplitSearch,
}

impl Default for MeaConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            min_hairpin_span: DEFAULT_MIN_HAIRPIN_SPAN,
            hairpin_rule: HairpinRule::default(),
            split_search: SplitSearch::default(),
        }
    }
}

impl MeaConfig {
    pub fn with_gamma(gamma: f64) -> Result<Self, ConfigError> {
        MeaConfigBuilder::new().gamma(gamma).build()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        if self.min_hairpin_span == 0 {
            return Err(ConfigError::InvalidMinHairpinSpan(self.min_hairpin_span));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MeaConfigBuilder {
    gamma: Option<f64>,
    min_hairpin_span: Option<usize>,
    hairpin_rule: Option<HairpinRule>,
    split_search: Option<SplitSearch>,
}

impl MeaConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }
    pub fn min_hairpin_span(mut self, span: usize) -> Self {
        self.min_hairpin_span = Some(span);
        self
    }
    pub fn hairpin_rule(mut self, rule: HairpinRule) -> Self {
        self.hairpin_rule = Some(rule);
        self
    }
    pub fn split_search(mut self, search: SplitSearch) -> Self {
        self.split_search = Some(search);
        self
    }

    pub fn build(self) -> Result<MeaConfig, ConfigError> {
        let defaults = MeaConfig::default();
        let config = MeaConfig {
            gamma: self.gamma.unwrap_or(defaults.gamma),
            min_hairpin_span: self.min_hairpin_span.unwrap_or(defaults.min_hairpin_span),
            hairpin_rule: self.hairpin_rule.unwrap_or(defaults.hairpin_rule),
            split_search: self.split_search.unwrap_or(defaults.split_search),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_standard_parameters() {
        let config = MeaConfig::default();
        assert_eq!(config.gamma, 1.0);
        assert_eq!(config.min_hairpin_span, 3);
        assert_eq!(config.hairpin_rule, HairpinRule::Soft);
        assert_eq!(config.split_search, SplitSearch::Stored);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides_only_the_given_fields() {
        let config = MeaConfigBuilder::new()
            .gamma(2.5)
            .hairpin_rule(HairpinRule::Strict)
            .build()
            .unwrap();
        assert_eq!(config.gamma, 2.5);
        assert_eq!(config.min_hairpin_span, 3);
        assert_eq!(config.hairpin_rule, HairpinRule::Strict);
        assert_eq!(config.split_search, SplitSearch::Stored);
    }

    #[test]
    fn non_positive_or_non_finite_gamma_is_rejected() {
        assert_eq!(
            MeaConfig::with_gamma(0.0),
            Err(ConfigError::InvalidGamma(0.0))
        );
        assert_eq!(
            MeaConfig::with_gamma(-1.0),
            Err(ConfigError::InvalidGamma(-1.0))
        );
        assert!(matches!(
            MeaConfig::with_gamma(f64::NAN),
            Err(ConfigError::InvalidGamma(_))
        ));
        assert!(matches!(
            MeaConfig::with_gamma(f64::INFINITY),
            Err(ConfigError::InvalidGamma(_))
        ));
    }

    #[test]
    fn zero_hairpin_span_is_rejected() {
        assert_eq!(
            MeaConfigBuilder::new().min_hairpin_span(0).build(),
            Err(ConfigError::InvalidMinHairpinSpan(0))
        );
    }
}
