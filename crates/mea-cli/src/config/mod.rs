mod defaults;
mod models;

use defaults::DefaultsConfig;
pub use models::AppConfig;

use crate::cli::PredictArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use meafold::engine::config::{self as core_config, HairpinRule, SplitSearch};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPredictionConfig {
    gamma: Option<f64>,
    #[serde(rename = "min-hairpin-span")]
    min_hairpin_span: Option<usize>,
    #[serde(rename = "hairpin-rule")]
    hairpin_rule: Option<HairpinRule>,
    #[serde(rename = "split-search")]
    split_search: Option<SplitSearch>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    #[serde(rename = "matrix-precision")]
    matrix_precision: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    prediction: Option<PartialPredictionConfig>,
    output: Option<PartialOutputConfig>,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration: command-line flags win over `--set` values,
    /// which win over the config file, which wins over built-in defaults.
    pub fn merge_with_cli(mut self, args: &PredictArgs) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;

        let defaults = DefaultsConfig::default();
        let prediction = self.prediction.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let hairpin_rule = if args.strict_hairpin {
            HairpinRule::Strict
        } else {
            prediction.hairpin_rule.unwrap_or_default()
        };
        let split_search = if args.equality_split_search {
            SplitSearch::Equality
        } else {
            prediction.split_search.unwrap_or_default()
        };

        let core_config = core_config::MeaConfigBuilder::new()
            .gamma(args.gamma.or(prediction.gamma).unwrap_or(defaults.gamma))
            .min_hairpin_span(
                args.min_hairpin_span
                    .or(prediction.min_hairpin_span)
                    .unwrap_or(defaults.min_hairpin_span),
            )
            .hairpin_rule(hairpin_rule)
            .split_search(split_search)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            core_config,
            matrix_precision: output
                .matrix_precision
                .unwrap_or(defaults.matrix_precision),
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for assignment in set_values {
            self.apply_set_value(assignment)
                .map_err(|e| CliError::Config(e.to_string()))?;
        }
        Ok(())
    }

    fn apply_set_value(&mut self, assignment: &str) -> std::result::Result<(), ParseError> {
        let (key, value) = parser::parse_assignment(assignment)?;
        debug!("Applying configuration override {} = {}", key, value);

        match key {
            "prediction.gamma" => {
                self.prediction_mut().gamma = Some(parser::parse_number(key, value)?);
            }
            "prediction.min-hairpin-span" => {
                self.prediction_mut().min_hairpin_span = Some(parser::parse_number(key, value)?);
            }
            "prediction.hairpin-rule" => {
                self.prediction_mut().hairpin_rule = Some(parser::parse_variant(key, value)?);
            }
            "prediction.split-search" => {
                self.prediction_mut().split_search = Some(parser::parse_variant(key, value)?);
            }
            "output.matrix-precision" => {
                self.output
                    .get_or_insert_with(Default::default)
                    .matrix_precision = Some(parser::parse_number(key, value)?);
            }
            _ => {
                return Err(ParseError::UnknownKey(key.to_string()));
            }
        }
        Ok(())
    }

    fn prediction_mut(&mut self) -> &mut PartialPredictionConfig {
        self.prediction.get_or_insert_with(Default::default)
    }
}
