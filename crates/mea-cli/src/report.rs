use crate::cli::ReportFormat;
use crate::error::{CliError, Result};
use meafold::core::models::structure::{BasePair, Structure};
use meafold::core::scoring::accuracy::AccuracyStats;
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PredictionEntry {
    pub input: String,
    pub length: usize,
    pub gamma: f64,
    pub num_pairs: usize,
    pub structure: String,
    pub pairs: Vec<BasePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyStats>,
}

impl PredictionEntry {
    pub fn new(
        input: &Path,
        gamma: f64,
        structure: &Structure,
        accuracy: Option<AccuracyStats>,
    ) -> Self {
        Self {
            input: input.display().to_string(),
            length: structure.size(),
            gamma,
            num_pairs: structure.num_pairs(),
            structure: structure.dot_bracket().to_string(),
            pairs: structure.pairs().to_vec(),
            accuracy,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PredictionReport {
    pub predictions: Vec<PredictionEntry>,
}

impl PredictionReport {
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Toml => to_toml(self),
            ReportFormat::Text => to_text(|out| self.write_text(out)),
        }
    }

    fn write_text(&self, out: &mut String) -> fmt::Result {
        for entry in &self.predictions {
            writeln!(
                out,
                "> {} (N = {}, gamma = {})",
                entry.input, entry.length, entry.gamma
            )?;
            writeln!(out, "{}", entry.structure)?;
            writeln!(out, "pairs: {}", entry.num_pairs)?;
            if let Some(stats) = &entry.accuracy {
                write_stats(out, stats)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub input: String,
    pub structure: String,
    pub accuracy: AccuracyStats,
}

impl ScoreReport {
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Toml => to_toml(self),
            ReportFormat::Text => to_text(|out| self.write_text(out)),
        }
    }

    fn write_text(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "> {}", self.input)?;
        writeln!(out, "{}", self.structure)?;
        write_stats(out, &self.accuracy)
    }
}

fn write_stats(out: &mut String, stats: &AccuracyStats) -> fmt::Result {
    writeln!(
        out,
        "sensitivity: {:.6}  ppv: {:.6}  mcc: {:.6}  f-score: {:.6}",
        stats.sensitivity, stats.ppv, stats.mcc, stats.f_score
    )
}

fn to_text(write: impl FnOnce(&mut String) -> fmt::Result) -> Result<String> {
    let mut out = String::new();
    write(&mut out)
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to render report: {}", e)))?;
    Ok(out)
}

fn to_toml<T: Serialize>(report: &T) -> Result<String> {
    toml::to_string(report)
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize report: {}", e)))
}
