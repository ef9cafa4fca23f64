use crate::cli::Delimiter;
use crate::error::{CliError, Result};
use meafold::core::models::matrix::ProbabilityMatrix;
use meafold::core::models::structure::PairingMatrix;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a square probability matrix from delimited text, one row per line.
///
/// Blank lines and lines starting with `#` are skipped. Empty fields are ignored, so
/// runs of spaces and trailing delimiters are tolerated.
pub fn read_probability_matrix(path: &Path, delimiter: Delimiter) -> Result<ProbabilityMatrix> {
    debug!("Reading probability matrix from {:?}", path);
    let parsing_error = |source: anyhow::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter.as_byte())
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| parsing_error(e.into()))?;

    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| parsing_error(e.into()))?;
        let row = record
            .iter()
            .filter(|field| !field.is_empty())
            .enumerate()
            .map(|(column, field)| {
                field.parse::<f64>().map_err(|_| {
                    parsing_error(anyhow::anyhow!(
                        "invalid number '{}' at row {}, column {}",
                        field,
                        row_index + 1,
                        column + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if !row.is_empty() {
            rows.push(row);
        }
    }

    let matrix = ProbabilityMatrix::from_rows(&rows).map_err(|e| parsing_error(e.into()))?;
    debug!("Loaded {0}x{0} probability matrix from {1:?}", matrix.size(), path);
    Ok(matrix)
}

/// Writes a pairing matrix as tab-separated text with `precision` decimals per entry.
pub fn write_pairing_matrix(path: &Path, pairing: &PairingMatrix, precision: usize) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| CliError::Other(e.into()))?;

    let matrix = pairing.as_matrix();
    for i in 0..matrix.nrows() {
        let record: Vec<String> = matrix
            .row(i)
            .iter()
            .map(|value| format!("{:.*}", precision, value))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| CliError::Other(e.into()))?;
    }
    writer.flush()?;
    debug!("Wrote {0}x{0} pairing matrix to {1:?}", matrix.nrows(), path);
    Ok(())
}

/// Output location of the pairing matrix predicted for `input`: `<dir>/<stem>.bp_matrix.tsv`.
pub fn pairing_matrix_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string());
    dir.join(format!("{}.bp_matrix.tsv", stem))
}

/// Output locations for every input, in input order. Two inputs that would write the
/// same file are rejected before anything is predicted.
pub fn pairing_matrix_paths(dir: &Path, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut paths = Vec::with_capacity(inputs.len());
    for input in inputs {
        let path = pairing_matrix_path(dir, input);
        if let Some(previous) = claimed.insert(path.clone(), input) {
            return Err(CliError::Config(format!(
                "Inputs '{}' and '{}' would both write the pairing matrix '{}'",
                previous.display(),
                input.display(),
                path.display()
            )));
        }
        paths.push(path);
    }
    Ok(paths)
}
