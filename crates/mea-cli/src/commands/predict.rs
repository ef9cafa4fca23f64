use crate::cli::PredictArgs;
use crate::config::{AppConfig, PartialAppConfig};
use crate::error::Result;
use crate::matrix_file;
use crate::report::{PredictionEntry, PredictionReport};
use crate::utils::progress::CliProgressHandler;
use meafold::core::models::matrix::ProbabilityMatrix;
use meafold::core::models::structure::Structure;
use meafold::engine::progress::ProgressReporter;
use meafold::workflows::{batch, evaluate, predict};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(args: PredictArgs, show_progress: bool) -> Result<()> {
    let report = execute(&args, show_progress)?;
    print!("{}", report.render(args.format)?);
    Ok(())
}

/// Loads the inputs, predicts every structure and writes the optional pairing matrices.
pub fn execute(args: &PredictArgs, show_progress: bool) -> Result<PredictionReport> {
    info!("Merging configuration from file and CLI arguments...");
    let config =
        PartialAppConfig::from_optional_file(args.config.as_deref())?.merge_with_cli(args)?;
    info!(
        gamma = config.core_config.gamma,
        min_hairpin_span = config.core_config.min_hairpin_span,
        hairpin_rule = ?config.core_config.hairpin_rule,
        split_search = ?config.core_config.split_search,
        "Resolved prediction configuration."
    );

    let output_paths: Vec<Option<PathBuf>> = match &args.pairing_matrix_dir {
        Some(dir) => matrix_file::pairing_matrix_paths(dir, &args.input)?
            .into_iter()
            .map(Some)
            .collect(),
        None => vec![None; args.input.len()],
    };

    let matrices = args
        .input
        .iter()
        .map(|path| matrix_file::read_probability_matrix(path, args.delimiter))
        .collect::<Result<Vec<_>>>()?;

    let structures = predict_all(&matrices, &config, show_progress)?;

    if let Some(dir) = &args.pairing_matrix_dir {
        fs::create_dir_all(dir)?;
    }

    let mut report = PredictionReport::default();
    let outputs = args.input.iter().zip(&output_paths);
    for (((path, output_path), matrix), structure) in outputs.zip(&matrices).zip(&structures) {
        if structure.num_pairs() == 0 {
            warn!("No base pairs predicted for {:?}.", path);
        }

        let accuracy = if args.score {
            Some(evaluate::score(matrix, structure.pairing_matrix())?)
        } else {
            None
        };

        if let Some(output_path) = output_path {
            info!("Writing pairing matrix for {:?} to {:?}", path, output_path);
            matrix_file::write_pairing_matrix(
                output_path,
                structure.pairing_matrix(),
                config.matrix_precision,
            )?;
        }

        report.predictions.push(PredictionEntry::new(
            path,
            config.core_config.gamma,
            structure,
            accuracy,
        ));
    }

    Ok(report)
}

fn predict_all(
    matrices: &[ProbabilityMatrix],
    config: &AppConfig,
    show_progress: bool,
) -> Result<Vec<Structure>> {
    if let [matrix] = matrices {
        let reporter = if show_progress {
            ProgressReporter::with_callback(CliProgressHandler::new().get_callback())
        } else {
            ProgressReporter::new()
        };
        return Ok(vec![predict::run(matrix, &config.core_config, &reporter)?]);
    }

    info!("Predicting {} matrices in parallel.", matrices.len());
    let structures = batch::predict_batch(matrices, &config.core_config)
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(structures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    const HAIRPIN: &[(usize, usize, f64)] = &[
        (0, 11, 0.9),
        (1, 10, 0.85),
        (2, 9, 0.8),
        (3, 8, 0.3),
        (0, 10, 0.05),
        (1, 11, 0.05),
        (2, 10, 0.04),
        (4, 7, 0.1),
        (1, 9, 0.03),
    ];

    fn write_matrix(dir: &Path, name: &str, n: usize, entries: &[(usize, usize, f64)]) -> PathBuf {
        let matrix = ProbabilityMatrix::from_pairs(n, entries).unwrap();
        let text: String = matrix
            .as_matrix()
            .row_iter()
            .map(|row| {
                let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                fields.join("\t") + "\n"
            })
            .collect();
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn predict_args(argv: &[&str]) -> PredictArgs {
        let mut full = vec!["meafold", "predict"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Predict(args) => args,
            _ => panic!("expected predict subcommand"),
        }
    }

    #[test]
    fn predicts_and_scores_a_single_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_matrix(dir.path(), "hairpin.txt", 12, HAIRPIN);
        let args = predict_args(&["-i", input.to_str().unwrap(), "--score"]);

        let report = execute(&args, false).unwrap();

        assert_eq!(report.predictions.len(), 1);
        let entry = &report.predictions[0];
        assert_eq!(entry.structure, "(((......)))");
        assert_eq!(entry.pairs, vec![(0, 11), (1, 10), (2, 9)]);
        let stats = entry.accuracy.unwrap();
        assert!((stats.sensitivity - 0.8173074889054558).abs() < 1e-9);
        assert!((stats.mcc - 0.8260030631364462).abs() < 1e-9);
    }

    #[test]
    fn batch_keeps_input_order_and_writes_pairing_matrices() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_matrix(dir.path(), "hairpin.txt", 12, HAIRPIN);
        let second = write_matrix(
            dir.path(),
            "two.txt",
            14,
            &[
                (0, 6, 0.7),
                (1, 5, 0.75),
                (7, 13, 0.8),
                (8, 12, 0.65),
                (0, 13, 0.2),
            ],
        );
        let out_dir = dir.path().join("out");
        let args = predict_args(&[
            "-i",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "-m",
            out_dir.to_str().unwrap(),
        ]);

        let report = execute(&args, false).unwrap();

        let structures: Vec<&str> = report
            .predictions
            .iter()
            .map(|entry| entry.structure.as_str())
            .collect();
        assert_eq!(structures, vec!["(((......)))", "((...))((...))"]);
        assert!(report.predictions.iter().all(|entry| entry.accuracy.is_none()));

        let written = fs::read_to_string(out_dir.join("two.bp_matrix.tsv")).unwrap();
        let first_row: Vec<&str> = written.lines().next().unwrap().split('\t').collect();
        assert_eq!(first_row.len(), 14);
        assert_eq!(first_row[6], "1.000");
        assert_eq!(first_row[13], "0.000");
    }

    #[test]
    fn gamma_override_changes_the_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let ladder = [(0, 9, 0.8), (1, 8, 0.45), (2, 7, 0.3), (3, 6, 0.15)];
        let input = write_matrix(dir.path(), "ladder.txt", 10, &ladder);

        let structure_for = |gamma: &str| {
            let args = predict_args(&["-i", input.to_str().unwrap(), "-g", gamma]);
            execute(&args, false).unwrap().predictions[0].structure.clone()
        };

        assert_eq!(structure_for("0.1"), "..........");
        assert_eq!(structure_for("1"), "(........)");
        assert_eq!(structure_for("10"), "((((..))))");
    }

    #[test]
    fn inputs_with_the_same_stem_do_not_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        let first = write_matrix(&dir.path().join("a"), "seq.txt", 8, &[(0, 7, 0.9)]);
        let second = write_matrix(&dir.path().join("b"), "seq.txt", 8, &[]);
        let out_dir = dir.path().join("out");
        let args = predict_args(&[
            "-i",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "-m",
            out_dir.to_str().unwrap(),
        ]);

        let result = execute(&args, false);

        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(!out_dir.join("seq.bp_matrix.tsv").exists());
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let args = predict_args(&["-i", missing.to_str().unwrap()]);
        assert!(execute(&args, false).is_err());
    }
}
