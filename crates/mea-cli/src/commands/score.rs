use crate::cli::ScoreArgs;
use crate::error::Result;
use crate::matrix_file;
use crate::report::ScoreReport;
use meafold::workflows::evaluate;
use tracing::info;

pub fn run(args: ScoreArgs) -> Result<()> {
    let report = execute(&args)?;
    print!("{}", report.render(args.format)?);
    Ok(())
}

pub fn execute(args: &ScoreArgs) -> Result<ScoreReport> {
    let matrix = matrix_file::read_probability_matrix(&args.input, args.delimiter)?;
    info!(
        "Scoring a {}-position structure against {:?}",
        args.structure.chars().count(),
        args.input
    );
    let accuracy = evaluate::score_dot_bracket(&matrix, &args.structure)?;

    Ok(ScoreReport {
        input: args.input.display().to_string(),
        structure: args.structure.clone(),
        accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use clap::Parser;
    use meafold::engine::error::EngineError;
    use std::fs;

    fn score_args(input: &str, structure: &str) -> ScoreArgs {
        let cli = Cli::try_parse_from(["meafold", "score", "-i", input, "-b", structure]).unwrap();
        match cli.command {
            Commands::Score(args) => args,
            _ => panic!("expected score subcommand"),
        }
    }

    fn write_single_pair(dir: &tempfile::TempDir, n: usize, probability: f64) -> String {
        let mut rows = vec![vec!["0".to_string(); n]; n];
        rows[0][n - 1] = probability.to_string();
        rows[n - 1][0] = probability.to_string();
        let text: String = rows.iter().map(|row| row.join("\t") + "\n").collect();
        let path = dir.path().join("bpps.txt");
        fs::write(&path, text).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn scores_an_empty_structure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_single_pair(&dir, 6, 0.3);

        let report = execute(&score_args(&input, "......")).unwrap();

        let stats = report.accuracy.to_array();
        let expected = [
            3.3333111112592587e-06,
            1.0,
            0.0018095545828477255,
            6.6666000006666605e-06,
        ];
        for (actual, expected) in stats.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn length_mismatch_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_single_pair(&dir, 6, 0.3);
        let result = execute(&score_args(&input, "(....)...."));
        assert!(matches!(result, Err(CliError::Meafold(EngineError::Scoring { .. }))));
    }

    #[test]
    fn unbalanced_structure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_single_pair(&dir, 6, 0.3);
        let result = execute(&score_args(&input, "((...)"));
        assert!(matches!(result, Err(CliError::Meafold(EngineError::Structure(_)))));
    }
}
