use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "meafold - maximum expected accuracy secondary structure prediction from base-pairing probability matrices.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used when predicting several matrices.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the MEA structure for one or more probability matrices.
    Predict(PredictArgs),
    /// Score a dot-bracket structure against a probability matrix.
    Score(ScoreArgs),
}

/// Column separator of a probability matrix text file.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
    Space,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
            Delimiter::Space => b' ',
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Toml,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Probability matrix files (one N×N matrix per file).
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Column separator of the input files.
    #[arg(short, long, value_enum, default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    // --- Prediction Overrides ---
    /// Override the sensitivity/specificity trade-off γ.
    #[arg(short, long, value_name = "FLOAT")]
    pub gamma: Option<f64>,

    /// Override the minimum hairpin span.
    #[arg(long, value_name = "INT")]
    pub min_hairpin_span: Option<usize>,

    /// Forbid pairs that enclose fewer than `min-hairpin-span` unpaired positions.
    #[arg(long)]
    pub strict_hairpin: bool,

    /// Recover bifurcation split points by exact equality search instead of the stored argmax.
    #[arg(long)]
    pub equality_split_search: bool,

    // --- Output ---
    /// Also report expected sensitivity, PPV, MCC and F-score of each prediction.
    #[arg(short, long)]
    pub score: bool,

    /// Write the binary pairing matrix of each prediction into this directory.
    #[arg(short = 'm', long, value_name = "DIR")]
    pub pairing_matrix_dir: Option<PathBuf>,

    /// Report format written to standard output.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S prediction.gamma=2.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Probability matrix file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Structure to score, in dot-bracket notation.
    #[arg(short = 'b', long, required = true, value_name = "DOT_BRACKET")]
    pub structure: String,

    /// Column separator of the input file.
    #[arg(short, long, value_enum, default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    /// Report format written to standard output.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}
