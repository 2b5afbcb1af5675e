// qccheck - cross-document reconciliation for manufacturing QC

mod exit_codes;
mod export;
mod fields;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use exit_codes::{EXIT_QC_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};
use fields::RoleArg;
use qccheck_recon::normalize::FieldKind;

#[derive(Parser)]
#[command(name = "qccheck")]
#[command(about = "Cross-check traveler, product image and BOM data for a QC run")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG still applies per module)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every document listed in a run config
    #[command(after_help = "\
Examples:
  qccheck run job-12345.qc.toml
  qccheck run job-12345.qc.toml --json
  qccheck run job-12345.qc.toml --output report.json --csv findings.csv

Exit codes: 0 pass, 3 warning, 4 fail, 5 invalid config, 6 runtime error")]
    Run {
        /// Path to the .qc.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write findings as CSV to file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Validate a run config without reconciling
    #[command(after_help = "\
Examples:
  qccheck validate job-12345.qc.toml")]
    Validate {
        /// Path to the .qc.toml config file
        config: PathBuf,
    },

    /// Extract QC fields from recognized document text
    #[command(after_help = "\
Examples:
  qccheck extract traveler.txt --role traveler
  qccheck extract label-ocr.txt --role image")]
    Extract {
        /// Text file (PDF text layer or OCR output)
        file: PathBuf,

        /// Document role the text belongs to
        #[arg(long, value_enum)]
        role: RoleArg,
    },

    /// Normalize a single value and explain what changed
    #[command(after_help = "\
Examples:
  qccheck normalize board_serial 54321_1234
  qccheck normalize revision 'Rev F2'")]
    Normalize {
        /// Field kind: job_number, part_number, revision, board_serial, unit_serial, flight_status
        field: FieldKind,

        /// Raw value as extracted
        value: String,
    },

    /// Compare two ad-hoc value lists the way the checks do
    #[command(after_help = "\
Examples:
  qccheck compare part_number --left PCA-1234-A,DRW-0042-B --right pca_1234_a1
  qccheck compare unit_serial --left 4321 --right INF-4321 --json")]
    Compare {
        /// Field kind used to normalize both sides
        field: FieldKind,

        /// Comma-separated values for the first side
        #[arg(long, value_delimiter = ',')]
        left: Vec<String>,

        /// Comma-separated values for the second side
        #[arg(long, value_delimiter = ',')]
        right: Vec<String>,

        /// Similarity threshold for closest-candidate suggestions
        #[arg(long, default_value_t = qccheck_recon::config::DEFAULT_FUZZY_THRESHOLD)]
        threshold: f64,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  qccheck-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, csv } => recon::cmd_run(config, json, output, csv),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Extract { file, role } => fields::cmd_extract(file, role),
        Commands::Normalize { field, value } => fields::cmd_normalize(field, &value),
        Commands::Compare { field, left, right, threshold, json } => {
            fields::cmd_compare(field, &left, &right, threshold, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_QC_RUNTIME, msg)
    }

    /// Exit with `code` and no message (the verdict was already reported).
    pub fn silent(code: u8) -> Self {
        Self::new(code, "")
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<qccheck_recon::ReconError> for CliError {
    fn from(err: qccheck_recon::ReconError) -> Self {
        Self::new(exit_codes::recon_exit_code(&err), err.to_string())
    }
}
