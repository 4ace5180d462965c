//! Command-line interface for the hexgravity scoring engine.
//!
//! Reads a POI table, a hex grid, and a scoring configuration from JSON
//! files, runs one scoring pass, and writes the full result tables as JSON
//! to a file or stdout.
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use thiserror::Error;

use hexgravity_core::{ConfigError, DataShapeError};
use hexgravity_scorer::{GravityEngine, ScoreError, ScoreOutput};

mod input;

/// Run the CLI with the current process arguments.
///
/// # Errors
/// Returns a [`CliError`] for argument, input, configuration, or scoring
/// failures; the binary reports it on stderr and exits non-zero.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(&args),
    }
}

fn run_score(args: &ScoreArgs) -> Result<(), CliError> {
    let config = input::load_config(&args.config)?;
    let pois = input::load_pois(&args.pois)?;
    let hexes = input::load_hexes(&args.hexes)?;

    let engine = GravityEngine::new(config);
    let output = engine.score(&pois, &hexes)?;
    log::info!(
        "scored {} hex cells from {} surviving candidate pairs",
        output.composite.len(),
        output.diagnostics.candidate_pairs
    );

    write_output(args.output.as_deref(), &output)
}

fn write_output(path: Option<&Utf8Path>, output: &ScoreOutput) -> Result<(), CliError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Io {
                path: path.to_owned(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, output)
                .map_err(|source| CliError::Serialize { source })?;
            writer.flush().map_err(|source| CliError::Io {
                path: path.to_owned(),
                source,
            })?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, output)
                .map_err(|source| CliError::Serialize { source })?;
            writeln!(writer).map_err(|source| CliError::Io {
                path: Utf8PathBuf::from("<stdout>"),
                source,
            })?;
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "hexgravity",
    about = "Gravity-model scoring of hexagonal grids against POI tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a hex grid against a categorised POI table.
    Score(ScoreArgs),
}

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Parser)]
struct ScoreArgs {
    /// Path to the POI table (JSON array of records).
    #[arg(long, value_name = "path")]
    pois: Utf8PathBuf,
    /// Path to the hex grid (JSON array of cells).
    #[arg(long, value_name = "path")]
    hexes: Utf8PathBuf,
    /// Path to the scoring configuration (JSON object).
    #[arg(long, value_name = "path")]
    config: Utf8PathBuf,
    /// Where to write the result tables; stdout when omitted.
    #[arg(long, value_name = "path")]
    output: Option<Utf8PathBuf>,
}

/// Errors emitted by the hexgravity CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Reading or writing a file failed.
    #[error("i/o error on {path}")]
    Io {
        /// Path the operation was performed on.
        path: Utf8PathBuf,
        /// Underlying i/o failure.
        #[source]
        source: std::io::Error,
    },
    /// An input file held malformed JSON.
    #[error("failed to parse {path}")]
    Parse {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// The result tables could not be serialized.
    #[error("failed to serialize results")]
    Serialize {
        /// Underlying encode failure.
        #[source]
        source: serde_json::Error,
    },
    /// The scoring configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An input record was structurally broken.
    #[error(transparent)]
    Data(#[from] DataShapeError),
    /// The scoring run itself failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
}
