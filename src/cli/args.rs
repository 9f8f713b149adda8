use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Read an OFX bank or credit-card statement
#[derive(Parser, Debug)]
#[command(name = "ofx-statement")]
#[command(about = "Read an OFX bank or credit-card statement", long_about = None)]
pub struct CliArgs {
    /// Input statement file path
    #[arg(value_name = "INPUT", help = "Path to the OFX statement file")]
    pub input_file: PathBuf,

    /// Text encoding of the input
    #[arg(
        long = "encoding",
        value_name = "LABEL",
        help = "Text encoding label, e.g. utf-8 or windows-1252 (default: sniffed from the header)"
    )]
    pub encoding: Option<String>,

    /// What to write to stdout
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "summary",
        help = "Output format: 'summary', 'csv' for transactions or 'dump' for header and markup"
    )]
    pub format: OutputFormat,

    /// Memo rename map applied before output
    #[arg(
        long = "rename-map",
        value_name = "CSV",
        help = "CSV file with prefix,replacement columns used to rename transaction memos"
    )]
    pub rename_map: Option<PathBuf>,

    /// Logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,
}

/// Available output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Summary,
    Csv,
    Dump,
}

impl CliArgs {
    /// Maximum log level for the verbosity count
    ///
    /// Warnings are always shown; each `-v` adds one level.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
