// CLI module
// Command-line interface, argument parsing and the command runner

mod args;

pub use args::{CliArgs, OutputFormat};

use crate::core::{rename_transactions, StatementParser};
use crate::io::{encoding_for_label, read_rename_map, source, write_transactions_csv};
use crate::types::Result;
use clap::Parser;
use std::io::Write;
use tracing::info;

/// Parse command-line arguments using clap
///
/// If parsing fails (e.g., invalid arguments, missing required arguments, or
/// --help flag), clap will display an error message or help text and exit
/// the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Read the statement named by `args` and write the requested output
///
/// # Errors
///
/// Returns an error if the encoding label is unknown, a file cannot be read,
/// the statement or rename map is invalid, or output cannot be written.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<()> {
    let encoding = args
        .encoding
        .as_deref()
        .map(encoding_for_label)
        .transpose()?;

    let mut document = StatementParser::new().parse_file(&args.input_file, encoding)?;

    if let Some(path) = &args.rename_map {
        let map = read_rename_map(source::read_file(path)?.as_slice())?;
        let renamed = rename_transactions(&mut document, &map)?;
        info!(renamed, "applied rename map");
    }

    match args.format {
        OutputFormat::Summary => writeln!(output, "{}", document.summary())?,
        OutputFormat::Csv => write_transactions_csv(document.transactions(), output)?,
        OutputFormat::Dump => writeln!(output, "{}", document)?,
    }
    Ok(())
}
