//! OFX statement reader CLI
//!
//! Command-line interface for reading OFX 1.x (SGML) and OFX 2.x (XML)
//! bank and credit-card statements.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- statement.ofx
//! cargo run -- --format csv statement.ofx > transactions.csv
//! cargo run -- --format dump --encoding windows-1252 statement.ofx
//! cargo run -- --rename-map renames.csv --format csv -vv statement.ofx
//! ```
//!
//! The program reads the statement, optionally renames transaction memos,
//! and writes a summary, the transactions as CSV, or the normalized document
//! to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, invalid header, malformed markup, etc.)

use ofx_statement::cli;
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level())
        .with_target(false)
        .init();

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
