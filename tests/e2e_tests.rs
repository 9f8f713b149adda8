//! End-to-end integration tests
//!
//! These tests validate the complete statement reading pipeline using
//! predefined OFX test fixtures. Each test:
//! 1. Reads input.ofx from a fixture directory
//! 2. Parses it into a statement document (applying rename.csv if present)
//! 3. Writes the transactions as CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - SGML bank and credit-card statements, with and without leaf end tags
//! - XML statements with a declaration and processing instruction
//! - windows-1252 input sniffed from the header
//! - Memo renaming
//! - Error conditions (bad header, missing sections, stray end tags, etc.)
//!
//! Each fixture is run twice: once through the command runner and once
//! through the library entry points.

#[cfg(test)]
mod tests {
    use ofx_statement::cli::{self, CliArgs};
    use ofx_statement::{read_rename_map, rename_transactions, write_transactions_csv};
    use ofx_statement::{OfxError, StatementParser};
    use clap::Parser;
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Which entry point drives the pipeline
    #[derive(Debug, Clone, Copy)]
    enum Entry {
        Cli,
        Library,
    }

    fn run_cli(input: &str, rename: Option<&str>, output: &mut dyn Write) -> Result<(), OfxError> {
        let mut argv = vec!["ofx-statement", "--format", "csv"];
        if let Some(rename) = rename {
            argv.extend(["--rename-map", rename]);
        }
        argv.push(input);
        let args = CliArgs::try_parse_from(argv).expect("Invalid test arguments");
        cli::run(&args, output)
    }

    fn run_library(
        input: &str,
        rename: Option<&str>,
        output: &mut dyn Write,
    ) -> Result<(), OfxError> {
        let bytes = fs::read(input).expect("Failed to read input");
        let mut document = StatementParser::new().parse_reader(bytes.as_slice(), None)?;
        if let Some(rename) = rename {
            let map = read_rename_map(fs::File::open(rename).expect("Failed to open rename map"))?;
            rename_transactions(&mut document, &map)?;
        }
        write_transactions_csv(document.transactions(), output)
    }

    /// Run a test fixture by parsing input.ofx and comparing with expected.csv
    ///
    /// This helper function:
    /// 1. Reads input.ofx (and rename.csv, if present) from tests/fixtures/{fixture_name}/
    /// 2. Parses the statement through the selected entry point
    /// 3. Writes transaction CSV to a temporary file
    /// 4. Compares actual output with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read or the output doesn't match.
    fn run_test_fixture(fixture_name: &str, entry: Entry) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.ofx", fixture_dir);
        let rename_path = format!("{}/rename.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );
        let rename = Path::new(&rename_path)
            .exists()
            .then_some(rename_path.as_str());

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        let result = match entry {
            Entry::Cli => run_cli(&input_path, rename, &mut temp_output),
            Entry::Library => run_library(&input_path, rename, &mut temp_output),
        };
        result.unwrap_or_else(|e| panic!("Failed to read statement: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (entry: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, entry, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures through both entry points
    #[rstest]
    #[case("bank_sgml")]
    #[case("credit_card_sgml")]
    #[case("bank_xml")]
    #[case("windows_1252")]
    #[case("no_transactions")]
    #[case("renamed")]
    fn test_fixtures(#[case] fixture: &str, #[values(Entry::Cli, Entry::Library)] entry: Entry) {
        run_test_fixture(fixture, entry);
    }

    /// Every failing fixture is rejected as a whole with a specific error
    #[rstest]
    #[case::invalid_version("invalid_version", "Invalid OFX header field VERSION: '103'")]
    #[case::missing_ledger("missing_ledger", "Balance information not found")]
    #[case::missing_currency("missing_currency", "Currency not found")]
    #[case::missing_account("missing_account", "Account information not found")]
    #[case::investment(
        "investment",
        "Unsupported account type: no bank or credit card statement response found"
    )]
    #[case::stray_end_tag("stray_end_tag", "Malformed markup: unmatched end tag </STMTTRN>")]
    fn test_error_fixtures(
        #[case] fixture: &str,
        #[case] expected: &str,
        #[values(Entry::Cli, Entry::Library)] entry: Entry,
    ) {
        let input_path = format!("tests/fixtures/errors/{}.ofx", fixture);
        let mut output = Vec::new();

        let result = match entry {
            Entry::Cli => run_cli(&input_path, None, &mut output),
            Entry::Library => run_library(&input_path, None, &mut output),
        };

        assert_eq!(result.unwrap_err().to_string(), expected);
        assert!(output.is_empty(), "no output expected for a failed parse");
    }

    #[test]
    fn test_missing_input_file() {
        let mut output = Vec::new();
        let err = run_cli("tests/fixtures/does_not_exist.ofx", None, &mut output).unwrap_err();
        assert!(matches!(err, OfxError::FileNotFound { .. }));
    }

    #[test]
    fn test_rename_requires_transactions() {
        let mut output = Vec::new();
        let err = run_cli(
            "tests/fixtures/no_transactions/input.ofx",
            Some("tests/fixtures/renamed/rename.csv"),
            &mut output,
        )
        .unwrap_err();
        assert_eq!(err, OfxError::invalid_argument("statement has no transactions"));
    }

    #[test]
    fn test_dump_round_trips_through_xml() {
        let args = CliArgs::try_parse_from([
            "ofx-statement",
            "--format",
            "dump",
            "tests/fixtures/bank_sgml/input.ofx",
        ])
        .unwrap();
        let mut output = Vec::new();
        cli::run(&args, &mut output).unwrap();

        let dump = String::from_utf8(output).unwrap();
        let (header, markup) = dump.split_once("\n\n").unwrap();
        assert!(header.starts_with("OFXHEADER:100"));

        let sgml = StatementParser::new()
            .parse_file(Path::new("tests/fixtures/bank_sgml/input.ofx"), None)
            .unwrap();
        let xml = StatementParser::new().parse_str(markup.trim_end()).unwrap();
        assert_eq!(xml.transactions(), sgml.transactions());
        assert_eq!(xml.balance(), sgml.balance());
        assert_eq!(xml.header(), "");
    }

    #[test]
    fn test_summary_output() {
        let args =
            CliArgs::try_parse_from(["ofx-statement", "tests/fixtures/credit_card_sgml/input.ofx"])
                .unwrap();
        let mut output = Vec::new();
        cli::run(&args, &mut output).unwrap();

        let summary = String::from_utf8(output).unwrap();
        assert!(summary.starts_with("CreditCard account 4111111111111111 (EUR)"));
        assert!(summary.contains("Period: 2024-02-01 to 2024-02-29"));
        assert!(summary.contains("Transactions: 3"));
    }
}
