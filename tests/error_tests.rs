//! Error path testing
//!
//! This module tests error handling in various failure scenarios to ensure
//! errors are reported and non-fatal problems are tolerated.

use std::fs;
use std::io::{self, BufRead, Read};
use std::time::Duration;
use tap2junit::commands::ConvertCommand;
use tap2junit::config::Settings;
use tap2junit::error::{Error, Result};
use tap2junit::junit::{self, Testsuites};
use tap2junit::tap::{self, ReadOpt, Status};
use tap2junit::ui::UI;
use tempfile::TempDir;

// Test UI implementation
struct TestUI {
    pub output: Vec<u8>,
    pub warnings: Vec<String>,
}

impl TestUI {
    fn new() -> Self {
        TestUI {
            output: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl UI for TestUI {
    fn warning(&mut self, message: &str) -> Result<()> {
        self.warnings.push(message.to_string());
        Ok(())
    }

    fn output_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }
}

/// A reader that yields some lines and then fails.
struct FailingReader {
    data: io::Cursor<Vec<u8>>,
}

impl FailingReader {
    fn new(prefix: &str) -> Self {
        FailingReader {
            data: io::Cursor::new(prefix.as_bytes().to_vec()),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "pipe closed"));
        }
        Ok(n)
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let remaining = self.data.get_ref().len() as u64 - self.data.position();
        if remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "pipe closed"));
        }
        self.data.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.data.consume(amt)
    }
}

#[test]
fn test_read_error_is_propagated() {
    let result = tap::read(FailingReader::new("1..2\nok 1 fine\n"), &ReadOpt::default());

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("pipe closed"));
}

#[test]
fn test_convert_command_read_error_writes_nothing() {
    let mut ui = TestUI::new();
    let cmd = ConvertCommand::new(Settings::default());

    let result = cmd.execute(FailingReader::new("ok 1\n"), &mut ui);

    assert!(result.is_err());
    assert!(ui.output.is_empty());
}

#[test]
fn test_single_suite_with_no_suites() {
    let result = junit::to_string(&Testsuites::default(), true);

    let err = result.unwrap_err();
    assert!(matches!(err, Error::SingleSuite(0)));
    assert!(err.to_string().contains("exactly one suite"));
}

#[test]
fn test_malformed_duration_is_not_fatal() {
    let input = "ok 1 first\n# TAP2JUNIT: Duration: a while\nok 2 second\n# TAP2JUNIT: Duration: 2s\n";
    let case = tap::read(input.as_bytes(), &ReadOpt::default()).unwrap();

    assert_eq!(case.results[0].duration, Duration::ZERO);
    assert_eq!(case.results[1].duration, Duration::from_secs(2));
}

#[test]
fn test_reorder_all_zeroes_non_duration_comments() {
    let input = "# TAP2JUNIT: Duration: 3s\n# just a note\nok 1 first\n";
    let opt = ReadOpt {
        reorder_all: true,
        ..ReadOpt::new("all")
    };
    let case = tap::read(input.as_bytes(), &opt).unwrap();

    assert_eq!(case.results[0].status, Status::Passed);
    assert_eq!(case.results[0].duration, Duration::ZERO);
    assert_eq!(
        case.results[0].raw,
        "# TAP2JUNIT: Duration: 3s\n# just a note\n 1 first"
    );
}

#[test]
fn test_garbage_lines_are_skipped() {
    let input = "make[1]: Entering directory\n1..1\n  ---\nwarning: unused variable\nok 1 survived\n";
    let case = tap::read(input.as_bytes(), &ReadOpt::default()).unwrap();

    assert_eq!(case.results.len(), 1);
    assert_eq!(case.results[0].header, "survived");
    assert_eq!(case.raw, input);
}

#[test]
fn test_config_file_not_found() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load_from_file(&temp.path().join("missing.conf"));

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("missing.conf"));
}

#[test]
fn test_config_file_invalid_flag() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".tap2junit.conf");
    fs::write(&path, "[DEFAULT]\nreorder_all=sometimes\n").unwrap();

    let result = Settings::load_from_file(&path);

    assert!(matches!(result, Err(Error::Config(_))));
}
