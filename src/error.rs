//! Error types for tap2junit

use std::io;
use thiserror::Error;

/// Result type alias for tap2junit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tap2junit
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `Duration:` annotation carried a value that is not a duration.
    #[error("Invalid duration: {0:?}")]
    InvalidDuration(String),

    /// Single suite output was requested for a report with a different number of suites.
    #[error("Single suite output requires exactly one suite, found {0}")]
    SingleSuite(usize),

    /// Writing the XML report failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
