//! tap2junit - Convert Test Anything Protocol output into JUnit XML
//!
//! CI systems commonly understand JUnit XML reports but not TAP, the
//! line-oriented format printed by many test harnesses. This crate reads a TAP
//! stream into a structured report and writes that report as JUnit XML.
//!
//! # Architecture
//!
//! - [`tap`]: TAP stream parsing into a [`tap::Case`]
//! - [`convert`]: conversion of a [`tap::Case`] into a JUnit report
//! - [`junit`]: JUnit report model and XML writer
//! - [`config`]: conversion settings and the `.tap2junit.conf` file
//! - [`commands`]: the conversion command used by the `tap2junit` binary
//! - [`ui`]: User interface abstraction for output
//! - [`error`]: Error types and Result alias
//!
//! # Duration extension
//!
//! TAP has no standard way to report how long a test took. Annotation lines of
//! the form `# TAP2JUNIT: Duration: 10s` following a result line set that
//! test's time in the JUnit report.
//!
//! # Example
//!
//! ```
//! use tap2junit::{convert, junit, tap};
//!
//! # fn main() -> tap2junit::error::Result<()> {
//! let input = "1..2\n\
//!     ok 1 This test # comment 1\n\
//!     ## TAP2JUNIT: Duration: 10s\n\
//!     not ok 2 That test # comment 2\n\
//!     ## TAP2JUNIT: Duration: 20s\n";
//!
//! let case = tap::read(input.as_bytes(), &tap::ReadOpt::new("example"))?;
//! assert_eq!(case.plan(), Some((1, 2)));
//!
//! let suites = convert::from_tap(&case);
//! let xml = junit::to_string(&suites, false)?;
//! assert!(xml.contains(r#"tests="2" failures="1" time="30.000""#));
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod junit;
pub mod tap;
pub mod ui;

pub use error::{Error, Result};
