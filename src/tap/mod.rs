//! TAP stream parsing
//!
//! This module reads a Test Anything Protocol stream (see
//! <https://testanything.org>) into a [`Case`]. Parsing is a single pass: each
//! line is classified by [`classifier::classify`] and applied to the report,
//! and a `Bail out!` line stops reading altogether.
//!
//! Besides the standard grammar, annotation lines of the form
//! `# TAP2JUNIT: Duration: 10s` record how long a test took. Some producers
//! print that annotation before the result line it belongs to; the
//! [`ReadOpt::reorder_duration`] and [`ReadOpt::reorder_all`] options
//! attribute annotations to the next test instead of the current one.

pub mod classifier;
pub mod duration;

use crate::error::Result;
use classifier::{Line, ResultLine};
use std::fmt;
use std::io::BufRead;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// TAP version assumed until a `TAP version` line says otherwise.
pub const DEFAULT_VERSION: u32 = 12;

/// Internal prefix of extension annotations, stripped before `Duration:`.
const EXTENSION_PREFIX: &str = "TAP2JUNIT:";

const DURATION_KEY: &str = "Duration:";

/// Status of a single TAP test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// Declared by the plan but never reported.
    #[default]
    Unknown,
    /// `ok`
    Passed,
    /// `not ok`
    Failed,
    /// Carried a `SKIP` directive.
    Skipped,
    /// Carried a `TODO` directive.
    Todo,
}

impl Status {
    /// Applies a TODO/SKIP directive (case-insensitive) to a default status.
    ///
    /// Any other directive text leaves `default` untouched.
    pub fn from_directive(directive: Option<&str>, default: Status) -> Status {
        match directive {
            Some(d) if d.eq_ignore_ascii_case("todo") => Status::Todo,
            Some(d) if d.eq_ignore_ascii_case("skip") => Status::Skipped,
            _ => default,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Unknown => write!(f, "unknown"),
            Status::Passed => write!(f, "passed"),
            Status::Failed => write!(f, "failed"),
            Status::Skipped => write!(f, "skipped"),
            Status::Todo => write!(f, "todo"),
        }
    }
}

/// Result of a single TAP test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResult {
    /// Status of this test.
    pub status: Status,
    /// How long the test took; zero unless an annotation reported it.
    pub duration: Duration,
    /// Title of the test: the text between the test number and `#`.
    pub header: String,
    /// Result line remainder and attached annotations, newline-joined.
    pub raw: String,
}

/// The result of running a TAP test suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// TAP specification version. [`DEFAULT_VERSION`] means pre-13.
    pub version: u32,
    /// Name of the test run.
    pub name: String,
    /// First test declared by the plan, if a plan was seen.
    pub first: Option<usize>,
    /// Last test, from the plan or the highest reported test number.
    pub last: Option<usize>,
    /// Test results; slot `i` holds test number `i + 1`.
    pub results: Vec<TestResult>,
    /// Every line read, each terminated by a newline.
    pub raw: String,
    /// Reason given on a `Bail out!` line, if the stream bailed out.
    pub bail_out: Option<String>,
}

impl Case {
    /// Creates an empty report for the named run.
    pub fn new(name: impl Into<String>) -> Self {
        Case {
            version: DEFAULT_VERSION,
            name: name.into(),
            first: None,
            last: None,
            results: Vec::new(),
            raw: String::new(),
            bail_out: None,
        }
    }

    /// Returns the declared test range once both ends are known.
    pub fn plan(&self) -> Option<(usize, usize)> {
        Some((self.first?, self.last?))
    }

    /// Returns the number of results with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Returns true if the stream ended on a `Bail out!` line.
    pub fn is_bailed_out(&self) -> bool {
        self.bail_out.is_some()
    }

    /// Returns the result for a 1-based test number.
    pub fn result(&self, number: usize) -> Option<&TestResult> {
        number.checked_sub(1).and_then(|i| self.results.get(i))
    }

    /// Grows `results` to at least `len` slots, keeping existing entries.
    fn grow(&mut self, len: usize) {
        if self.results.len() < len {
            self.results.resize_with(len, TestResult::default);
        }
    }
}

/// Options for [`read`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOpt {
    /// Name given to the resulting [`Case`].
    pub name: String,
    /// Attribute `Duration:` annotations to the next test.
    pub reorder_duration: bool,
    /// Attribute every annotation to the next test, reading each as a duration.
    pub reorder_all: bool,
}

impl ReadOpt {
    /// Creates options with both reorder workarounds disabled.
    pub fn new(name: impl Into<String>) -> Self {
        ReadOpt {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Parse a TAP stream into a [`Case`].
///
/// Reading stops at end of input or at a `Bail out!` line. Lines that match no
/// TAP grammar are kept in [`Case::raw`] and otherwise ignored. I/O errors,
/// including input that is not valid UTF-8, are returned as
/// [`Error::Io`](crate::error::Error::Io).
pub fn read<R: BufRead>(input: R, opt: &ReadOpt) -> Result<Case> {
    let mut reader = Reader::new(opt);
    for line in input.lines() {
        let line = line?;
        if reader.feed(&line).is_break() {
            break;
        }
    }
    Ok(reader.finish())
}

/// Parse TAP text held in memory.
pub fn read_str(input: &str, opt: &ReadOpt) -> Case {
    let mut reader = Reader::new(opt);
    for line in input.lines() {
        if reader.feed(line).is_break() {
            break;
        }
    }
    reader.finish()
}

/// Parser state for one pass over a TAP stream.
struct Reader<'o> {
    opt: &'o ReadOpt,
    case: Case,
    /// Number of the test most recently given a result; 0 before any.
    current: usize,
}

impl<'o> Reader<'o> {
    fn new(opt: &'o ReadOpt) -> Self {
        Reader {
            opt,
            case: Case::new(opt.name.clone()),
            current: 0,
        }
    }

    fn feed(&mut self, line: &str) -> ControlFlow<()> {
        self.case.raw.push_str(line);
        self.case.raw.push('\n');
        trace!(line, "text");

        match classifier::classify(line) {
            Line::Version(version) => {
                debug!(version, "version");
                self.case.version = version;
            }
            Line::Plan { first, last } => {
                debug!(first, last, "plan");
                self.case.first = Some(first);
                self.case.last = Some(last);
                self.case.grow(last);
            }
            Line::Result(result) => self.record(result),
            Line::Annotation(text) => self.annotate(text),
            Line::BailOut(reason) => {
                info!(reason, "bail out, ignoring the rest of the stream");
                self.case.bail_out = Some(reason.to_string());
                return ControlFlow::Break(());
            }
            Line::Unrecognized => debug!(line, "no match"),
        }
        ControlFlow::Continue(())
    }

    fn record(&mut self, line: ResultLine<'_>) {
        let number = line.number.unwrap_or(self.current + 1);
        if number == 0 {
            warn!(line = line.remainder, "ignoring result for test number 0");
            return;
        }
        debug!(number, status = %line.status, header = line.header, "result");

        self.current = number;
        self.case.grow(number);
        if self.case.last.map_or(true, |last| last < number) {
            self.case.last = Some(number);
        }

        let slot = &mut self.case.results[number - 1];
        // Annotations redirected here by a reorder option come first.
        if slot.status == Status::Unknown && !slot.raw.is_empty() {
            slot.raw.push('\n');
            slot.raw.push_str(line.remainder);
        } else {
            slot.raw = line.remainder.to_string();
        }
        slot.status = line.status;
        slot.header = line.header.to_string();
    }

    fn annotate(&mut self, text: &str) {
        let extension = extension_body(text);
        let duration_text = extension.strip_prefix(DURATION_KEY).map(str::trim);
        let is_duration = duration_text.is_some();

        let reorder = self.opt.reorder_all || (self.opt.reorder_duration && is_duration);
        let target = if reorder {
            self.current + 1
        } else {
            self.current
        };
        if target == 0 {
            debug!(text, "annotation before any test result");
            return;
        }
        debug!(target, text, "annotation");

        self.case.grow(target);
        let slot = &mut self.case.results[target - 1];
        if !slot.raw.is_empty() {
            slot.raw.push('\n');
        }
        slot.raw.push_str(text);

        if is_duration || self.opt.reorder_all {
            let value = duration_text.unwrap_or(extension);
            slot.duration = match duration::parse(value) {
                Ok(d) => d,
                Err(e) => {
                    warn!(test = target, "could not parse duration: {}", e);
                    Duration::ZERO
                }
            };
        }
    }

    fn finish(self) -> Case {
        self.case
    }
}

/// Strips the comment marker and the internal extension prefix.
fn extension_body(text: &str) -> &str {
    let body = text.strip_prefix('#').unwrap_or(text).trim();
    match body.strip_prefix(EXTENSION_PREFIX) {
        Some(rest) => rest.trim(),
        None => body,
    }
}
