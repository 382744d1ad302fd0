//! JUnit XML report model and writer
//!
//! The layout matches what CI dashboards expect from `tap2junit`: an XML
//! declaration on the first line, then one element per line, indented by
//! three spaces per level (the root itself is indented once). Failure bodies
//! are written as CDATA.

use crate::error::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fmt;
use std::io::Write;
use std::time::Duration;

const INDENT: &str = "   ";

/// A duration written as seconds with millisecond precision, e.g. `30.000`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DurationSec(pub Duration);

impl fmt::Display for DurationSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0.as_secs_f64())
    }
}

/// Root of a JUnit report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Testsuites {
    pub id: String,
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub time: DurationSec,
    pub suites: Vec<Suite>,
}

/// One `<testsuite>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suite {
    pub id: String,
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub time: DurationSec,
    pub testcases: Vec<TestCase>,
}

/// One `<testcase>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub time: DurationSec,
    pub failures: Vec<Failure>,
}

/// A `<failure>` inside a test case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
    /// Short description, written as the `message` attribute.
    pub message: String,
    /// Failure type, written as the `type` attribute.
    pub kind: String,
    /// Full failure output, written as CDATA.
    pub text: String,
}

/// Write `suites` as JUnit XML.
///
/// With `single_suite` the report must hold exactly one suite, and only that
/// `<testsuite>` element is written as the document root.
pub fn write<W: Write>(suites: &Testsuites, out: W, single_suite: bool) -> Result<()> {
    let mut xml = XmlWriter::new(out);
    xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    if single_suite {
        match suites.suites.as_slice() {
            [suite] => xml.suite(suite, 0),
            other => Err(Error::SingleSuite(other.len())),
        }
    } else {
        xml.suites(suites)
    }
}

/// Render `suites` into a string.
pub fn to_string(suites: &Testsuites, single_suite: bool) -> Result<String> {
    let mut buf = Vec::new();
    write(suites, &mut buf, single_suite)?;
    String::from_utf8(buf).map_err(|e| Error::Xml(e.to_string()))
}

fn xml_error(e: impl fmt::Display) -> Error {
    Error::Xml(e.to_string())
}

struct XmlWriter<W: Write> {
    writer: quick_xml::Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    fn new(out: W) -> Self {
        XmlWriter {
            writer: quick_xml::Writer::new(out),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(xml_error)
    }

    fn newline(&mut self, depth: usize) -> Result<()> {
        let pad = format!("\n{}", INDENT.repeat(depth + 1));
        self.event(Event::Text(BytesText::from_escaped(pad)))
    }

    fn open(&mut self, start: BytesStart<'_>, depth: usize) -> Result<()> {
        self.newline(depth)?;
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str, depth: usize, had_children: bool) -> Result<()> {
        if had_children {
            self.newline(depth)?;
        }
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn suites(&mut self, suites: &Testsuites) -> Result<()> {
        let tests = suites.tests.to_string();
        let failures = suites.failures.to_string();
        let time = suites.time.to_string();
        let start = BytesStart::new("testsuites").with_attributes([
            ("id", suites.id.as_str()),
            ("name", suites.name.as_str()),
            ("tests", tests.as_str()),
            ("failures", failures.as_str()),
            ("time", time.as_str()),
        ]);
        self.open(start, 0)?;
        for suite in &suites.suites {
            self.suite(suite, 1)?;
        }
        self.close("testsuites", 0, !suites.suites.is_empty())
    }

    fn suite(&mut self, suite: &Suite, depth: usize) -> Result<()> {
        let tests = suite.tests.to_string();
        let failures = suite.failures.to_string();
        let time = suite.time.to_string();
        let start = BytesStart::new("testsuite").with_attributes([
            ("id", suite.id.as_str()),
            ("name", suite.name.as_str()),
            ("tests", tests.as_str()),
            ("failures", failures.as_str()),
            ("time", time.as_str()),
        ]);
        self.open(start, depth)?;
        for case in &suite.testcases {
            self.testcase(case, depth + 1)?;
        }
        self.close("testsuite", depth, !suite.testcases.is_empty())
    }

    fn testcase(&mut self, case: &TestCase, depth: usize) -> Result<()> {
        let time = case.time.to_string();
        let start = BytesStart::new("testcase").with_attributes([
            ("id", case.id.as_str()),
            ("name", case.name.as_str()),
            ("time", time.as_str()),
        ]);
        self.open(start, depth)?;
        for failure in &case.failures {
            self.failure(failure, depth + 1)?;
        }
        self.close("testcase", depth, !case.failures.is_empty())
    }

    fn failure(&mut self, failure: &Failure, depth: usize) -> Result<()> {
        let start = BytesStart::new("failure").with_attributes([
            ("message", failure.message.as_str()),
            ("type", failure.kind.as_str()),
        ]);
        self.open(start, depth)?;
        for chunk in cdata_chunks(&failure.text) {
            self.event(Event::CData(BytesCData::new(chunk)))?;
        }
        self.close("failure", depth, false)
    }
}

/// Splits text so that no chunk contains the CDATA terminator `]]>`.
fn cdata_chunks(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        // Keep `]]` in this chunk and start the next one at `>`.
        chunks.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    chunks.push(rest);
    chunks
}
