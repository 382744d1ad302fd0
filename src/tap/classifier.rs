//! TAP line grammars
//!
//! Every input line is matched against a fixed table of grammars, tried in
//! priority order. The grammars overlap (an annotation may mention `ok`, a
//! bail-out reason may look like anything), so the first match decides.

use super::Status;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::warn;

/// Highest test number accepted from a plan or result line.
///
/// Results are stored densely by test number, so larger numbers are treated
/// as unrecognized lines.
pub const MAX_TESTS: usize = 1 << 20;

/// The grammar a line was matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `TAP version 13`
    Version,
    /// `1..42`
    Plan,
    /// `ok 41 some text # TODO some comment`
    Pass,
    /// `not ok 42 some test # SKIP some comment`
    Fail,
    /// `# free text`
    Annotation,
    /// `Bail out! reason`
    BailOut,
}

/// A test result line, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine<'a> {
    /// Explicit test number, if the line carries one.
    pub number: Option<usize>,
    /// Status after applying any TODO/SKIP directive.
    pub status: Status,
    /// Text between the test number and `#`, trimmed.
    pub header: &'a str,
    /// Everything after the leading `ok` / `not ok`.
    pub remainder: &'a str,
}

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Version(u32),
    Plan { first: usize, last: usize },
    Result(ResultLine<'a>),
    Annotation(&'a str),
    BailOut(&'a str),
    Unrecognized,
}

/// Grammars in dispatch order.
static GRAMMARS: LazyLock<Vec<(LineKind, Regex)>> = LazyLock::new(|| {
    [
        (LineKind::Version, r"^TAP version (?P<version>\d+)"),
        (
            LineKind::Plan,
            r"^(?P<first>\d+)\.\.(?P<last>\d+)\s*(?:#.*)?$",
        ),
        (LineKind::Pass, r"^ok(?P<rest>(?:\s.*)?)$"),
        (LineKind::Fail, r"^not ok(?P<rest>(?:\s.*)?)$"),
        (LineKind::Annotation, r"^#"),
        (LineKind::BailOut, r"Bail out!\s*(?P<reason>.*)"),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        let re = Regex::new(pattern).expect("TAP line grammar is valid");
        (kind, re)
    })
    .collect()
});

/// Splits the part of a result line that follows `ok` / `not ok`.
static RESULT_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<number>\d+)?(?P<header>[^#]*)(?:#\s*(?P<directive>(?i:todo|skip))?.*)?$",
    )
    .expect("TAP result body regex is valid")
});

/// Classify a single line of TAP input.
pub fn classify(line: &str) -> Line<'_> {
    for (kind, re) in GRAMMARS.iter() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        // A line whose numbers do not fit falls through to the next grammar.
        if let Some(parsed) = build(*kind, line, &caps) {
            return parsed;
        }
    }
    Line::Unrecognized
}

fn build<'a>(kind: LineKind, line: &'a str, caps: &Captures<'a>) -> Option<Line<'a>> {
    match kind {
        LineKind::Version => caps["version"].parse().ok().map(Line::Version),
        LineKind::Plan => Some(Line::Plan {
            first: test_number(&caps["first"], line)?,
            last: test_number(&caps["last"], line)?,
        }),
        LineKind::Pass => result_line(caps.name("rest")?.as_str(), Status::Passed),
        LineKind::Fail => result_line(caps.name("rest")?.as_str(), Status::Failed),
        LineKind::Annotation => Some(Line::Annotation(line)),
        LineKind::BailOut => Some(Line::BailOut(caps.name("reason")?.as_str().trim_end())),
    }
}

fn test_number(digits: &str, line: &str) -> Option<usize> {
    match digits.parse::<usize>() {
        Ok(n) if n <= MAX_TESTS => Some(n),
        _ => {
            warn!(line, limit = MAX_TESTS, "ignoring test number above the limit");
            None
        }
    }
}

fn result_line(rest: &str, default: Status) -> Option<Line<'_>> {
    let caps = RESULT_BODY.captures(rest)?;
    let number = match caps.name("number") {
        Some(m) => Some(test_number(m.as_str(), rest)?),
        None => None,
    };
    let directive = caps.name("directive").map(|m| m.as_str());
    Some(Line::Result(ResultLine {
        number,
        status: Status::from_directive(directive, default),
        header: caps.name("header").map_or("", |m| m.as_str().trim()),
        remainder: rest,
    }))
}
