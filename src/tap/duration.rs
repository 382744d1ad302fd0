//! Parsing of the `Duration:` annotation value
//!
//! Producers write durations as one or more decimal terms with a unit suffix,
//! such as `10s`, `4.3ms` or `1h30m`. Anything that does not fit that grammar
//! is handed to `humantime`, so forms like `2min 3s` are accepted as well.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// One `<number><unit>` term, anchored at the start of the remaining input.
static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<int>\d*)(?:\.(?P<frac>\d*))?(?P<unit>ns|us|µs|μs|ms|s|m|h)")
        .expect("duration term regex is valid")
});

fn unit_nanos(unit: &str) -> u128 {
    match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        _ => 3_600 * NANOS_PER_SEC,
    }
}

/// Parse a duration such as `10s` or `4.3ms`.
///
/// Returns [`Error::InvalidDuration`] when the text is neither a sequence of
/// decimal terms nor something `humantime` understands.
pub fn parse(text: &str) -> Result<Duration> {
    let text = text.trim();
    if text == "0" {
        return Ok(Duration::ZERO);
    }
    parse_terms(text)
        .or_else(|| humantime::parse_duration(text).ok())
        .ok_or_else(|| Error::InvalidDuration(text.to_string()))
}

fn parse_terms(text: &str) -> Option<Duration> {
    if text.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let caps = TERM.captures(rest)?;
        let int = caps.name("int").map_or("", |m| m.as_str());
        let frac = caps.name("frac").map_or("", |m| m.as_str());
        if int.is_empty() && frac.is_empty() {
            return None;
        }
        let unit = unit_nanos(&caps["unit"]);

        let whole: u128 = if int.is_empty() { 0 } else { int.parse().ok()? };
        total = total.checked_add(whole.checked_mul(unit)?)?;

        // Digits past nanosecond precision cannot change the result.
        let frac = &frac[..frac.len().min(18)];
        if !frac.is_empty() {
            let scale = 10u128.pow(frac.len() as u32);
            let digits: u128 = frac.parse().ok()?;
            total = total.checked_add(digits * unit / scale)?;
        }

        rest = &rest[caps.get(0)?.end()..];
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}
