//! Convert a TAP stream into a JUnit XML report

use crate::config::Settings;
use crate::convert;
use crate::error::Result;
use crate::junit;
use crate::tap;
use crate::ui::UI;
use std::io::BufRead;
use tracing::info;

pub struct ConvertCommand {
    settings: Settings,
}

impl ConvertCommand {
    pub fn new(settings: Settings) -> Self {
        ConvertCommand { settings }
    }

    /// Read TAP from `input` and emit the JUnit report through `ui`.
    ///
    /// The exit code is 0 whenever a report was written, even if tests failed.
    pub fn execute<R: BufRead>(&self, input: R, ui: &mut dyn UI) -> Result<i32> {
        let case = tap::read(input, &self.settings.read_opt())?;

        if let Some(reason) = &case.bail_out {
            ui.warning(&format!("TAP stream bailed out: {}", reason))?;
        }

        let suites = convert::from_tap(&case);
        info!(
            name = %case.name,
            tests = suites.tests,
            failures = suites.failures,
            time = %suites.time,
            "converted TAP stream"
        );

        let mut buffer = Vec::new();
        junit::write(&suites, &mut buffer, self.settings.single_suite)?;
        ui.output_bytes(&buffer)?;
        Ok(0)
    }
}
