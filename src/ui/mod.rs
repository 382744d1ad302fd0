//! User interface abstraction
//!
//! This module provides the UI trait commands use to emit the report and
//! user-facing warnings.

use crate::error::Result;
use std::io::{self, Write};

#[cfg(test)]
pub mod test_ui;

/// Abstract UI trait for command output
pub trait UI {
    /// Output a warning message
    fn warning(&mut self, message: &str) -> Result<()>;

    /// Output raw bytes (e.g., the XML report)
    fn output_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        // Default implementation: write to stdout
        io::stdout().write_all(bytes)?;
        Ok(())
    }
}

/// Command-line UI implementation
pub struct CliUI {
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl CliUI {
    /// Creates a new command-line UI instance using stdout and stderr.
    pub fn new() -> Self {
        CliUI {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }
}

impl Default for CliUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI for CliUI {
    fn warning(&mut self, message: &str) -> Result<()> {
        writeln!(self.stderr, "Warning: {}", message)?;
        Ok(())
    }

    fn output_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.stdout.write_all(bytes)?;
        self.stdout.flush()?;
        Ok(())
    }
}
