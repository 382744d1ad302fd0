//! Test utilities for UI testing

use crate::error::Result;
use crate::ui::UI;

/// A UI implementation for testing that captures output in vectors
pub struct TestUI {
    pub errors: Vec<String>,
    pub bytes_output: Vec<Vec<u8>>,
}

impl TestUI {
    pub fn new() -> Self {
        TestUI {
            errors: Vec::new(),
            bytes_output: Vec::new(),
        }
    }

    /// All bytes written so far, as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes_output.concat()).into_owned()
    }
}

impl Default for TestUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI for TestUI {
    fn warning(&mut self, message: &str) -> Result<()> {
        self.errors.push(format!("Warning: {}", message));
        Ok(())
    }

    fn output_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes_output.push(bytes.to_vec());
        Ok(())
    }
}
