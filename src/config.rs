//! Conversion settings and the `.tap2junit.conf` file
//!
//! Settings can be stored in an INI file with a `[DEFAULT]` section:
//!
//! ```ini
//! [DEFAULT]
//! test_name=integration
//! reorder_duration=yes
//! single_suite=true
//! ```
//!
//! Command-line flags are applied on top of the file with [`Settings::merge`].

use crate::error::{Error, Result};
use crate::tap::ReadOpt;
use serde::de::value::MapDeserializer;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Conventional name of the settings file.
pub const CONFIG_FILE: &str = ".tap2junit.conf";

/// Settings for one TAP to JUnit conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Name of the test run, used as the suite name
    pub test_name: String,

    /// Attribute `Duration:` annotations to the following test
    #[serde(deserialize_with = "flag")]
    pub reorder_duration: bool,

    /// Attribute every annotation to the following test
    #[serde(deserialize_with = "flag")]
    pub reorder_all: bool,

    /// Emit a bare `<testsuite>` root instead of `<testsuites>`
    #[serde(deserialize_with = "flag")]
    pub single_suite: bool,
}

/// Values given on the command line or through the environment.
///
/// Each value that is set replaces the one from the settings file, so a flag
/// can switch off an option the file turns on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub test_name: Option<String>,
    pub reorder_duration: Option<bool>,
    pub reorder_all: Option<bool>,
    pub single_suite: Option<bool>,
}

impl Settings {
    /// Load settings from an INI file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&contents)
    }

    /// Parse settings from a string
    pub fn parse(contents: &str) -> Result<Self> {
        let ini: HashMap<String, HashMap<String, String>> = serde_ini::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;

        let default = ini
            .get("DEFAULT")
            .ok_or_else(|| Error::Config(format!("No [DEFAULT] section in {}", CONFIG_FILE)))?;

        let entries = MapDeserializer::<_, de::value::Error>::new(default.clone().into_iter());
        Settings::deserialize(entries)
            .map_err(|e| Error::Config(format!("Invalid {}: {}", CONFIG_FILE, e)))
    }

    /// Apply `overrides` on top of these settings.
    pub fn merge(self, overrides: Overrides) -> Settings {
        Settings {
            test_name: overrides.test_name.unwrap_or(self.test_name),
            reorder_duration: overrides.reorder_duration.unwrap_or(self.reorder_duration),
            reorder_all: overrides.reorder_all.unwrap_or(self.reorder_all),
            single_suite: overrides.single_suite.unwrap_or(self.single_suite),
        }
    }

    /// Parser options for these settings
    pub fn read_opt(&self) -> ReadOpt {
        ReadOpt {
            name: self.test_name.clone(),
            reorder_duration: self.reorder_duration,
            reorder_all: self.reorder_all,
        }
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(de::Error::invalid_value(
            Unexpected::Str(&value),
            &"a boolean (true/false, yes/no, on/off, 1/0)",
        )),
    }
}
