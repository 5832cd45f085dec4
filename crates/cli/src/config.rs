// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Driver configuration loaded from TOML.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! variables (see [`crate::env`]), then command-line flags.

use crate::env;
use crate::test_env::GlobalEnv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default name of the file each call's combined output is written to
pub const DEFAULT_OUTPUT_FILE: &str = "actual.out";
/// Default name of the expected-output fixture
pub const DEFAULT_EXPECTED_FILE: &str = "test.out";

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_expected_file() -> String {
    DEFAULT_EXPECTED_FILE.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Root of all per-test working directories
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Per-call subprocess timeout in seconds (default: none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Output file name inside the working directory
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Expected-output fixture name
    #[serde(default = "default_expected_file")]
    pub expected_file: String,

    /// Replacement for the working directory path in actual output
    #[serde(default)]
    pub path_substitute: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            working_dir: None,
            timeout_secs: None,
            output_file: default_output_file(),
            expected_file: default_expected_file(),
            path_substitute: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("no working directory configured (set working_dir, TESTDRIVER_WORKING_DIR or --working-dir)")]
    MissingWorkingDir,
}

impl DriverConfig {
    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DriverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TESTDRIVER_WORKING_DIR` and `TESTDRIVER_TIMEOUT_SECS`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env::working_dir() {
            self.working_dir = Some(dir);
        }
        if let Some(secs) = env::timeout_secs() {
            self.timeout_secs = Some(secs);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "timeout_secs must be positive".to_string(),
            ));
        }
        for (field, name) in [
            ("output_file", &self.output_file),
            ("expected_file", &self.expected_file),
        ] {
            if !is_plain_file_name(name) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a plain file name, got {:?}",
                    field, name
                )));
            }
        }
        if self.output_file == self.expected_file {
            return Err(ConfigError::Invalid(
                "output_file and expected_file must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn global_env(&self) -> Result<GlobalEnv, ConfigError> {
        self.working_dir
            .as_ref()
            .map(GlobalEnv::new)
            .ok_or(ConfigError::MissingWorkingDir)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
