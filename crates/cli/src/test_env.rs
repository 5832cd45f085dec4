// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Testcase metadata and the process-wide global environment.
//!
//! The orchestrator owns test discovery and metadata parsing; this module
//! only models the fields a driver consumes. Metadata files accepted by the
//! `testdriver` binary are JSON5 (falling back to strict JSON).

use crate::error::{DriverError, DriverResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const DESCRIPTION: &str = "description";
pub const EXPECT_FAILURE: &str = "expect_failure";

/// Metadata of one testcase
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TestEnv {
    /// Directory holding the testcase fixtures
    #[serde(default)]
    pub test_dir: PathBuf,

    /// Name of the testcase, used to derive its working directory
    #[serde(default)]
    pub test_name: String,

    /// Every other metadata field, as written by the testcase author
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Expect-failure annotation of a testcase
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpectFailure {
    No,
    /// Expected to fail, with an optional single-line reason
    Yes { reason: Option<String> },
}

impl TestEnv {
    pub fn new(test_dir: impl Into<PathBuf>, test_name: impl Into<String>) -> Self {
        Self {
            test_dir: test_dir.into(),
            test_name: test_name.into(),
            fields: Map::new(),
        }
    }

    /// Set an arbitrary metadata field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_description(self, description: &str) -> Self {
        self.with_field(DESCRIPTION, description)
    }

    pub fn with_expect_failure(self, comment: &str) -> Self {
        self.with_field(EXPECT_FAILURE, comment)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Read the `expect_failure` annotation.
    ///
    /// Wrapped metadata can yield multi-line text; it is flattened to one
    /// line with newlines replaced by spaces and surrounding whitespace
    /// trimmed. `null` marks an expected failure without a reason. Any
    /// non-string value is a setup error.
    pub fn expect_failure(&self) -> DriverResult<ExpectFailure> {
        match self.fields.get(EXPECT_FAILURE) {
            None => Ok(ExpectFailure::No),
            Some(Value::Null) => Ok(ExpectFailure::Yes { reason: None }),
            Some(Value::String(comment)) => {
                let reason = comment.replace("\r\n", " ").replace('\n', " ");
                let reason = reason.trim();
                Ok(ExpectFailure::Yes {
                    reason: (!reason.is_empty()).then(|| reason.to_string()),
                })
            }
            Some(other) => Err(DriverError::setup(format!(
                "Invalid \"expect_failure\" entry: expected a string but got {}",
                value_kind(other)
            ))),
        }
    }

    /// Load metadata from a JSON5/JSON file.
    ///
    /// A missing `test_dir` defaults to the file's directory and a relative
    /// one is resolved against it. A missing `test_name` defaults to the last
    /// component of `test_dir`.
    pub fn load(path: &Path) -> DriverResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
        let mut env: TestEnv = parse_json5_or_json(&content).map_err(|e| {
            DriverError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if env.test_dir.as_os_str().is_empty() {
            env.test_dir = base.to_path_buf();
        } else if env.test_dir.is_relative() {
            env.test_dir = base.join(&env.test_dir);
        }

        if env.test_name.is_empty() {
            let dir = env
                .test_dir
                .canonicalize()
                .unwrap_or_else(|_| env.test_dir.clone());
            env.test_name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        Ok(env)
    }
}

/// Process-wide settings shared by every testcase
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlobalEnv {
    /// Root under which each testcase gets `<working_dir>/<test_name>`
    pub working_dir: PathBuf,
}

impl GlobalEnv {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

/// Parse content as JSON5, falling back to strict JSON on parse failure.
fn parse_json5_or_json<T: serde::de::DeserializeOwned>(
    content: &str,
) -> Result<T, serde_json::Error> {
    json5::from_str(content).or_else(|_| serde_json::from_str(content))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
#[path = "test_env_tests.rs"]
mod tests;
