// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Testcase status and the result record handed back to the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of a testcase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Passed,
    Failed,
    /// Failed, and the testcase is annotated as an expected failure
    Xfail,
    /// Passed although the testcase is annotated as an expected failure
    Uok,
    /// Fixture or environment invalid
    Problem,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passed => "PASSED",
            Status::Failed => "FAILED",
            Status::Xfail => "XFAIL",
            Status::Uok => "UOK",
            Status::Problem => "PROBLEM",
        }
    }

    /// Statuses an orchestrator should count against the testsuite
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failed | Status::Uok | Status::Problem)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one testcase, accumulated across tear-up and run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub expected_output: String,

    /// Captured text of every call, concatenated in call order
    pub actual_output: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Unified diff of expected vs actual output when the comparison failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl TestResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: Status, message: Option<String>) {
        self.status = Some(status);
        self.status_message = message;
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_some()
    }

    /// One-line summary: `STATUS` or `STATUS: message`
    pub fn summary(&self) -> String {
        match (self.status, self.status_message.as_deref()) {
            (None, _) => "NOT RUN".to_string(),
            (Some(status), None) => status.to_string(),
            (Some(status), Some(message)) => format!("{}: {}", status, message),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
