// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured call data types.

use super::duration_serde;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// One subprocess invocation made by a driver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturedCall {
    /// Sequence number within the log
    pub seq: u64,

    /// Wall-clock timestamp of the record
    pub timestamp: SystemTime,

    /// Elapsed time since the log was created
    #[serde(rename = "elapsed_ms", with = "duration_serde")]
    pub elapsed: Duration,

    /// What was run
    pub args: CapturedArgs,

    /// How it ended
    pub outcome: CallOutcome,
}

/// Command line and working directory of a call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedArgs {
    pub argv: Vec<String>,
    pub cwd: Option<String>,
}

impl CapturedArgs {
    pub fn new(argv: Vec<String>, cwd: Option<String>) -> Self {
        Self { argv, cwd }
    }

    /// Program name (first argv element), if any
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

/// Terminal state of a call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallOutcome {
    Exited {
        code: i32,
    },
    TimedOut {
        #[serde(rename = "after_ms", with = "duration_serde")]
        after: Duration,
    },
    SpawnFailed {
        message: String,
    },
}

impl CallOutcome {
    /// Whether the call exited with status code 0
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Exited { code: 0 })
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutcome::Exited { code } => write!(f, "exited with status code {code}"),
            CallOutcome::TimedOut { after } => write!(f, "timed out after {}s", after.as_secs()),
            CallOutcome::SpawnFailed { message } => write!(f, "failed to start: {message}"),
        }
    }
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;
