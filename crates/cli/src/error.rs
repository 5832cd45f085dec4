// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Driver error taxonomy.
//!
//! `Setup` and `Test` are abort conditions: any step of a testcase may return
//! one of them with `?`, and [`TestDriver::catch_test_errors`] turns them into
//! a terminal status. Every other variant is a process-level error that the
//! driver does not classify.
//!
//! [`TestDriver::catch_test_errors`]: crate::driver::TestDriver::catch_test_errors

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    /// The testcase fixture or metadata is invalid; it never meaningfully ran.
    #[error("{0}")]
    Setup(String),

    /// The testcase ran and its own logic decided it failed.
    #[error("{0}")]
    Test(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },
}

impl DriverError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }

    pub fn test(message: impl Into<String>) -> Self {
        Self::Test(message.into())
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
