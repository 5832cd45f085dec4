// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by testdriver are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::path::PathBuf;

/// `TESTDRIVER_CONFIG`: Path to a TOML driver configuration file.
pub fn config_path() -> Option<PathBuf> {
    var_path(names::TESTDRIVER_CONFIG)
}

/// `TESTDRIVER_WORKING_DIR`: Root under which per-test working directories are created.
pub fn working_dir() -> Option<PathBuf> {
    var_path(names::TESTDRIVER_WORKING_DIR)
}

/// `TESTDRIVER_TIMEOUT_SECS`: Per-call subprocess timeout.
pub fn timeout_secs() -> Option<u64> {
    std::env::var(names::TESTDRIVER_TIMEOUT_SECS)
        .ok()
        .and_then(|v| v.trim().parse().ok())
}

fn var_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
