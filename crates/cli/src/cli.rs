// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line interface of the `testdriver` binary.

use clap::Parser;
use std::path::PathBuf;

/// Run one testcase and score its output against the golden file
#[derive(Parser, Debug, Clone)]
#[command(name = "testdriver", version, about = "Golden-output test driver")]
pub struct Cli {
    /// Testcase metadata file (JSON5 or JSON)
    #[arg(long = "env", value_name = "FILE")]
    pub env_file: PathBuf,

    /// Fixture directory, overriding `test_dir` from the metadata file
    #[arg(long, value_name = "DIR")]
    pub test_dir: Option<PathBuf>,

    /// Testcase name, overriding `test_name` from the metadata file
    #[arg(long, value_name = "NAME")]
    pub test_name: Option<String>,

    /// Root of per-test working directories
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Do not append a diagnostic line when the command exits with a nonzero status
    #[arg(long)]
    pub no_check: bool,

    /// Write the JSON result record to this file
    #[arg(long, value_name = "FILE")]
    pub result: Option<PathBuf>,

    /// Write a JSONL log of every subprocess call to this file
    #[arg(long, value_name = "FILE")]
    pub call_log: Option<PathBuf>,

    /// Command to run in the working directory
    #[arg(last = true, required = true, value_name = "ARGV")]
    pub command: Vec<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
