// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring between the command line, configuration and a [`TestDriver`].

use crate::cli::Cli;
use crate::config::{ConfigError, DriverConfig};
use crate::driver::{CallMode, TestDriver};
use crate::env;
use crate::error::DriverError;
use crate::status::{Status, TestResult};
use crate::test_env::TestEnv;
use std::io::Write;
use std::path::{Path, PathBuf};
use testdriver_capture::{CallLog, CapturedCall};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One testcase run, ready to execute
#[derive(Debug)]
pub struct App {
    driver: TestDriver,
    command: Vec<String>,
    mode: CallMode,
    result_path: Option<PathBuf>,
}

impl App {
    /// Resolve configuration (file, environment, flags) and build the driver
    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        let config = resolve_config(&cli)?;
        let global_env = config.global_env()?;

        let mut test_env = TestEnv::load(&cli.env_file)?;
        if let Some(dir) = cli.test_dir {
            test_env.test_dir = dir;
        }
        if let Some(name) = cli.test_name {
            test_env.test_name = name;
        }
        if test_env.test_name.is_empty() {
            return Err(ConfigError::Invalid("testcase has no name".to_string()).into());
        }

        let mut driver = TestDriver::new(test_env, global_env).with_config(&config);
        if let Some(path) = cli.call_log {
            let log = CallLog::with_file(&path).map_err(|source| AppError::Write {
                path: path.clone(),
                source,
            })?;
            driver = driver.with_call_log(log);
        }

        Ok(Self {
            driver,
            command: cli.command,
            mode: if cli.no_check {
                CallMode::Unchecked
            } else {
                CallMode::Checked
            },
            result_path: cli.result,
        })
    }

    pub fn driver(&self) -> &TestDriver {
        &self.driver
    }

    /// Drive the testcase and write the result record if requested
    pub async fn execute(mut self) -> Result<Report, AppError> {
        let commands = vec![self.command.clone()];
        self.driver.run(&commands, self.mode).await?;
        let failed_calls = self.driver.call_log().find_failures();
        let result = self.driver.into_result();

        if let Some(path) = &self.result_path {
            write_result(path, &result)?;
        }
        Ok(Report {
            result,
            failed_calls,
        })
    }
}

/// What the binary reports after one testcase
#[derive(Debug)]
pub struct Report {
    pub result: TestResult,
    /// Calls that did not exit with status code 0
    pub failed_calls: Vec<CapturedCall>,
}

fn resolve_config(cli: &Cli) -> Result<DriverConfig, ConfigError> {
    let mut config = match cli.config.clone().or_else(env::config_path) {
        Some(path) => DriverConfig::load(&path)?,
        None => DriverConfig::default(),
    }
    .with_env_overrides();

    if let Some(dir) = &cli.working_dir {
        config.working_dir = Some(dir.clone());
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = Some(secs);
    }
    config.validate()?;
    Ok(config)
}

fn write_result(path: &Path, result: &TestResult) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json + "\n").map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the status line to `out`.
///
/// For a failing status, each failed call and then the diff (when there is
/// one) go to `err`.
pub fn print_report<O: Write, E: Write>(
    report: &Report,
    out: &mut O,
    err: &mut E,
) -> std::io::Result<()> {
    let result = &report.result;
    writeln!(out, "{}", result.summary())?;
    if matches!(
        result.status,
        Some(Status::Failed | Status::Xfail | Status::Problem)
    ) {
        for call in &report.failed_calls {
            writeln!(
                err,
                "call #{}: `{}` {}",
                call.seq,
                call.args.argv.join(" "),
                call.outcome
            )?;
        }
    }
    if let Some(diff) = &result.diff {
        write!(err, "{}", diff)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
