// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with combined output capture.

use crate::error::{DriverError, DriverResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

const SHEBANG_LIMIT: u64 = 256;

/// How a subprocess ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exited on its own. Children killed by a signal report `-signal`.
    Exited { code: i32 },
    /// Killed after exceeding the timeout
    TimedOut { after: Duration },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited { code: 0 })
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            RunOutcome::Exited { code } => Some(*code),
            RunOutcome::TimedOut { .. } => None,
        }
    }
}

/// Spawns commands for a driver
#[derive(Clone, Debug, Default)]
pub struct Runner {
    timeout: Option<Duration>,
}

impl Runner {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `argv` in `cwd`, sending both stdout and stderr to `output`.
    ///
    /// `output` is truncated first. Stdin is closed.
    pub async fn run(&self, argv: &[String], cwd: &Path, output: &Path) -> DriverResult<RunOutcome> {
        let command_line = resolve_shebang(argv, cwd)?;
        let Some((program, args)) = command_line.split_first() else {
            return Err(DriverError::Spawn {
                program: String::new(),
                message: "empty command line".to_string(),
            });
        };

        let stdout = File::create(output).map_err(|e| DriverError::io(output, e))?;
        let stderr = stdout.try_clone().map_err(|e| DriverError::io(output, e))?;

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DriverError::Spawn {
                program: program.clone(),
                message: e.to_string(),
            })?;

        let status = match self.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status,
                    Err(_) => {
                        tracing::warn!(program = %program, ?limit, "subprocess timed out, killing it");
                        if let Err(e) = child.kill().await {
                            tracing::warn!(program = %program, error = %e, "failed to kill timed-out subprocess");
                        }
                        return Ok(RunOutcome::TimedOut { after: limit });
                    }
                }
            }
            None => child.wait().await,
        }
        .map_err(|e| DriverError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        })?;

        Ok(RunOutcome::Exited {
            code: exit_code(status),
        })
    }
}

/// Prepend the interpreter named by a `#!` line when `argv[0]` is a script.
///
/// Relative script paths are looked up from `cwd`. Following the kernel's
/// convention, everything after the interpreter path is passed as a single
/// argument.
pub fn resolve_shebang(argv: &[String], cwd: &Path) -> DriverResult<Vec<String>> {
    let Some(first) = argv.first() else {
        return Ok(Vec::new());
    };

    let script = PathBuf::from(first);
    if script.is_relative() && script.components().count() == 1 {
        // Bare program name, looked up through PATH
        return Ok(argv.to_vec());
    }
    let path = if script.is_absolute() {
        script
    } else {
        cwd.join(script)
    };
    if !path.is_file() {
        return Ok(argv.to_vec());
    }

    let file = File::open(&path).map_err(|e| DriverError::io(&path, e))?;
    let mut first_line = Vec::new();
    BufReader::new(file)
        .take(SHEBANG_LIMIT)
        .read_until(b'\n', &mut first_line)
        .map_err(|e| DriverError::io(&path, e))?;

    let Some(rest) = first_line.strip_prefix(b"#!") else {
        return Ok(argv.to_vec());
    };
    let rest = String::from_utf8_lossy(rest);
    let rest = rest.trim();
    let (interpreter, argument) = match rest.split_once(char::is_whitespace) {
        Some((interpreter, argument)) => (interpreter, Some(argument.trim())),
        None => (rest, None),
    };
    if interpreter.is_empty() {
        return Ok(argv.to_vec());
    }

    let mut command_line = vec![interpreter.to_string()];
    command_line.extend(argument.filter(|a| !a.is_empty()).map(str::to_string));
    command_line.extend(argv.iter().cloned());
    Ok(command_line)
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
