// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-testcase driver: workspace setup, subprocess calls, scoring.
//!
//! A driver walks one testcase through
//! `tear_up → call/call_and_check (any count) → analyze`. Any step may abort
//! the testcase by returning [`DriverError::Setup`] or [`DriverError::Test`];
//! [`TestDriver::catch_test_errors`] is the single place where those become a
//! terminal status.

use crate::config::DriverConfig;
use crate::diff::OutputComparator;
use crate::error::{DriverError, DriverResult};
use crate::runner::{RunOutcome, Runner};
use crate::status::{Status, TestResult};
use crate::test_env::{ExpectFailure, GlobalEnv, TestEnv, DESCRIPTION};
use crate::workspace::sync_tree;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use testdriver_capture::{CallLog, CallOutcome, CapturedArgs};

/// Message recorded when actual output differs from the baseline
pub const OUTPUT_MISMATCH: &str = "output is not as expected";

/// How each command of [`TestDriver::run`] is invoked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallMode {
    /// [`TestDriver::call_and_check`]
    #[default]
    Checked,
    /// [`TestDriver::call`]
    Unchecked,
}

#[derive(Debug)]
pub struct TestDriver {
    test_env: TestEnv,
    global_env: GlobalEnv,
    output_file: String,
    expected_file: String,
    path_substitute: String,
    runner: Runner,
    comparator: OutputComparator,
    calls: CallLog,
    expect_failure: bool,
    expect_failure_comment: Option<String>,
    result: TestResult,
}

impl TestDriver {
    pub fn new(test_env: TestEnv, global_env: GlobalEnv) -> Self {
        let defaults = DriverConfig::default();
        Self {
            test_env,
            global_env,
            output_file: defaults.output_file,
            expected_file: defaults.expected_file,
            path_substitute: defaults.path_substitute,
            runner: Runner::new(),
            comparator: OutputComparator::new(),
            calls: CallLog::new(),
            expect_failure: false,
            expect_failure_comment: None,
            result: TestResult::new(),
        }
    }

    /// Take file names, timeout and path substitute from `config`
    pub fn with_config(mut self, config: &DriverConfig) -> Self {
        self.output_file = config.output_file.clone();
        self.expected_file = config.expected_file.clone();
        self.path_substitute = config.path_substitute.clone();
        self.runner = self.runner.with_timeout(config.timeout());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    /// Record calls into `log` (e.g. a JSONL-backed one) instead of a private log
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.calls = log;
        self
    }

    pub fn test_env(&self) -> &TestEnv {
        &self.test_env
    }

    pub fn result(&self) -> &TestResult {
        &self.result
    }

    pub fn into_result(self) -> TestResult {
        self.result
    }

    pub fn call_log(&self) -> &CallLog {
        &self.calls
    }

    pub fn expect_failure(&self) -> bool {
        self.expect_failure
    }

    pub fn expect_failure_comment(&self) -> Option<&str> {
        self.expect_failure_comment.as_deref()
    }

    // Path helpers

    /// The testcase fixture directory
    pub fn test_dir(&self) -> &Path {
        &self.test_env.test_dir
    }

    /// The working directory, with `parts` joined to it
    pub fn working_dir(&self, parts: &[&str]) -> PathBuf {
        let mut path = self.global_env.working_dir.join(&self.test_env.test_name);
        path.extend(parts);
        path
    }

    pub fn output_file(&self) -> PathBuf {
        self.working_dir(&[self.output_file.as_str()])
    }

    pub fn expected_file(&self) -> PathBuf {
        self.working_dir(&[self.expected_file.as_str()])
    }

    pub fn original_expected_file(&self) -> PathBuf {
        self.test_dir().join(&self.expected_file)
    }

    // Tear up

    /// Abort with a setup error unless `filename` exists in the fixture directory
    pub fn check_file(&self, filename: &str) -> DriverResult<()> {
        if self.test_dir().join(filename).is_file() {
            Ok(())
        } else {
            Err(DriverError::setup(format!(
                "Missing mandatory file: {}",
                filename
            )))
        }
    }

    /// Read `path` as text, replacing invalid UTF-8
    pub fn read_file(path: &Path) -> DriverResult<String> {
        let bytes = std::fs::read(path).map_err(|e| DriverError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Mirror the fixture directory into the working directory
    ///
    /// The test name must be a single plain path component so the mirror
    /// stays inside its own subdirectory of the shared working root.
    pub fn create_test_workspace(&self) -> DriverResult<()> {
        let name = &self.test_env.test_name;
        let mut components = Path::new(name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(DriverError::setup(format!("Invalid test name: {name:?}")));
        }
        sync_tree(self.test_dir(), &self.working_dir(&[]))?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(test = %self.test_env.test_name))]
    pub fn tear_up(&mut self) -> DriverResult<()> {
        self.create_test_workspace()?;
        self.register_working_dir_subst();

        if !self.test_env.has(DESCRIPTION) {
            return Err(DriverError::setup(
                "test.yaml: missing \"description\" field",
            ));
        }

        self.check_file(&self.expected_file)?;
        self.result.expected_output = Self::read_file(&self.expected_file())?;

        match self.test_env.expect_failure()? {
            ExpectFailure::No => {
                self.expect_failure = false;
                self.expect_failure_comment = None;
            }
            ExpectFailure::Yes { reason } => {
                tracing::debug!(reason = ?reason, "testcase is expected to fail");
                self.expect_failure = true;
                self.expect_failure_comment = reason;
            }
        }
        Ok(())
    }

    fn register_working_dir_subst(&mut self) {
        let working_dir = self.working_dir(&[]);
        if let Ok(canonical) = working_dir.canonicalize() {
            self.comparator
                .register_path_subst(&canonical, &self.path_substitute);
        }
        self.comparator
            .register_path_subst(&working_dir, &self.path_substitute);
    }

    // Run

    /// Run `argv` in the working directory and append its output to the result
    pub async fn call<S: AsRef<str>>(&mut self, argv: &[S]) -> DriverResult<RunOutcome> {
        let argv: Vec<String> = argv.iter().map(|a| a.as_ref().to_string()).collect();
        let cwd = self.working_dir(&[]);
        let output_file = self.output_file();

        tracing::debug!(argv = ?argv, cwd = %cwd.display(), "running subprocess");
        let args = CapturedArgs::new(argv.clone(), Some(cwd.to_string_lossy().into_owned()));
        let outcome = match self.runner.run(&argv, &cwd, &output_file).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.record_call(
                    args,
                    CallOutcome::SpawnFailed {
                        message: e.to_string(),
                    },
                );
                return Err(e);
            }
        };
        self.record_call(
            args,
            match outcome {
                RunOutcome::Exited { code } => CallOutcome::Exited { code },
                RunOutcome::TimedOut { after } => CallOutcome::TimedOut { after },
            },
        );

        let text = Self::read_file(&output_file)?;
        self.result.actual_output.push_str(&text);
        Ok(outcome)
    }

    fn record_call(&self, args: CapturedArgs, outcome: CallOutcome) {
        if let Err(e) = self.calls.record(args, outcome) {
            tracing::warn!(error = %e, "failed to write call log entry");
        }
    }

    /// Like [`call`](Self::call), and append a diagnostic line when the
    /// command does not exit with status code 0
    pub async fn call_and_check<S: AsRef<str>>(&mut self, argv: &[S]) -> DriverResult<RunOutcome> {
        let program = argv
            .first()
            .map(|p| p.as_ref().to_string())
            .unwrap_or_default();
        let outcome = self.call(argv).await?;
        match outcome {
            RunOutcome::Exited { code: 0 } => {}
            RunOutcome::Exited { code } => {
                self.result
                    .actual_output
                    .push_str(&format!("{} returned status code {}\n", program, code));
            }
            RunOutcome::TimedOut { after } => {
                self.result
                    .actual_output
                    .push_str(&format!("{} timed out after {}s\n", program, after.as_secs()));
            }
        }
        Ok(outcome)
    }

    // Scoring

    pub fn set_passed(&mut self) {
        if self.expect_failure {
            let message = self
                .expect_failure_comment
                .as_ref()
                .map(|comment| format!("Failure was expected: {}", comment));
            self.set_status(Status::Uok, message);
        } else {
            self.set_status(Status::Passed, None);
        }
    }

    pub fn set_failure(&mut self, message: &str) {
        if self.expect_failure {
            let message = match &self.expect_failure_comment {
                Some(comment) => format!("{} ({})", message, comment),
                None => message.to_string(),
            };
            self.set_status(Status::Xfail, Some(message));
        } else {
            self.set_status(Status::Failed, Some(message.to_string()));
        }
    }

    /// Setup errors are never expected failures
    pub fn set_setup_error(&mut self, message: &str) {
        self.set_status(Status::Problem, Some(message.to_string()));
    }

    fn set_status(&mut self, status: Status, message: Option<String>) {
        tracing::info!(
            test = %self.test_env.test_name,
            %status,
            message = message.as_deref().unwrap_or(""),
            "testcase finished"
        );
        self.result.set_status(status, message);
    }

    /// Compare actual output with the baseline, unless a status is already set
    pub fn analyze(&mut self) {
        if self.result.is_terminal() {
            return;
        }
        match self
            .comparator
            .compare(&self.result.expected_output, &self.result.actual_output)
        {
            None => self.set_passed(),
            Some(diff) => {
                self.result.diff = Some(diff);
                self.set_failure(OUTPUT_MISMATCH);
            }
        }
    }

    /// Turn an abort condition into its terminal status.
    ///
    /// `Ok(Some(value))` when the step completed, `Ok(None)` when it aborted
    /// and the status has been recorded. Errors other than the two abort
    /// conditions are returned unchanged.
    pub fn catch_test_errors<T>(&mut self, outcome: DriverResult<T>) -> DriverResult<Option<T>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(DriverError::Setup(message)) => {
                self.set_setup_error(&message);
                Ok(None)
            }
            Err(DriverError::Test(message)) => {
                self.set_failure(&message);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Drive the whole lifecycle: tear up, run every command, analyze
    pub async fn run(&mut self, commands: &[Vec<String>], mode: CallMode) -> DriverResult<&TestResult> {
        let outcome = self.run_steps(commands, mode).await;
        self.catch_test_errors(outcome)?;
        Ok(&self.result)
    }

    async fn run_steps(&mut self, commands: &[Vec<String>], mode: CallMode) -> DriverResult<()> {
        self.tear_up()?;
        for argv in commands {
            match mode {
                CallMode::Checked => self.call_and_check(argv.as_slice()).await?,
                CallMode::Unchecked => self.call(argv.as_slice()).await?,
            };
        }
        self.analyze();
        Ok(())
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
