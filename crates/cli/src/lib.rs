// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden-output test driver.
//!
//! A [`TestDriver`] takes one testcase from fixture directory to final
//! status: it mirrors the fixtures into an isolated working directory, runs
//! commands there while capturing their combined output, compares that output
//! with the `test.out` baseline and scores the result as one of
//! [`Status::Passed`], [`Status::Failed`], [`Status::Xfail`], [`Status::Uok`]
//! or [`Status::Problem`].
//!
//! Test discovery, scheduling and report aggregation belong to the
//! orchestrator calling the driver.
//!
//! ```no_run
//! use testdriver::{GlobalEnv, TestDriver, TestEnv};
//!
//! # async fn example() -> Result<(), testdriver::DriverError> {
//! let env = TestEnv::new("tests/hello", "hello").with_description("prints hello");
//! let mut driver = TestDriver::new(env, GlobalEnv::new("/tmp/work"));
//!
//! let outcome = driver.tear_up();
//! if driver.catch_test_errors(outcome)?.is_some() {
//!     driver.call_and_check(&["./hello"]).await?;
//!     driver.analyze();
//! }
//! println!("{}", driver.result().summary());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod diff;
pub mod driver;
pub mod env;
pub mod error;
pub mod runner;
pub mod status;
pub mod test_env;
pub mod workspace;

/// Re-exported call log types from the testdriver-capture crate.
pub mod capture {
    pub use testdriver_capture::{CallLog, CallOutcome, CapturedArgs, CapturedCall};
}

pub use config::DriverConfig;
pub use driver::{CallMode, TestDriver};
pub use error::{DriverError, DriverResult};
pub use status::{Status, TestResult};
pub use test_env::{GlobalEnv, TestEnv};
