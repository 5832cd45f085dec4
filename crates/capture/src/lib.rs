// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess call capture for test drivers.
//!
//! Every command a driver runs against a testcase is recorded here so that a
//! failing testcase can be inspected after the fact.

mod call;
mod duration_serde;
mod log;

pub use call::{CallOutcome, CapturedArgs, CapturedCall};
pub use log::CallLog;
