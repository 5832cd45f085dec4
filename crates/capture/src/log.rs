// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared, append-only log of subprocess calls.

use crate::call::{CallOutcome, CapturedArgs, CapturedCall};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Log of subprocess calls made while driving a testcase.
///
/// Clones share one underlying log. When built with [`CallLog::with_file`],
/// each call is also appended to the file as one JSON line.
#[derive(Clone)]
pub struct CallLog {
    inner: Arc<Inner>,
}

struct Inner {
    start: Instant,
    calls: Mutex<Vec<CapturedCall>>,
    sink: Option<Mutex<BufWriter<File>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::from_sink(None)
    }

    /// Log that also writes JSONL to `path`, truncating it
    pub fn with_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_sink(Some(BufWriter::new(file))))
    }

    fn from_sink(sink: Option<BufWriter<File>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                start: Instant::now(),
                calls: Mutex::new(Vec::new()),
                sink: sink.map(Mutex::new),
            }),
        }
    }

    /// Append a call and return its sequence number.
    ///
    /// The call is kept in memory even when writing it to the file fails;
    /// the write error is returned so the caller can report it.
    pub fn record(&self, args: CapturedArgs, outcome: CallOutcome) -> io::Result<u64> {
        let call = {
            let mut calls = self.inner.calls.lock();
            let call = CapturedCall {
                seq: calls.len() as u64,
                timestamp: SystemTime::now(),
                elapsed: self.inner.start.elapsed(),
                args,
                outcome,
            };
            calls.push(call.clone());
            call
        };

        if let Some(sink) = &self.inner.sink {
            let line = serde_json::to_string(&call)?;
            let mut sink = sink.lock();
            writeln!(sink, "{line}")?;
            sink.flush()?;
        }
        Ok(call.seq)
    }

    /// Snapshot of every call, in recording order
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.inner.calls.lock().clone()
    }

    /// Calls that did not exit with status code 0
    pub fn find_failures(&self) -> Vec<CapturedCall> {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| !call.outcome.is_success())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.calls.lock().is_empty()
    }
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLog")
            .field("len", &self.len())
            .field("file_backed", &self.inner.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
