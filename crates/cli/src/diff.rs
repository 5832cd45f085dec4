// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden-output comparison.

use similar::TextDiff;
use std::path::Path;

/// Compares actual output against the expected baseline
#[derive(Clone, Debug, Default)]
pub struct OutputComparator {
    /// `(path, replacement)` pairs applied to actual output, longest path first
    substitutions: Vec<(String, String)>,
}

impl OutputComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace occurrences of `path` in actual output with `subst`.
    ///
    /// `path/` is rewritten first so that absolute paths under `path` become
    /// relative when `subst` is empty.
    pub fn register_path_subst(&mut self, path: &Path, subst: &str) {
        let path = path.to_string_lossy().into_owned();
        if path.is_empty() || self.substitutions.iter().any(|(p, _)| *p == path) {
            return;
        }
        self.substitutions.push((path, subst.to_string()));
        self.substitutions
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
    }

    pub fn substitutions(&self) -> &[(String, String)] {
        &self.substitutions
    }

    /// Normalize line endings and apply path substitutions
    pub fn normalize_actual(&self, text: &str) -> String {
        let mut text = normalize_newlines(text);
        for (path, subst) in &self.substitutions {
            let with_sep = format!("{}{}", path, std::path::MAIN_SEPARATOR);
            let subst_with_sep = if subst.is_empty() {
                String::new()
            } else {
                format!("{}{}", subst, std::path::MAIN_SEPARATOR)
            };
            text = text.replace(&with_sep, &subst_with_sep).replace(path, subst);
        }
        text
    }

    /// Compare outputs. Returns `None` when they match, otherwise a unified
    /// diff from expected to actual.
    pub fn compare(&self, expected: &str, actual: &str) -> Option<String> {
        let expected = normalize_newlines(expected);
        let actual = self.normalize_actual(actual);
        if expected == actual {
            return None;
        }

        let diff = TextDiff::from_lines(&expected, &actual);
        Some(
            diff.unified_diff()
                .context_radius(3)
                .header("expected", "actual")
                .to_string(),
        )
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
