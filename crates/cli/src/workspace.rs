// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive tree synchronization for per-test working directories.

use crate::error::{DriverError, DriverResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a [`sync_tree`] pass changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub copied: usize,
    pub skipped: usize,
    pub removed: usize,
}

/// Make `dst` a mirror of `src`.
///
/// Directories are created, files whose size or modification time differs
/// are copied (the copy takes the source's modification time), and anything
/// under `dst` with no counterpart in `src` is removed. Symlinks in `src` are
/// followed and copied as regular files.
#[tracing::instrument(skip_all, fields(src = %src.display(), dst = %dst.display()))]
pub fn sync_tree(src: &Path, dst: &Path) -> DriverResult<SyncStats> {
    let mut stats = SyncStats::default();
    let mut wanted: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let rel = relative(entry.path(), src)?;
        let target = dst.join(&rel);

        if entry.file_type().is_dir() {
            if target.is_file() || target.is_symlink() {
                fs::remove_file(&target).map_err(|e| DriverError::io(&target, e))?;
                stats.removed += 1;
            }
            fs::create_dir_all(&target).map_err(|e| DriverError::io(&target, e))?;
        } else {
            if target.is_dir() && !target.is_symlink() {
                fs::remove_dir_all(&target).map_err(|e| DriverError::io(&target, e))?;
                stats.removed += 1;
            }
            if needs_copy(entry.path(), &target)? {
                copy_file(entry.path(), &target)?;
                stats.copied += 1;
            } else {
                stats.skipped += 1;
            }
        }
        wanted.insert(rel);
    }

    for entry in WalkDir::new(dst).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| walk_error(dst, e))?;
        let rel = relative(entry.path(), dst)?;
        if wanted.contains(&rel) {
            continue;
        }
        let path = entry.path();
        let removal = if entry.file_type().is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        removal.map_err(|e| DriverError::io(path, e))?;
        stats.removed += 1;
    }

    tracing::debug!(
        copied = stats.copied,
        skipped = stats.skipped,
        removed = stats.removed,
        "synchronized tree"
    );
    Ok(stats)
}

fn needs_copy(src: &Path, target: &Path) -> DriverResult<bool> {
    let target_meta = match fs::metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(DriverError::io(target, e)),
    };
    let src_meta = fs::metadata(src).map_err(|e| DriverError::io(src, e))?;

    if src_meta.len() != target_meta.len() {
        return Ok(true);
    }
    match (src_meta.modified(), target_meta.modified()) {
        (Ok(src_time), Ok(target_time)) => Ok(src_time != target_time),
        _ => Ok(true),
    }
}

/// Copy `src` over `target`, then stamp `target` with the source mtime so the
/// next pass can tell an untouched copy from an edited one.
fn copy_file(src: &Path, target: &Path) -> DriverResult<()> {
    // A read-only copy from an earlier pass cannot be overwritten in place.
    if target.is_file() {
        fs::remove_file(target).map_err(|e| DriverError::io(target, e))?;
    }
    fs::copy(src, target).map_err(|e| DriverError::io(target, e))?;

    let modified = fs::metadata(src)
        .and_then(|meta| meta.modified())
        .map_err(|e| DriverError::io(src, e))?;
    fs::File::open(target)
        .and_then(|file| file.set_modified(modified))
        .map_err(|e| DriverError::io(target, e))
}

fn relative(path: &Path, root: &Path) -> DriverResult<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| {
            DriverError::io(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} is outside of {}", path.display(), root.display()),
                ),
            )
        })
}

fn walk_error(root: &Path, error: walkdir::Error) -> DriverError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    DriverError::io(path, error.into())
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
