// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_outcome_helpers() {
    assert!(RunOutcome::Exited { code: 0 }.is_success());
    assert!(!RunOutcome::Exited { code: 2 }.is_success());
    assert_eq!(RunOutcome::Exited { code: 2 }.code(), Some(2));

    let timed_out = RunOutcome::TimedOut {
        after: Duration::from_secs(1),
    };
    assert!(!timed_out.is_success());
    assert_eq!(timed_out.code(), None);
}

#[test]
fn test_shebang_bare_program_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let result = resolve_shebang(&argv(&["echo", "hi"]), dir.path()).unwrap();
    assert_eq!(result, argv(&["echo", "hi"]));
}

#[test]
fn test_shebang_interpreter_prepended() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("run.sh"), "#!/bin/sh\necho from script\n").unwrap();

    let result = resolve_shebang(&argv(&["./run.sh", "x"]), dir.path()).unwrap();
    assert_eq!(result, argv(&["/bin/sh", "./run.sh", "x"]));
}

#[test]
fn test_shebang_single_argument() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tool.py"),
        "#! /usr/bin/env python3 -u\nprint('x')\n",
    )
    .unwrap();

    let result = resolve_shebang(&argv(&["./tool.py"]), dir.path()).unwrap();
    assert_eq!(result, argv(&["/usr/bin/env", "python3 -u", "./tool.py"]));
}

#[test]
fn test_shebang_absent_leaves_argv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::write(&path, "plain text\n").unwrap();

    let path = path.to_string_lossy().into_owned();
    let result = resolve_shebang(&[path.clone()], dir.path()).unwrap();
    assert_eq!(result, vec![path]);
}

#[test]
fn test_shebang_empty_argv() {
    let dir = tempfile::tempdir().unwrap();
    assert!(resolve_shebang(&[], dir.path()).unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_captures_stdout_and_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("actual.out");

    let outcome = Runner::new()
        .run(
            &argv(&["sh", "-c", "echo out; echo err 1>&2; exit 3"]),
            dir.path(),
            &output,
        )
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Exited { code: 3 });
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, "out\nerr\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_uses_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("input.txt"), "fixture data\n").unwrap();
    let output = dir.path().join("actual.out");

    let outcome = Runner::new()
        .run(&argv(&["cat", "input.txt"]), dir.path(), &output)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "fixture data\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_truncates_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("actual.out");
    std::fs::write(&output, "stale content from an earlier call\n").unwrap();

    Runner::new()
        .run(&argv(&["echo", "new"]), dir.path(), &output)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "new\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_non_executable_script_via_shebang() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("run.sh"), "#!/bin/sh\necho scripted\n").unwrap();
    let output = dir.path().join("actual.out");

    let outcome = Runner::new()
        .run(&argv(&["./run.sh"]), dir.path(), &output)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "scripted\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_timeout_kills_child() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("actual.out");
    let limit = Duration::from_millis(200);

    let outcome = Runner::new()
        .with_timeout(Some(limit))
        .run(&argv(&["sleep", "10"]), dir.path(), &output)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::TimedOut { after: limit });
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_reports_signal_as_negative_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("actual.out");

    let outcome = Runner::new()
        .run(&argv(&["sh", "-c", "kill -9 $$"]), dir.path(), &output)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Exited { code: -9 });
}

#[tokio::test]
async fn test_run_missing_program_is_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("actual.out");

    let result = Runner::new()
        .run(
            &argv(&["definitely-not-a-real-program-xyz"]),
            dir.path(),
            &output,
        )
        .await;

    match result {
        Err(DriverError::Spawn { program, .. }) => {
            assert_eq!(program, "definitely-not-a-real-program-xyz")
        }
        other => panic!("expected spawn error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_empty_argv_is_spawn_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("actual.out");

    let result = Runner::new().run(&[], dir.path(), &output).await;
    assert!(matches!(result, Err(DriverError::Spawn { .. })));
}
