use std::fs;
use std::path::PathBuf;

use rstest::rstest;

use crate::common::{TestRepo, assert_success, repo, stderr, stdout};

/// A `$SHELL` that records the directory it was started in.
fn recording_shell(repo: &TestRepo) -> (PathBuf, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let record = repo.home_path().join("shell-cwd");
    let script = repo.home_path().join("record-shell");
    fs::write(&script, format!("#!/bin/sh\npwd -P > \"{}\"\n", record.display())).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    (script, record)
}

#[rstest]
fn test_go_with_true_shell_prints_nothing(mut repo: TestRepo) {
    repo.add_worktree("feature", "feature-wt");

    let output = repo.wt(&["go", "feature"]);
    assert_success(&output);
    assert!(stdout(&output).is_empty());
}

#[rstest]
#[case::branch("feature")]
#[case::directory("feature-wt")]
fn test_go_starts_shell_in_worktree(mut repo: TestRepo, #[case] name: &str) {
    let path = repo.add_worktree("feature", "feature-wt");
    let (shell, record) = recording_shell(&repo);

    let output = repo
        .wt_command()
        .args(["go", name])
        .env("SHELL", &shell)
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(record).unwrap().trim(),
        path.to_str().unwrap()
    );
}

#[rstest]
fn test_go_by_full_path(mut repo: TestRepo) {
    let path = repo.add_worktree("feature", "feature-wt");
    let (shell, record) = recording_shell(&repo);

    let output = repo
        .wt_command()
        .args(["go", path.to_str().unwrap()])
        .env("SHELL", &shell)
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(record).unwrap().trim(),
        path.to_str().unwrap()
    );
}

#[rstest]
fn test_go_shell_exit_status_is_not_an_error(mut repo: TestRepo) {
    repo.add_worktree("feature", "feature-wt");

    let output = repo
        .wt_command()
        .args(["go", "feature"])
        .env("SHELL", "/bin/false")
        .output()
        .unwrap();
    assert_success(&output);
}

#[rstest]
fn test_go_unknown_name(repo: TestRepo) {
    let output = repo.wt(&["go", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).contains("no worktree matching nope"),
        "{}",
        stderr(&output)
    );
}
