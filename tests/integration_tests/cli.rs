use rstest::rstest;

use crate::common::{TestRepo, assert_success, repo, stderr, stdout};

#[rstest]
fn test_no_arguments_prints_help(repo: TestRepo) {
    let output = repo.wt(&[]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Usage: wt"), "{err}");
    assert!(err.contains("jira"), "{err}");
}

#[rstest]
fn test_version(repo: TestRepo) {
    let output = repo.wt(&["--version"]);
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        format!("wt {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[rstest]
#[case::unknown_command(&["frobnicate"])]
#[case::global_without_init(&["jira", "config", "--global"])]
#[case::global_and_repo(&["jira", "config", "--init", "--global", "--repo"])]
#[case::new_without_branch(&["new"])]
fn test_usage_errors_exit_one(repo: TestRepo, #[case] args: &[&str]) {
    let output = repo.wt(args);
    assert_eq!(output.status.code(), Some(1), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[rstest]
fn test_verbose_logs_progress(repo: TestRepo) {
    let output = repo
        .wt_command()
        .args(["-v", "new", "feature"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stderr(&output).contains("[info]"), "{}", stderr(&output));
}

#[rstest]
fn test_runtime_errors_exit_one(repo: TestRepo) {
    let output = repo.wt(&["remove", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error:"), "{}", stderr(&output));
}
