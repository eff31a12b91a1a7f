use std::fs;
use std::process::Output;

use rstest::rstest;
use serde_json::json;

use crate::common::jira::FakeJira;
use crate::common::{TestRepo, assert_success, repo, stderr, stdout};

const KEY: &str = "PROJ-123";
const SUMMARY: &str = "Fix broken login flow for mobile users on slow networks";
const BRANCH: &str = "PROJ-123-fix-broken-login-flow-for-mobile-users-on-slow";

const WORKING_CONFIG: &str = r#"{"jira": {"status": {"default": {"working": "In Progress"}}}}"#;

fn jira_new(repo: &TestRepo, jira: &FakeJira, args: &[&str]) -> Output {
    let mut cmd = repo.wt_command();
    cmd.args(["jira", "new"]).args(args);
    jira.configure(&mut cmd);
    cmd.output().unwrap()
}

#[rstest]
fn test_jira_new_creates_worktree_and_moves_issue(repo: TestRepo) {
    repo.write_global_config(WORKING_CONFIG);
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &[KEY]);
    assert_success(&output);

    let path = repo.expected_worktree(BRANCH);
    assert_eq!(
        stdout(&output),
        format!("{}\n{KEY} → In Progress\n", path.display())
    );
    assert_eq!(jira.status(), "In Progress");
    assert_eq!(jira.transition_posts(), vec![json!({"transition": {"id": "11"}})]);

    let branch = repo.git_output(&["-C", path.to_str().unwrap(), "branch", "--show-current"]);
    assert_eq!(branch, BRANCH);
}

#[rstest]
fn test_jira_new_writes_issue_file(repo: TestRepo) {
    let jira = FakeJira::start(KEY, SUMMARY, "To Do").with_description("Steps:\n1. Open app");

    let output = jira_new(&repo, &jira, &[KEY]);
    assert_success(&output);

    let issue_file = repo.expected_worktree(BRANCH).join("PROJ-123.md");
    insta::assert_snapshot!(fs::read_to_string(issue_file).unwrap(), @r"
    # PROJ-123: Fix broken login flow for mobile users on slow networks

    ## Description

    Steps:
    1. Open app

    ## Comments

    ### Ada (2025-01-02T03:04:05.000+0000)
    Repro attached
    ");
}

#[rstest]
fn test_jira_new_without_config_leaves_status(repo: TestRepo) {
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &[KEY]);
    assert_success(&output);

    assert_eq!(
        stdout(&output),
        format!("{}\n", repo.expected_worktree(BRANCH).display())
    );
    assert!(jira.transition_posts().is_empty());
    assert_eq!(jira.status(), "To Do");
}

#[rstest]
fn test_jira_new_no_status_update(repo: TestRepo) {
    repo.write_global_config(WORKING_CONFIG);
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &["-S", KEY]);
    assert_success(&output);

    assert!(jira.transition_posts().is_empty());
    assert_eq!(jira.status(), "To Do");
}

#[rstest]
fn test_jira_new_already_in_progress(repo: TestRepo) {
    repo.write_global_config(WORKING_CONFIG);
    let jira = FakeJira::start(KEY, SUMMARY, "In Progress");

    let output = jira_new(&repo, &jira, &[KEY]);
    assert_success(&output);

    assert_eq!(
        stdout(&output),
        format!("{}\n", repo.expected_worktree(BRANCH).display())
    );
    assert!(jira.transition_posts().is_empty());
}

#[rstest]
fn test_jira_new_repo_config_overrides_global(repo: TestRepo) {
    repo.write_global_config(WORKING_CONFIG);
    repo.write_repo_config(r#"{"jira": {"status": {"types": {"task": {"working": "Testing"}}}}}"#);
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &[KEY]);
    assert_success(&output);

    assert!(stdout(&output).ends_with(&format!("{KEY} → Testing\n")));
    assert_eq!(jira.status(), "Testing");
}

#[rstest]
fn test_jira_new_explicit_branch(repo: TestRepo) {
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &["--branch", "login-fix", KEY]);
    assert_success(&output);

    let path = repo.expected_worktree("login-fix");
    assert_eq!(stdout(&output), format!("{}\n", path.display()));
    assert!(path.join("PROJ-123.md").is_file());
}

#[rstest]
fn test_jira_new_with_tmux(repo: TestRepo) {
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &["-t", KEY]);
    assert_success(&output);

    let path = repo.expected_worktree(BRANCH);
    assert_eq!(
        repo.tmux_calls(),
        vec![
            format!("has-session -t ={BRANCH}"),
            format!("new-session -d -s {BRANCH} -c {}", path.display()),
            format!("attach-session -t {BRANCH}"),
        ]
    );
}

#[rstest]
fn test_jira_new_unknown_issue(repo: TestRepo) {
    let jira = FakeJira::start(KEY, SUMMARY, "To Do");

    let output = jira_new(&repo, &jira, &["NOPE-1"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("issue NOPE-1 not found"),
        "{}",
        stderr(&output)
    );
    assert!(!repo.home_path().join("r-worktrees").exists());
}

#[rstest]
fn test_jira_new_requires_credentials(repo: TestRepo) {
    let output = repo.wt(&["jira", "new", KEY]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("JIRA_URL is not set"),
        "{}",
        stderr(&output)
    );
    assert!(!repo.home_path().join("r-worktrees").exists());
}
