use rstest::rstest;

use crate::common::{TestRepo, assert_success, repo, stderr};

#[rstest]
fn test_tmux_creates_and_attaches(mut repo: TestRepo) {
    let path = repo.add_worktree("feature", "feature.wt");

    let output = repo.wt(&["t", "feature"]);
    assert_success(&output);

    assert_eq!(
        repo.tmux_calls(),
        vec![
            "has-session -t =feature_wt".to_string(),
            format!("new-session -d -s feature_wt -c {}", path.display()),
            "attach-session -t feature_wt".to_string(),
        ]
    );
}

#[rstest]
fn test_tmux_reuses_existing_session(mut repo: TestRepo) {
    repo.add_worktree("feature", "feature-wt");
    repo.set_tmux_session_exists();

    let output = repo.wt(&["t", "feature"]);
    assert_success(&output);

    assert_eq!(
        repo.tmux_calls(),
        vec![
            "has-session -t =feature-wt".to_string(),
            "attach-session -t feature-wt".to_string(),
        ]
    );
}

#[rstest]
fn test_tmux_switches_client_inside_tmux(mut repo: TestRepo) {
    repo.add_worktree("feature", "feature-wt");
    repo.set_tmux_session_exists();

    let output = repo
        .wt_command()
        .args(["t", "feature"])
        .env("TMUX", "/tmp/tmux-1000/default,1234,0")
        .output()
        .unwrap();
    assert_success(&output);

    assert_eq!(
        repo.tmux_calls().last().map(String::as_str),
        Some("switch-client -t feature-wt")
    );
}

#[rstest]
fn test_tmux_unknown_name_does_not_touch_tmux(repo: TestRepo) {
    let output = repo.wt(&["t", "nope"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no worktree matching nope"));
    assert!(repo.tmux_calls().is_empty());
}
