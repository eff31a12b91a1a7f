use std::fs;

use rstest::rstest;

use crate::common::{TestRepo, assert_success, repo, stderr, stdout};

/// Untracked files the main worktree typically carries.
fn seed_config_files(repo: &TestRepo) {
    let root = repo.root_path();
    fs::write(root.join("AGENTS.md"), "# agents\n").unwrap();
    fs::write(root.join(".env"), "TOKEN=root\n").unwrap();
    fs::create_dir_all(root.join("services/api")).unwrap();
    fs::write(root.join("services/api/.env"), "TOKEN=api\n").unwrap();
    fs::create_dir_all(root.join("node_modules/left-pad")).unwrap();
    fs::write(root.join("node_modules/left-pad/index.js"), "module.exports = 1;\n").unwrap();
}

#[rstest]
fn test_new_creates_branch_from_head(repo: TestRepo) {
    let output = repo.wt(&["new", "feature"]);
    assert_success(&output);

    let expected = repo.expected_worktree("feature");
    assert_eq!(stdout(&output), format!("{}\n", expected.display()));
    assert!(stderr(&output).contains("Created worktree for feature"));

    assert!(expected.join("file.txt").is_file());
    assert_eq!(repo.git_output(&["rev-parse", "feature"]), repo.git_output(&["rev-parse", "main"]));
    let branch = repo.git_output(&["-C", expected.to_str().unwrap(), "branch", "--show-current"]);
    assert_eq!(branch, "feature");
}

#[rstest]
fn test_new_checks_out_existing_branch(repo: TestRepo) {
    repo.create_branch("existing");
    repo.run_git(&["commit", "-q", "--allow-empty", "-m", "Advance main"]);

    let output = repo.wt(&["new", "existing"]);
    assert_success(&output);

    let path = repo.expected_worktree("existing");
    assert_eq!(stdout(&output), format!("{}\n", path.display()));
    // The branch keeps its own commit rather than being recreated from HEAD
    assert_ne!(
        repo.git_output(&["rev-parse", "existing"]),
        repo.git_output(&["rev-parse", "main"])
    );
}

#[rstest]
fn test_new_from_base(repo: TestRepo) {
    repo.switch_to_new_branch("develop");
    repo.run_git(&["commit", "-q", "--allow-empty", "-m", "Develop work"]);
    repo.run_git(&["switch", "-q", "main"]);

    let output = repo.wt(&["new", "--from", "develop", "feature"]);
    assert_success(&output);

    assert_eq!(
        repo.git_output(&["rev-parse", "feature"]),
        repo.git_output(&["rev-parse", "develop"])
    );
}

#[rstest]
fn test_new_nests_slashed_branch(repo: TestRepo) {
    let output = repo.wt(&["new", "feature/login"]);
    assert_success(&output);

    let path = repo.expected_worktree("feature/login");
    assert_eq!(path, repo.home_path().join("r-worktrees").join("feature").join("login"));
    assert_eq!(stdout(&output), format!("{}\n", path.display()));
    assert!(path.join("file.txt").is_file());
}

#[rstest]
fn test_new_copies_config_but_not_libs_by_default(repo: TestRepo) {
    seed_config_files(&repo);

    let output = repo.wt(&["new", "feature"]);
    assert_success(&output);

    let path = repo.expected_worktree("feature");
    assert_eq!(fs::read_to_string(path.join("AGENTS.md")).unwrap(), "# agents\n");
    assert_eq!(fs::read_to_string(path.join(".env")).unwrap(), "TOKEN=root\n");
    assert_eq!(
        fs::read_to_string(path.join("services/api/.env")).unwrap(),
        "TOKEN=api\n"
    );
    assert!(!path.join("CLAUDE.md").exists());
    assert!(!path.join("node_modules").exists());
}

#[rstest]
fn test_new_copy_libs(repo: TestRepo) {
    seed_config_files(&repo);

    let output = repo.wt(&["new", "-l", "feature"]);
    assert_success(&output);

    let path = repo.expected_worktree("feature");
    assert_eq!(
        fs::read_to_string(path.join("node_modules/left-pad/index.js")).unwrap(),
        "module.exports = 1;\n"
    );
}

#[rstest]
fn test_new_no_copy_config(repo: TestRepo) {
    seed_config_files(&repo);

    let output = repo.wt(&["new", "-C", "feature"]);
    assert_success(&output);

    let path = repo.expected_worktree("feature");
    assert!(!path.join("AGENTS.md").exists());
    assert!(!path.join(".env").exists());
    assert!(!path.join("node_modules").exists());
}

#[rstest]
fn test_new_preserves_file_mode(repo: TestRepo) {
    use std::os::unix::fs::PermissionsExt;

    let env_file = repo.root_path().join(".env");
    fs::write(&env_file, "SECRET=1\n").unwrap();
    fs::set_permissions(&env_file, fs::Permissions::from_mode(0o600)).unwrap();

    let output = repo.wt(&["new", "feature"]);
    assert_success(&output);

    let copied = repo.expected_worktree("feature").join(".env");
    let mode = fs::metadata(&copied).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[rstest]
fn test_new_twice_fails(repo: TestRepo) {
    assert_success(&repo.wt(&["new", "feature"]));

    let output = repo.wt(&["new", "feature"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).contains("Failed to create worktree for feature"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_new_from_unknown_base_fails(repo: TestRepo) {
    let output = repo.wt(&["new", "--from", "nope", "feature"]);
    assert!(!output.status.success());
    assert!(!repo.expected_worktree("feature").join("file.txt").exists());
}

#[rstest]
fn test_new_from_linked_worktree_uses_repo_root(repo: TestRepo) {
    assert_success(&repo.wt(&["new", "first"]));
    let first = repo.expected_worktree("first");

    let output = repo
        .wt_command()
        .args(["new", "second"])
        .current_dir(&first)
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        format!("{}\n", repo.expected_worktree("second").display())
    );
}

#[rstest]
fn test_new_inside_submodule_places_worktree_beside_checkout(repo: TestRepo) {
    let superproject = repo.home_path().join("super");
    fs::create_dir(&superproject).unwrap();
    repo.run_git_in(&superproject, &["init", "-q"]);
    repo.run_git_in(
        &superproject,
        &[
            "-c",
            "protocol.file.allow=always",
            "submodule",
            "add",
            repo.root_path().to_str().unwrap(),
            "sub",
        ],
    );
    let submodule = superproject.join("sub");

    let output = repo
        .wt_command()
        .args(["new", "feature"])
        .current_dir(&submodule)
        .output()
        .unwrap();
    assert_success(&output);

    let expected = superproject.join("sub-worktrees").join("feature");
    assert_eq!(stdout(&output), format!("{}\n", expected.display()));
    assert!(expected.join("file.txt").is_file());
    assert!(!superproject.join(".git/modules/sub-worktrees").exists());
}
