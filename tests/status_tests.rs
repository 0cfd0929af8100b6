mod common;

use assert_fs::TempDir;
use common::{init_repository_dir, repository_dir, rit_commit, run_rit_command, write_file};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn porcelain_status(dir: &std::path::Path) -> String {
    let output = run_rit_command(dir, &["status", "--porcelain"])
        .assert()
        .success();
    String::from_utf8(output.get_output().stdout.clone()).unwrap()
}

#[rstest]
fn clean_after_commit(init_repository_dir: TempDir) {
    assert_eq!(porcelain_status(init_repository_dir.path()), "");
}

#[rstest]
fn reports_files_with_modified_contents(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("1.txt"), "modified one");
    write_file(
        &init_repository_dir.path().join("a").join("2.txt"),
        "modified two",
    );

    assert_eq!(
        porcelain_status(init_repository_dir.path()),
        " M 1.txt\n M a/2.txt\n"
    );
}

#[rstest]
fn reports_deleted_files(init_repository_dir: TempDir) {
    std::fs::remove_file(init_repository_dir.path().join("a").join("2.txt")).unwrap();

    assert_eq!(porcelain_status(init_repository_dir.path()), " D a/2.txt\n");
}

#[rstest]
fn reports_staged_new_files(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("new.txt"), "brand new");
    run_rit_command(init_repository_dir.path(), &["add", "new.txt"])
        .assert()
        .success();

    assert_eq!(porcelain_status(init_repository_dir.path()), "A  new.txt\n");
}

#[rstest]
fn reports_staged_modifications(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("1.txt"), "staged change");
    run_rit_command(init_repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    assert_eq!(porcelain_status(init_repository_dir.path()), "M  1.txt\n");
}

#[rstest]
fn reports_untracked_files(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("stray.txt"), "stray");

    assert_eq!(porcelain_status(init_repository_dir.path()), "?? stray.txt\n");
}

#[rstest]
fn combines_staged_and_unstaged_changes(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("1.txt"), "staged change");
    run_rit_command(init_repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    write_file(&init_repository_dir.path().join("1.txt"), "and another one");

    assert_eq!(porcelain_status(init_repository_dir.path()), "MM 1.txt\n");
}

#[rstest]
fn rm_shows_up_as_staged_deletion(init_repository_dir: TempDir) {
    run_rit_command(init_repository_dir.path(), &["rm", "1.txt"])
        .assert()
        .success();

    assert!(!init_repository_dir.path().join("1.txt").exists());
    assert_eq!(porcelain_status(init_repository_dir.path()), "D  1.txt\n");
}

#[rstest]
fn rm_refuses_untracked_paths(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("stray.txt"), "stray");

    run_rit_command(init_repository_dir.path(), &["rm", "stray.txt"])
        .assert()
        .failure();
}

#[rstest]
fn staged_ignore_rules_hide_untracked_files(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join(".gitignore"), "*.log\n");
    run_rit_command(init_repository_dir.path(), &["add", ".gitignore"])
        .assert()
        .success();

    write_file(&init_repository_dir.path().join("debug.log"), "noise");
    write_file(
        &init_repository_dir.path().join("a").join("trace.log"),
        "nested noise",
    );
    write_file(&init_repository_dir.path().join("notes.txt"), "kept");

    // the two .log files are silenced, the .txt file is not
    assert_eq!(
        porcelain_status(init_repository_dir.path()),
        "A  .gitignore\n?? notes.txt\n"
    );
}

#[rstest]
fn negated_ignore_rules_resurface_files(init_repository_dir: TempDir) {
    write_file(
        &init_repository_dir.path().join(".gitignore"),
        "*.log\n!important.log\n",
    );
    run_rit_command(init_repository_dir.path(), &["add", ".gitignore"])
        .assert()
        .success();

    write_file(&init_repository_dir.path().join("debug.log"), "noise");
    write_file(&init_repository_dir.path().join("important.log"), "keep me");

    assert_eq!(
        porcelain_status(init_repository_dir.path()),
        "A  .gitignore\n?? important.log\n"
    );
}

#[rstest]
fn info_exclude_rules_apply_without_staging(init_repository_dir: TempDir) {
    write_file(
        &init_repository_dir.path().join(".git").join("info").join("exclude"),
        "*.tmp\n",
    );
    write_file(&init_repository_dir.path().join("scratch.tmp"), "scratch");

    assert_eq!(porcelain_status(init_repository_dir.path()), "");
}

#[rstest]
fn touched_but_unchanged_files_stay_clean(init_repository_dir: TempDir) {
    // same content, different mtime: the hash check resolves it
    let path = init_repository_dir.path().join("1.txt");
    filetime::set_file_mtime(&path, filetime::FileTime::from_unix_time(1_600_000_000, 0))
        .unwrap();

    assert_eq!(porcelain_status(init_repository_dir.path()), "");

    // and the refreshed stat cache makes the next run clean too
    assert_eq!(porcelain_status(init_repository_dir.path()), "");
}

#[rstest]
fn commit_after_staging_brings_status_back_to_clean(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("new.txt"), "brand new");
    run_rit_command(init_repository_dir.path(), &["add", "new.txt"])
        .assert()
        .success();
    rit_commit(init_repository_dir.path(), "Add new.txt")
        .assert()
        .success();

    assert_eq!(porcelain_status(init_repository_dir.path()), "");
}

#[rstest]
fn long_format_labels_each_section(repository_dir: TempDir) {
    run_rit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(&repository_dir.path().join("staged.txt"), "staged");
    run_rit_command(repository_dir.path(), &["add", "staged.txt"])
        .assert()
        .success();
    write_file(&repository_dir.path().join("stray.txt"), "stray");

    let output = run_rit_command(repository_dir.path(), &["status"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("Changes to be committed:"));
    assert!(stdout.contains("new file:"));
    assert!(stdout.contains("staged.txt"));
    assert!(stdout.contains("Untracked files:"));
    assert!(stdout.contains("stray.txt"));
}
