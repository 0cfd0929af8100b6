#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_ENV: [(&str, &str); 3] = [
    ("GIT_AUTHOR_NAME", "fake_user"),
    ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
    ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"),
];

pub fn run_rit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("rit").expect("Failed to find rit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn rit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_rit_command(dir, &["commit", "-m", message]);
    cmd.envs(AUTHOR_ENV);
    cmd
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// Current HEAD commit hash, following one level of symref indirection.
pub fn head_commit_sha(dir: &Path) -> String {
    let head_content = std::fs::read_to_string(dir.join(".git").join("HEAD"))
        .expect("Failed to read HEAD");

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".git").join(ref_path.trim());
        std::fs::read_to_string(ref_file)
            .expect("Failed to read branch ref")
            .trim()
            .to_string()
    } else {
        head_content.trim().to_string()
    }
}

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// An initialized repository with a three-file history already
/// committed: `1.txt`, `a/2.txt` and `a/b/3.txt`.
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_rit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(&repository_dir.path().join("1.txt"), "one");
    write_file(&repository_dir.path().join("a").join("2.txt"), "two");
    write_file(&repository_dir.path().join("a").join("b").join("3.txt"), "three");

    run_rit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    rit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}
