mod common;

use assert_fs::TempDir;
use common::{init_repository_dir, run_rit_command, write_file};
use pretty_assertions::assert_eq;
use rit::areas::index::Index;
use rit::errors::GitError;
use rstest::rstest;
use std::path::{Path, PathBuf};

fn load_index(dir: &Path) -> Index {
    let mut index = Index::new(dir.join(".git").join("index").into_boxed_path());
    index.rehydrate().expect("Failed to load the index");
    index
}

#[rstest]
fn staged_paths_come_back_in_sorted_order(init_repository_dir: TempDir) {
    let index = load_index(init_repository_dir.path());

    let names = index.entries().map(|e| e.name.clone()).collect::<Vec<_>>();

    assert_eq!(
        names,
        vec![
            PathBuf::from("1.txt"),
            PathBuf::from("a/2.txt"),
            PathBuf::from("a/b/3.txt"),
        ]
    );
}

#[rstest]
fn restaging_a_file_keeps_a_single_entry(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("1.txt"), "rewritten");
    run_rit_command(init_repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    let index = load_index(init_repository_dir.path());

    assert_eq!(index.len(), 3);
    let entry = index.entry_by_path(Path::new("1.txt")).unwrap();
    assert_eq!(entry.metadata.size as usize, "rewritten".len());
}

#[rstest]
fn adding_a_file_over_a_former_directory_drops_its_children(
    init_repository_dir: TempDir,
) {
    // replace the directory `a` with a file of the same name
    std::fs::remove_dir_all(init_repository_dir.path().join("a")).unwrap();
    write_file(&init_repository_dir.path().join("a"), "now a file");
    run_rit_command(init_repository_dir.path(), &["add", "a"])
        .assert()
        .success();

    let index = load_index(init_repository_dir.path());

    let names = index.entries().map(|e| e.name.clone()).collect::<Vec<_>>();
    assert_eq!(names, vec![PathBuf::from("1.txt"), PathBuf::from("a")]);
}

#[rstest]
fn a_corrupted_checksum_is_rejected(init_repository_dir: TempDir) {
    let index_path = init_repository_dir.path().join(".git").join("index");
    let mut raw = std::fs::read(&index_path).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0xFF;
    std::fs::write(&index_path, raw).unwrap();

    let mut index = Index::new(index_path.into_boxed_path());
    let error = index.rehydrate().unwrap_err();

    assert!(matches!(
        error.downcast_ref::<GitError>(),
        Some(GitError::MalformedIndex(_))
    ));
}

#[rstest]
fn a_truncated_header_is_rejected(init_repository_dir: TempDir) {
    let index_path = init_repository_dir.path().join(".git").join("index");
    std::fs::write(&index_path, b"DIRC\x00").unwrap();

    let mut index = Index::new(index_path.into_boxed_path());

    assert!(index.rehydrate().is_err());
}

#[rstest]
fn an_empty_index_file_loads_as_empty(init_repository_dir: TempDir) {
    let index_path = init_repository_dir.path().join(".git").join("index");
    std::fs::write(&index_path, b"").unwrap();

    let index = load_index(init_repository_dir.path());

    assert!(index.is_empty());
}

#[rstest]
fn index_rewrites_replace_the_file_whole(init_repository_dir: TempDir) {
    write_file(&init_repository_dir.path().join("1.txt"), "changed");
    run_rit_command(init_repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    // the rewrite goes through a temp sibling plus a rename, so the
    // metadata directory must hold no transient files afterwards
    let leftovers: Vec<String> = std::fs::read_dir(init_repository_dir.path().join(".git"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("tmp-"))
        .collect();
    assert_eq!(leftovers, Vec::<String>::new());

    let index = load_index(init_repository_dir.path());
    assert_eq!(index.len(), 3);
}
