mod common;

use assert_fs::TempDir;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use rit::areas::database::Database;
use rit::artifacts::index::entry_mode::EntryMode;
use rit::artifacts::index::index_entry::{EntryFlags, EntryMetadata, IndexEntry};
use rit::artifacts::objects::blob::Blob;
use rit::artifacts::objects::object::Object;
use rit::artifacts::objects::object_id::ObjectId;
use rit::artifacts::tree_builder::tree_from_index;
use rstest::rstest;
use std::path::PathBuf;

const EMPTY_TREE_SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

fn database(dir: &TempDir) -> Database {
    Database::new(dir.path().join("objects").into_boxed_path())
}

fn staged(database: &Database, name: &str, content: &str) -> IndexEntry {
    let blob = Blob::new(Bytes::from(content.to_string().into_bytes()));
    let oid = database.store(&blob).expect("Failed to store blob");
    IndexEntry::new(
        PathBuf::from(name),
        oid,
        EntryMetadata::default(),
        EntryFlags::default(),
    )
}

#[rstest]
fn empty_index_builds_the_empty_tree() {
    let dir = TempDir::new().unwrap();
    let database = database(&dir);

    let root = tree_from_index(&database, std::iter::empty()).unwrap();

    assert_eq!(root.as_ref(), EMPTY_TREE_SHA);
}

#[rstest]
fn builds_one_tree_per_directory() {
    let dir = TempDir::new().unwrap();
    let database = database(&dir);

    let entries = vec![
        staged(&database, "README.md", "docs"),
        staged(&database, "src/main.rs", "fn main() {}"),
        staged(&database, "src/lib.rs", "pub mod areas;"),
    ];

    let root_oid = tree_from_index(&database, entries.iter()).unwrap();

    let root = database.parse_object_as_tree(&root_oid).unwrap().unwrap();
    let names = root
        .sorted_entries()
        .iter()
        .map(|leaf| (leaf.name.clone(), leaf.mode.is_tree()))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![("README.md".to_string(), false), ("src".to_string(), true)]
    );

    let src_oid = root
        .sorted_entries()
        .iter()
        .find(|leaf| leaf.mode == EntryMode::Directory)
        .map(|leaf| leaf.oid.clone())
        .unwrap();
    let src = database.parse_object_as_tree(&src_oid).unwrap().unwrap();
    let src_names = src
        .sorted_entries()
        .iter()
        .map(|leaf| leaf.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(src_names, vec!["lib.rs".to_string(), "main.rs".to_string()]);
}

#[rstest]
fn deeply_nested_paths_chain_their_trees() {
    let dir = TempDir::new().unwrap();
    let database = database(&dir);

    let entries = vec![staged(&database, "a/b/c/leaf.txt", "deep")];

    let root_oid = tree_from_index(&database, entries.iter()).unwrap();

    // each level holds exactly one subtree until the file appears
    let mut oid: ObjectId = root_oid;
    for expected in ["a", "b", "c"] {
        let tree = database.parse_object_as_tree(&oid).unwrap().unwrap();
        let entries = tree.sorted_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, expected);
        assert!(entries[0].mode.is_tree());
        oid = entries[0].oid.clone();
    }

    let leaves = database.parse_object_as_tree(&oid).unwrap().unwrap();
    assert_eq!(leaves.sorted_entries()[0].name, "leaf.txt");
}

#[rstest]
fn identical_entries_build_identical_roots() {
    let dir = TempDir::new().unwrap();
    let database = database(&dir);

    let entries = vec![
        staged(&database, "README.md", "docs"),
        staged(&database, "src/main.rs", "fn main() {}"),
    ];

    let first = tree_from_index(&database, entries.iter()).unwrap();
    let second = tree_from_index(&database, entries.iter()).unwrap();

    assert_eq!(first, second);
}

#[rstest]
fn stored_trees_round_trip_through_the_database() {
    let dir = TempDir::new().unwrap();
    let database = database(&dir);

    let entries = vec![staged(&database, "file.txt", "content")];
    let root_oid = tree_from_index(&database, entries.iter()).unwrap();

    let tree = database.parse_object_as_tree(&root_oid).unwrap().unwrap();
    assert_eq!(tree.object_id().unwrap(), root_oid);
}
