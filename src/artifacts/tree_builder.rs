//! Index flattening into tree objects
//!
//! Turns the flat list of staged entries into one tree object per
//! directory, deepest directories first, so every tree is stored
//! before the parent that names it.

use crate::areas::database::Database;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeLeaf};
use std::collections::HashMap;
use std::path::PathBuf;

/// Build and store a tree for every directory named by the given index
/// entries, returning the id of the root tree.
///
/// An empty entry list still produces (and stores) the empty root tree.
pub fn tree_from_index<'e>(
    database: &Database,
    entries: impl Iterator<Item = &'e IndexEntry>,
) -> anyhow::Result<ObjectId> {
    let mut contents: HashMap<PathBuf, Vec<TreeLeaf>> = HashMap::new();
    contents.insert(PathBuf::new(), Vec::new());

    for entry in entries {
        for dir in entry.parent_dirs() {
            contents.entry(dir.to_path_buf()).or_default();
        }

        let parent = entry.name.parent().map(PathBuf::from).unwrap_or_default();
        contents.entry(parent).or_default().push(TreeLeaf::new(
            EntryMode::File(entry.metadata.mode),
            entry.basename()?.to_string(),
            entry.oid.clone(),
        ));
    }

    // Deepest directories first, so child tree ids exist by the time
    // the parent tree references them.
    let mut dirs = contents.keys().cloned().collect::<Vec<_>>();
    dirs.sort_by_key(|dir| std::cmp::Reverse(dir.as_os_str().len()));

    let mut root_oid: Option<ObjectId> = None;

    for dir in dirs {
        let leaves = contents.remove(&dir).unwrap_or_default();
        let tree = Tree::new(leaves);
        let oid = database.store(&tree)?;

        match dir.parent() {
            Some(parent) => {
                let name = dir
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("unnamed directory in index: {:?}", dir))?
                    .to_string_lossy()
                    .to_string();
                contents.entry(PathBuf::from(parent)).or_default().push(
                    TreeLeaf::new(EntryMode::Directory, name, oid),
                );
            }
            None => root_oid = Some(oid),
        }
    }

    root_oid.ok_or_else(|| anyhow::anyhow!("index flattening produced no root tree"))
}
