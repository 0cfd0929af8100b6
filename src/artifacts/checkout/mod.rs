//! Tree materialization into a directory
//!
//! Instantiates a stored tree on disk with an explicit worklist: tree
//! entries become directories, blobs become files. The destination has
//! to start out empty so checkout never overwrites unrelated work.

use crate::areas::database::Database;
use crate::artifacts::index::entry_mode::{EntryMode, FileKind};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::GitError;
use anyhow::Context;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Materialize the tree identified by `tree_oid` under `destination`.
///
/// The destination is created if missing and must otherwise be an
/// empty directory. Symlink and gitlink entries are refused; writing
/// their payload as a plain file would silently corrupt the worktree.
pub fn checkout_tree(
    database: &Database,
    tree_oid: &ObjectId,
    destination: &Path,
) -> anyhow::Result<()> {
    prepare_destination(destination)?;

    let root = database
        .parse_object_as_tree(tree_oid)?
        .with_context(|| format!("not a tree: {}", tree_oid.as_ref()))?;

    // (tree, directory it unpacks into)
    let mut worklist: Vec<(Tree, PathBuf)> = vec![(root, destination.to_path_buf())];

    while let Some((tree, dir)) = worklist.pop() {
        for leaf in tree.entries() {
            let target = dir.join(&leaf.name);

            match leaf.mode {
                EntryMode::Directory => {
                    std::fs::create_dir(&target)?;
                    let subtree = database
                        .parse_object_as_tree(&leaf.oid)?
                        .with_context(|| format!("not a tree: {}", leaf.oid.as_ref()))?;
                    worklist.push((subtree, target));
                }
                EntryMode::File(mode) => match mode.kind {
                    FileKind::Regular => {
                        let blob = database
                            .parse_object_as_blob(&leaf.oid)?
                            .with_context(|| format!("not a blob: {}", leaf.oid.as_ref()))?;
                        std::fs::write(&target, blob.content())?;
                        std::fs::set_permissions(
                            &target,
                            std::fs::Permissions::from_mode(u32::from(mode.perms)),
                        )?;
                    }
                    FileKind::Symlink | FileKind::Gitlink => {
                        return Err(GitError::UnsupportedEntry {
                            path: target,
                            mode: leaf.mode.to_string(),
                        }
                        .into());
                    }
                },
            }
        }
    }

    Ok(())
}

fn prepare_destination(destination: &Path) -> anyhow::Result<()> {
    if !destination.exists() {
        std::fs::create_dir_all(destination)?;
        return Ok(());
    }

    if !destination.is_dir() || std::fs::read_dir(destination)?.next().is_some() {
        return Err(GitError::DestinationNotEmpty(destination.to_path_buf()).into());
    }

    Ok(())
}
