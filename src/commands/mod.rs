//! Command implementations
//!
//! All command implementations, organized into two categories
//! following git's architecture:
//!
//! - `plumbing`: Low-level commands for direct object manipulation
//!   (cat-file, hash-object, ls-tree, rev-parse, show-ref)
//! - `porcelain`: User-facing commands for version control workflows
//!   (init, add, rm, commit, status, checkout, tag)
//!
//! Plumbing commands provide building blocks, while porcelain commands
//! compose them into higher-level operations.

pub mod plumbing;
pub mod porcelain;

use crate::areas::repository::Repository;
use crate::errors::GitError;
use std::path::{Path, PathBuf};

impl Repository {
    /// Turn a user-supplied path into one relative to the worktree
    /// root, refusing paths that escape it.
    pub(crate) fn worktree_relative(&self, path: &str) -> anyhow::Result<PathBuf> {
        let path = Path::new(path);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        // canonicalize when possible so `..` segments cannot sneak out
        let absolute = std::fs::canonicalize(&absolute).unwrap_or(absolute);

        absolute
            .strip_prefix(self.path())
            .map(PathBuf::from)
            .map_err(|_| GitError::PathOutsideWorktree(absolute.clone()).into())
    }
}
