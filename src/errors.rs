//! Typed error kinds surfaced by the core
//!
//! Every failure here is fatal to the triggering operation: the core never
//! retries, never guesses a default object kind and never repairs a
//! truncated index. Callers receive these through `anyhow::Result` and can
//! downcast when they need to distinguish kinds.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository (or any parent up to the filesystem root): {0}")]
    NotARepository(PathBuf),

    #[error("corrupt object {0}: {1}")]
    CorruptObject(String, String),

    #[error("unknown object kind {0:?}")]
    UnknownObjectKind(String),

    #[error("no such reference {0}")]
    NoSuchReference(String),

    #[error("ambiguous reference {name}: candidates are:\n - {}", candidates.join("\n - "))]
    AmbiguousReference {
        name: String,
        candidates: Vec<String>,
    },

    #[error("malformed index: {0}")]
    MalformedIndex(String),

    #[error("path is outside the worktree: {0}")]
    PathOutsideWorktree(PathBuf),

    #[error("path is not tracked in the index: {0}")]
    PathNotInIndex(PathBuf),

    #[error("checkout destination is not empty: {0}")]
    DestinationNotEmpty(PathBuf),

    #[error("unsupported entry {path} (mode {mode})")]
    UnsupportedEntry { path: PathBuf, mode: String },

    #[error("cannot resolve {name} to a {kind}")]
    CannotResolve { name: String, kind: String },
}
