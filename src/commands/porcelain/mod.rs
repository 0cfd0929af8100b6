//! Porcelain commands (user-facing operations)
//!
//! High-level commands composing the plumbing layer and the internal
//! areas into workflows matching typical usage.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files
//! - `rm`: Unstage and delete files
//! - `commit`: Record the staged tree as a commit
//! - `log`: Print the commit history, newest first
//! - `status`: Show working tree status
//! - `checkout`: Materialize a commit or tree into a directory
//! - `tag`: List or create tags

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod rm;
pub mod status;
pub mod tag;
