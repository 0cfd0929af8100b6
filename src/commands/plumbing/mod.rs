//! Plumbing commands (low-level operations)
//!
//! Direct access to the object database and reference store, used for
//! scripting and as building blocks for porcelain commands.
//!
//! ## Commands
//!
//! - `cat-file`: Print an object of a requested kind
//! - `hash-object`: Compute an object id and optionally store it
//! - `ls-tree`: List the contents of a tree object
//! - `rev-parse`: Resolve a name to an object id
//! - `show-ref`: List references with their targets

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
pub mod rev_parse;
pub mod show_ref;
