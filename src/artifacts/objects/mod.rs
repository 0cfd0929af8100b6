//! Object types stored in the database (blob, tree, commit, tag)

pub mod author;
pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tag;
pub mod tree;

/// Length of a hex-encoded SHA-1 object id
pub const OBJECT_ID_LENGTH: usize = 40;
