//! Working tree status inspection
//!
//! Compares the working directory against the index and the HEAD
//! commit and classifies every path.
//!
//! ## Components
//!
//! - `file_change`: Enum types for categorizing changes
//! - `inspector`: Core logic for detecting changes
//! - `status_info`: Status information aggregation and display

pub mod file_change;
pub mod inspector;
pub mod status_info;
