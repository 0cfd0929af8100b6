//! Data structures and algorithms
//!
//! This module contains the core object model and the algorithms built
//! on top of it:
//!
//! - `checkout`: Tree materialization into the working directory
//! - `ignore`: Ignore rule parsing and path matching
//! - `index`: Index/staging area data structures
//! - `kvlm`: Key-value list with message, the commit and tag text format
//! - `objects`: Object types (blob, tree, commit, tag)
//! - `status`: Working tree status inspection
//! - `tree_builder`: Index flattening into a forest of tree objects

pub mod checkout;
pub mod ignore;
pub mod index;
pub mod kvlm;
pub mod objects;
pub mod status;
pub mod tree_builder;
