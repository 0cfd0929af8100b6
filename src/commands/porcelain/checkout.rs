use crate::areas::repository::Repository;
use crate::artifacts::checkout::checkout_tree;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Materialize a commit or tree into a directory, which must be
    /// empty or missing.
    pub fn checkout(&self, treeish: &str, destination: &str) -> anyhow::Result<()> {
        let tree_oid = self
            .find_object(treeish, Some(ObjectType::Tree), true)?
            .with_context(|| format!("no tree reachable from {treeish}"))?;

        checkout_tree(self.database(), &tree_oid, Path::new(destination))?;

        writeln!(
            self.writer(),
            "Checked out {} into {}",
            tree_oid.to_short_oid(),
            destination
        )?;

        Ok(())
    }
}
