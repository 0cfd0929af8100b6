use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// List a tree, one entry per line as `<mode> <type> <hash>\t<path>`.
    /// With `recursive`, subtrees are expanded into their files instead
    /// of being listed themselves.
    pub fn ls_tree(&self, treeish: &str, recursive: bool) -> anyhow::Result<()> {
        let oid = self
            .find_object(treeish, Some(ObjectType::Tree), true)?
            .with_context(|| format!("no tree reachable from {treeish}"))?;

        self.print_tree(&oid, Path::new(""), recursive)
    }

    fn print_tree(&self, oid: &ObjectId, prefix: &Path, recursive: bool) -> anyhow::Result<()> {
        let tree = self
            .database()
            .parse_object_as_tree(oid)?
            .with_context(|| format!("not a tree: {oid}"))?;

        for leaf in tree.sorted_entries() {
            let path = prefix.join(&leaf.name);

            if recursive && leaf.mode.is_tree() {
                self.print_tree(&leaf.oid, &path, recursive)?;
            } else {
                let kind = if leaf.mode.is_tree() {
                    ObjectType::Tree
                } else {
                    self.database().object_type(&leaf.oid)?
                };
                writeln!(
                    self.writer(),
                    "{} {} {}\t{}",
                    leaf.mode,
                    kind,
                    leaf.oid,
                    path.display()
                )?;
            }
        }

        Ok(())
    }
}
