use crate::areas::repository::Repository;
use crate::artifacts::objects::author::Author;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::tree_builder::tree_from_index;
use std::io::Write;

impl Repository {
    /// Record the staged tree as a new commit on the current branch.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let tree_id = tree_from_index(self.database(), index.entries())?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };
        let parents = parent.into_iter().collect::<Vec<_>>();

        let author = Author::load_from_env()?;
        let message = message.trim();

        let commit = Commit::new(&tree_id, &parents, &author, &author, message);
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            message.lines().next().unwrap_or_default()
        )?;

        Ok(())
    }
}
