use crate::areas::repository::Repository;
use crate::errors::GitError;

impl Repository {
    /// Unstage files and delete them from the working tree. Every path
    /// must be tracked; nothing is touched when any of them is not.
    pub fn rm(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let paths = paths
            .iter()
            .map(|path| self.worktree_relative(path))
            .collect::<Result<Vec<_>, _>>()?;

        for path in &paths {
            if !index.is_directly_tracked(path) {
                return Err(GitError::PathNotInIndex(path.clone()).into());
            }
        }

        for path in &paths {
            index.remove(path);

            let on_disk = self.path().join(path);
            if on_disk.is_file() {
                std::fs::remove_file(on_disk)?;
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
