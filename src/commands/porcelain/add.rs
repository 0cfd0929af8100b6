use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::{EntryFlags, IndexEntry};

impl Repository {
    /// Stage files: hash their content into the database and record
    /// each as an index entry with fresh stat data. Directory paths
    /// expand to every file below them.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let paths = paths
            .iter()
            .map(|path| {
                let relative = self.worktree_relative(path)?;
                self.workspace().list_files(Some(self.path().join(relative)))
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten();

        for path in paths {
            let blob = self.workspace().parse_blob(&path)?;
            let stat = self.workspace().stat_file(&path)?;

            let blob_id = self.database().store(&blob)?;
            index.add(IndexEntry::new(path, blob_id, stat, EntryFlags::default()));
        }

        index.write_updates()?;

        Ok(())
    }
}
