use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::Status;
use std::io::Write;

impl Repository {
    /// Show the three-way status of the working tree: staged changes,
    /// unstaged changes and untracked files, in the short two-column
    /// format with colored long-form sections.
    pub fn status(&self, porcelain: bool) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let info = Status::new(self).initialize(&mut index)?;

        // unchanged entries may have had their stat cache refreshed
        index.write_updates()?;
        drop(index);

        if porcelain {
            for (file, change) in info.changed_files() {
                writeln!(self.writer(), "{} {}", change, file.display())?;
            }
            for file in info.untracked_files() {
                writeln!(self.writer(), "?? {}", file.display())?;
            }
            return Ok(());
        }

        if !info.index_changeset().is_empty() {
            writeln!(self.writer(), "Changes to be committed:")?;
            for (file, change) in info.index_changeset() {
                writeln!(self.writer(), "{}{}", change, file.display())?;
            }
            writeln!(self.writer())?;
        }

        if !info.workspace_changeset().is_empty() {
            writeln!(self.writer(), "Changes not staged for commit:")?;
            for (file, change) in info.workspace_changeset() {
                writeln!(self.writer(), "{}{}", change, file.display())?;
            }
            writeln!(self.writer())?;
        }

        if !info.untracked_files().is_empty() {
            writeln!(self.writer(), "Untracked files:")?;
            for file in info.untracked_files() {
                writeln!(self.writer(), "        {}", file.display())?;
            }
            writeln!(self.writer())?;
        }

        if info.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}
