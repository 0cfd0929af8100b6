use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// List every reference under `refs/` with its resolved hash.
    pub fn show_ref(&self) -> anyhow::Result<()> {
        for (name, oid) in self.refs().list_refs()? {
            writeln!(self.writer(), "{oid} {name}")?;
        }

        Ok(())
    }
}
