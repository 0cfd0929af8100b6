use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::collections::HashSet;
use std::io::Write;

impl Repository {
    /// Print the commit history reachable from a commit-ish, newest
    /// first. Merge parents join the walk; each commit is printed once
    /// even when reachable through several parents.
    pub fn log(&self, name: &str) -> anyhow::Result<()> {
        let start = self
            .find_object(name, Some(ObjectType::Commit), true)?
            .with_context(|| format!("no commit reachable from {name}"))?;

        let mut pending = vec![start];
        let mut seen: HashSet<ObjectId> = HashSet::new();

        while let Some(commit_oid) = pending.pop() {
            if !seen.insert(commit_oid.clone()) {
                continue;
            }

            let commit = self
                .database()
                .parse_object_as_commit(&commit_oid)?
                .with_context(|| format!("commit object not found: {}", commit_oid.as_ref()))?;

            writeln!(self.writer(), "commit {}", commit_oid.as_ref())?;
            writeln!(self.writer(), "Author: {}", commit.author()?.display_name())?;
            writeln!(
                self.writer(),
                "Date:   {}",
                commit.author()?.readable_timestamp()
            )?;
            writeln!(self.writer())?;
            for message_line in commit.message().lines() {
                writeln!(self.writer(), "    {}", message_line)?;
            }
            writeln!(self.writer())?;

            pending.extend(commit.parents()?);
        }

        Ok(())
    }
}
