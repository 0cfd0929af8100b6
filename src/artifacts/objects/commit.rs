//! Commit object: a typed view over the shared header+message format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The headers round-trip through [`Kvlm`] so unknown keys (gpgsig,
//! encoding, ...) survive a read/write cycle untouched.

use crate::artifacts::kvlm::Kvlm;
use crate::artifacts::objects::author::Author;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    pub fn new(
        tree_oid: &ObjectId,
        parents: &[ObjectId],
        author: &Author,
        committer: &Author,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.append(&b"tree"[..], tree_oid.as_ref().as_bytes().to_vec());
        for parent in parents {
            kvlm.append(&b"parent"[..], parent.as_ref().as_bytes().to_vec());
        }
        kvlm.append(&b"author"[..], author.display().into_bytes());
        kvlm.append(&b"committer"[..], committer.display().into_bytes());

        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        kvlm.set_message(message.into_bytes());

        Commit { kvlm }
    }

    fn header_str(&self, key: &[u8]) -> anyhow::Result<&str> {
        let value = self
            .kvlm
            .value(key)
            .with_context(|| format!("commit is missing the {} header", String::from_utf8_lossy(key)))?;
        Ok(std::str::from_utf8(value)?)
    }

    pub fn tree_oid(&self) -> anyhow::Result<ObjectId> {
        ObjectId::try_parse(self.header_str(b"tree")?.to_string())
    }

    pub fn parents(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.kvlm
            .values(b"parent")
            .unwrap_or_default()
            .iter()
            .map(|value| ObjectId::try_parse(std::str::from_utf8(value)?.to_string()))
            .collect()
    }

    pub fn author(&self) -> anyhow::Result<Author> {
        Author::try_from(self.header_str(b"author")?)
    }

    pub fn message(&self) -> String {
        String::from_utf8_lossy(self.kvlm.message()).to_string()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content_bytes = self.kvlm.serialize();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(payload: &[u8]) -> anyhow::Result<Self> {
        Ok(Commit {
            kvlm: Kvlm::parse(payload)?,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.kvlm.serialize()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn author() -> Author {
        Author::try_from("Alice <alice@example.com> 1527025023 +0200").unwrap()
    }

    #[rstest]
    fn typed_accessors_read_the_headers() {
        let commit = Commit::new(&oid('1'), &[oid('2'), oid('3')], &author(), &author(), "subject");

        assert_eq!(commit.tree_oid().unwrap(), oid('1'));
        assert_eq!(commit.parents().unwrap(), vec![oid('2'), oid('3')]);
        assert_eq!(commit.author().unwrap(), author());
        assert_eq!(commit.message(), "subject\n");
    }

    #[rstest]
    fn payload_round_trips_through_kvlm() {
        let commit = Commit::new(&oid('1'), &[], &author(), &author(), "subject\n\nbody\n");

        let serialized = commit.serialize().unwrap();
        let nul = serialized.iter().position(|&b| b == 0).unwrap();
        let reread = Commit::deserialize(&serialized[nul + 1..]).unwrap();

        assert_eq!(reread, commit);
        assert_eq!(reread.serialize().unwrap(), serialized);
    }

    #[rstest]
    fn root_commit_has_no_parents() {
        let commit = Commit::new(&oid('1'), &[], &author(), &author(), "root");
        assert_eq!(commit.parents().unwrap(), Vec::<ObjectId>::new());
    }
}
