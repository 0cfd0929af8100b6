//! Annotated tag object
//!
//! Tags share the commit's header+message format: `object`, `type`,
//! `tag` and `tagger` headers followed by the tag message. Lightweight
//! tags are just ref files and never reach this type.

use crate::artifacts::kvlm::Kvlm;
use crate::artifacts::objects::author::Author;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    pub fn new(
        target: &ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &Author,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.append(&b"object"[..], target.as_ref().as_bytes().to_vec());
        kvlm.append(&b"type"[..], target_type.as_str().as_bytes().to_vec());
        kvlm.append(&b"tag"[..], name.as_bytes().to_vec());
        kvlm.append(&b"tagger"[..], tagger.display().into_bytes());

        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        kvlm.set_message(message.into_bytes());

        Tag { kvlm }
    }

    fn header_str(&self, key: &[u8]) -> anyhow::Result<&str> {
        let value = self
            .kvlm
            .value(key)
            .with_context(|| format!("tag is missing the {} header", String::from_utf8_lossy(key)))?;
        Ok(std::str::from_utf8(value)?)
    }

    /// Hash of the tagged object.
    pub fn target(&self) -> anyhow::Result<ObjectId> {
        ObjectId::try_parse(self.header_str(b"object")?.to_string())
    }

    pub fn target_type(&self) -> anyhow::Result<ObjectType> {
        ObjectType::try_from(self.header_str(b"type")?)
    }

    pub fn name(&self) -> anyhow::Result<&str> {
        self.header_str(b"tag")
    }

    pub fn tagger(&self) -> anyhow::Result<Author> {
        Author::try_from(self.header_str(b"tagger")?)
    }

    pub fn message(&self) -> String {
        String::from_utf8_lossy(self.kvlm.message()).to_string()
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content_bytes = self.kvlm.serialize();

        let mut tag_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tag_bytes.write_all(header.as_bytes())?;
        tag_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tag_bytes))
    }
}

impl Unpackable for Tag {
    fn deserialize(payload: &[u8]) -> anyhow::Result<Self> {
        Ok(Tag {
            kvlm: Kvlm::parse(payload)?,
        })
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
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

    #[rstest]
    fn headers_round_trip() {
        let target = ObjectId::try_parse("a".repeat(40)).unwrap();
        let tagger = Author::try_from("Alice <alice@example.com> 1527025023 +0200").unwrap();
        let tag = Tag::new(&target, ObjectType::Commit, "v1.0", &tagger, "release\n");

        let serialized = tag.serialize().unwrap();
        let nul = serialized.iter().position(|&b| b == 0).unwrap();
        let reread = Tag::deserialize(&serialized[nul + 1..]).unwrap();

        assert_eq!(reread.target().unwrap(), target);
        assert_eq!(reread.target_type().unwrap(), ObjectType::Commit);
        assert_eq!(reread.name().unwrap(), "v1.0");
        assert_eq!(reread.message(), "release\n");
        assert_eq!(reread, tag);
    }
}
