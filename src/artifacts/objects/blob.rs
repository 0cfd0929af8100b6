//! Blob object: an opaque byte payload
//!
//! Blobs carry file content and nothing else; names and modes live in
//! the trees that reference them.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(payload: &[u8]) -> anyhow::Result<Self> {
        Ok(Self::new(Bytes::copy_from_slice(payload)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn hashes_like_the_reference_implementation() {
        // `echo "hello world" | git hash-object --stdin`
        let blob = Blob::new(Bytes::from_static(b"hello world\n"));
        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "3b18e512dba79e4c8300dd08aeb37f8e728b8dad"
        );

        let empty = Blob::default();
        assert_eq!(
            empty.object_id().unwrap().as_ref(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
    }

    #[rstest]
    fn payload_round_trips() {
        let blob = Blob::new(Bytes::from_static(&[0, 159, 146, 150]));
        let serialized = blob.serialize().unwrap();

        let nul = serialized.iter().position(|&b| b == 0).unwrap();
        let reread = Blob::deserialize(&serialized[nul + 1..]).unwrap();
        assert_eq!(reread, blob);
    }
}
