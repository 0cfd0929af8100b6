use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Print an object, resolving the name and following tags or
    /// commits until an object of the requested kind is reached.
    pub fn cat_file(&self, kind: &str, name: &str) -> anyhow::Result<()> {
        let kind = ObjectType::try_from(kind)?;
        let oid = self
            .find_object(name, Some(kind), true)?
            .with_context(|| format!("no {kind} reachable from {name}"))?;

        // Blobs go out raw; a lossy UTF-8 conversion would corrupt
        // binary payloads.
        match self.database().parse_object(&oid)? {
            ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
            object => write!(self.writer(), "{}", object.display())?,
        }

        Ok(())
    }
}
