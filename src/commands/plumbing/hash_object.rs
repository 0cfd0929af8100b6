use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Hash a file as an object of the given kind, optionally storing
    /// it in the object database.
    pub fn hash_object(&self, file: &str, kind: &str, write: bool) -> anyhow::Result<()> {
        let data = self.workspace().read_file(file.as_ref())?;

        let oid = match ObjectType::try_from(kind)? {
            ObjectType::Blob => self.hash_one(&Blob::new(data), write)?,
            ObjectType::Tree => self.hash_one(&Tree::deserialize(&data)?, write)?,
            ObjectType::Commit => self.hash_one(&Commit::deserialize(&data)?, write)?,
            ObjectType::Tag => self.hash_one(&Tag::deserialize(&data)?, write)?,
        };

        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }

    fn hash_one(&self, object: &impl Object, write: bool) -> anyhow::Result<ObjectId> {
        if write {
            self.database().store(object)
        } else {
            object.object_id()
        }
    }
}
