use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    /// Resolve a name (HEAD, branch, tag or hash prefix) to a full
    /// object id, optionally insisting on a kind.
    pub fn rev_parse(&self, name: &str, kind: Option<&str>) -> anyhow::Result<()> {
        let kind = kind.map(ObjectType::try_from).transpose()?;

        match self.find_object(name, kind, true)? {
            Some(oid) => writeln!(self.writer(), "{oid}")?,
            None => writeln!(self.writer(), "undefined")?,
        }

        Ok(())
    }
}
