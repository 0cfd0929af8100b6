use crate::areas::repository::Repository;
use crate::artifacts::objects::author::Author;
use crate::artifacts::objects::tag::Tag;
use std::io::Write;

impl Repository {
    /// List all tags, in name order.
    pub fn list_tags(&self) -> anyhow::Result<()> {
        for (name, _) in self.refs().list_refs()? {
            if let Some(tag_name) = name.strip_prefix("refs/tags/") {
                writeln!(self.writer(), "{tag_name}")?;
            }
        }

        Ok(())
    }

    /// Create a tag pointing at the given object (HEAD by default).
    ///
    /// A lightweight tag is just a reference file; with `annotated`, a
    /// tag object carrying the tagger and message is stored and the
    /// reference points at that object instead.
    pub fn tag(&self, name: &str, target: &str, annotated: bool) -> anyhow::Result<()> {
        let target_oid = self.resolve_object(target)?;

        let ref_target = if annotated {
            let target_type = self.database().object_type(&target_oid)?;
            let tagger = Author::load_from_env()?;
            let tag = Tag::new(
                &target_oid,
                target_type,
                name,
                &tagger,
                &format!("Tagged {target} as {name}"),
            );
            self.database().store(&tag)?
        } else {
            target_oid
        };

        let tag_path = self.refs().tags_path().join(name);
        self.refs()
            .update_ref_file(&tag_path, format!("{ref_target}\n"))?;

        Ok(())
    }
}
