//! Tree object: an ordered directory snapshot
//!
//! Each entry is `<mode-octal> <name>\0` followed by the 20 raw hash
//! bytes. Entries serialize sorted by a key that appends `/` to
//! directory names before comparison, so a directory and a
//! same-prefixed file interleave exactly as the reference
//! implementation orders them (`a.txt` < `a/` < `b`). Hash stability
//! depends on this ordering.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

/// One tree entry: mode, basename and target hash.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeLeaf {
    pub mode: EntryMode,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeLeaf {
    /// Canonical ordering key: directories compare as `name/`.
    fn sort_key(&self) -> String {
        if self.mode.is_tree() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Tree {
    entries: Vec<TreeLeaf>,
}

impl Tree {
    pub fn add(&mut self, leaf: TreeLeaf) {
        self.entries.push(leaf);
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeLeaf> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeLeaf> {
        self.entries.into_iter()
    }

    /// Entries in canonical order.
    pub fn sorted_entries(&self) -> Vec<&TreeLeaf> {
        let mut entries: Vec<&TreeLeaf> = self.entries.iter().collect();
        entries.sort_by_key(|leaf| leaf.sort_key());
        entries
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for leaf in self.sorted_entries() {
            write!(content_bytes, "{} {}", leaf.mode.as_octal_str(), leaf.name)?;
            content_bytes.push(0);
            leaf.oid.write_h40_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: &[u8]) -> anyhow::Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < payload.len() {
            let spc = payload[pos..]
                .iter()
                .position(|&b| b == b' ')
                .map(|p| pos + p)
                .context("unexpected EOF in tree entry mode")?;
            let mode = EntryMode::from_octal_str(std::str::from_utf8(&payload[pos..spc])?)?;

            let nul = payload[spc..]
                .iter()
                .position(|&b| b == b'\0')
                .map(|p| spc + p)
                .context("unexpected EOF in tree entry name")?;
            let name = std::str::from_utf8(&payload[spc + 1..nul])?.to_owned();

            let mut oid_bytes = payload
                .get(nul + 1..nul + 21)
                .context("unexpected EOF in tree entry hash")?;
            let oid = ObjectId::read_h40_from(&mut oid_bytes)?;

            entries.push(TreeLeaf::new(mode, name, oid));
            pos = nul + 21;
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.sorted_entries()
            .iter()
            .map(|leaf| {
                let kind = if leaf.mode.is_tree() {
                    ObjectType::Tree
                } else {
                    ObjectType::Blob
                };
                format!("{} {} {}\t{}", leaf.mode, kind, leaf.oid, leaf.name)
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    #[rstest]
    fn directories_sort_with_a_trailing_separator() {
        let mut tree = Tree::default();
        tree.add(TreeLeaf::new(EntryMode::File(FileMode::regular()), "b".into(), oid('1')));
        tree.add(TreeLeaf::new(EntryMode::Directory, "a".into(), oid('2')));
        tree.add(TreeLeaf::new(EntryMode::File(FileMode::regular()), "a.txt".into(), oid('3')));

        let order: Vec<&str> = tree
            .sorted_entries()
            .iter()
            .map(|leaf| leaf.name.as_str())
            .collect();
        assert_eq!(order, vec!["a.txt", "a", "b"]);
    }

    #[rstest]
    fn empty_tree_hashes_like_the_reference_implementation() {
        let tree = Tree::default();
        assert_eq!(
            tree.object_id().unwrap().as_ref(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[rstest]
    fn wire_form_round_trips() {
        let mut tree = Tree::default();
        tree.add(TreeLeaf::new(EntryMode::File(FileMode::executable()), "run.sh".into(), oid('a')));
        tree.add(TreeLeaf::new(EntryMode::Directory, "src".into(), oid('b')));

        let serialized = tree.serialize().unwrap();
        let nul = serialized.iter().position(|&b| b == 0).unwrap();
        let reread = Tree::deserialize(&serialized[nul + 1..]).unwrap();

        let mut expected = tree.sorted_entries().into_iter().cloned().collect::<Vec<_>>();
        let reread_entries = reread.into_entries().collect::<Vec<_>>();
        expected.sort_by_key(|leaf| leaf.sort_key());
        assert_eq!(reread_entries, expected);
    }

    #[rstest]
    fn serialized_ids_are_stable_across_runs() {
        let build = || {
            let mut tree = Tree::default();
            tree.add(TreeLeaf::new(EntryMode::Directory, "src".into(), oid('b')));
            tree.add(TreeLeaf::new(EntryMode::File(FileMode::regular()), "README".into(), oid('a')));
            tree.object_id().unwrap()
        };
        assert_eq!(build(), build());
    }
}
