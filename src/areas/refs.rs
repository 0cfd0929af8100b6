//! Reference files (HEAD, branches, tags)
//!
//! A reference file holds either a 40-hex object id or `ref: <path>`
//! redirecting to another reference; resolution follows the chain
//! until a direct hash is reached. Ref updates replace the whole file.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use fake::rand;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Pattern of an indirect (symbolic) reference line
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

/// Contents of a single reference file.
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        if let Some(captures) = Regex::new(SYMREF_REGEX)?.captures(content) {
            Ok(Some(SymRefOrOid::SymRef(captures[1].to_string())))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

/// Reference store rooted at the metadata directory (`.git`).
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Resolve a reference name (a path relative to the metadata
    /// directory) to a hash, following `ref: ` indirection
    /// recursively. Missing or empty files resolve to None.
    pub fn resolve_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        self.resolve_ref_path(&self.path.join(name))
    }

    fn resolve_ref_path(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read(path)? {
            Some(SymRefOrOid::SymRef(target)) => self.resolve_ref_path(&self.path.join(target)),
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.resolve_ref(HEAD_REF_NAME)
    }

    /// Point HEAD's final target at a new commit, following symbolic
    /// indirection so the current branch file is the one updated.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_symref(&self.head_path(), oid)
    }

    fn update_symref(&self, path: &Path, oid: &ObjectId) -> anyhow::Result<()> {
        match SymRefOrOid::read(path)? {
            Some(SymRefOrOid::SymRef(target)) => {
                self.update_symref(&self.path.join(target), oid)
            }
            Some(SymRefOrOid::Oid(_)) | None => {
                self.update_ref_file(path, format!("{}\n", oid.as_ref()))
            }
        }
    }

    /// Whole-file replace of a reference: the new content goes to a
    /// temp sibling first and is renamed into place, so readers never
    /// see a truncated ref.
    pub fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        let ref_dir = path
            .parent()
            .context(format!("Invalid reference path {}", path.display()))?;
        std::fs::create_dir_all(ref_dir)?;

        let temp_ref_path = ref_dir.join(Self::generate_temp_name());
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_ref_path)?;
        ref_file.write_all(raw_ref.as_bytes())?;
        drop(ref_file);

        std::fs::rename(&temp_ref_path, path)?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-ref-{}", rand::random::<u32>())
    }

    /// All references under `refs/`, resolved, in name order.
    pub fn list_refs(&self) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let mut refs = BTreeMap::new();

        for entry in WalkDir::new(self.refs_path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
        {
            let name = entry
                .path()
                .strip_prefix(self.path.as_ref())
                .map(|p| p.to_string_lossy().to_string())?;

            if let Some(oid) = self.resolve_ref_path(entry.path())? {
                refs.insert(name, oid);
            }
        }

        Ok(refs)
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn tags_path(&self) -> PathBuf {
        self.refs_path().join("tags")
    }
}
