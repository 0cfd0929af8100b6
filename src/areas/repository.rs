use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;
use regex::Regex;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Pattern of names eligible for hash-prefix lookup
const HASH_PREFIX_REGEX: &str = r"^[0-9a-fA-F]{4,40}$";

pub const METADATA_DIR_NAME: &str = ".git";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open (or lay the handle over) the repository rooted at `path`,
    /// creating the directory itself if missing. Does not require the
    /// metadata directory to exist yet; `init` creates it.
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = Path::new(path).canonicalize()?;

        let metadata_path = path.join(METADATA_DIR_NAME);
        let index = Index::new(metadata_path.join("index").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    /// Locate the repository containing `path` by walking up towards
    /// the filesystem root until a metadata directory is found.
    pub fn find(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = Path::new(path).canonicalize()?;

        let mut current = start.as_path();
        loop {
            if current.join(METADATA_DIR_NAME).is_dir() {
                return Self::new(
                    current
                        .to_str()
                        .ok_or_else(|| anyhow::anyhow!("non-utf8 repository path"))?,
                    writer,
                );
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return Err(GitError::NotARepository(start).into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> std::path::PathBuf {
        self.path.join(METADATA_DIR_NAME)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Resolve a user-supplied name to exactly one object id.
    ///
    /// Candidates are collected from every namespace the name could
    /// live in: HEAD, abbreviated or full hashes, tags, then branches.
    /// No candidate is an error, and so is more than one.
    pub fn resolve_object(&self, name: &str) -> anyhow::Result<ObjectId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GitError::NoSuchReference(name.to_string()).into());
        }

        if name == HEAD_REF_NAME {
            return self
                .refs
                .read_head()?
                .ok_or_else(|| GitError::NoSuchReference(name.to_string()).into());
        }

        let mut candidates: Vec<ObjectId> = Vec::new();

        if Regex::new(HASH_PREFIX_REGEX)?.is_match(name) {
            candidates.extend(self.database.find_objects_by_prefix(&name.to_lowercase())?);
        }

        if let Some(oid) = self.refs.resolve_ref(&format!("refs/tags/{name}"))? {
            candidates.push(oid);
        }

        if let Some(oid) = self.refs.resolve_ref(&format!("refs/heads/{name}"))? {
            candidates.push(oid);
        }

        match candidates.len() {
            0 => Err(GitError::NoSuchReference(name.to_string()).into()),
            1 => Ok(candidates.remove(0)),
            _ => {
                let mut listing = candidates
                    .iter()
                    .map(|oid| oid.as_ref().to_string())
                    .collect::<Vec<_>>();
                listing.sort();
                listing.dedup();

                if listing.len() == 1 {
                    // same object reachable through several namespaces
                    return Ok(candidates.remove(0));
                }

                Err(GitError::AmbiguousReference {
                    name: name.to_string(),
                    candidates: listing,
                }
                .into())
            }
        }
    }

    /// Resolve a name and, when a specific kind is wanted, follow tag
    /// and commit indirection until an object of that kind is reached.
    ///
    /// Without `follow`, a kind mismatch yields `None` instead of
    /// walking the redirection chain.
    pub fn find_object(
        &self,
        name: &str,
        kind: Option<ObjectType>,
        follow: bool,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut oid = self.resolve_object(name)?;

        let Some(kind) = kind else {
            return Ok(Some(oid));
        };

        loop {
            let actual = self.database.object_type(&oid)?;

            if actual == kind {
                return Ok(Some(oid));
            }

            if !follow {
                return Ok(None);
            }

            oid = match actual {
                ObjectType::Tag => {
                    let tag = match self.database.parse_object(&oid)? {
                        crate::artifacts::objects::object::ObjectBox::Tag(tag) => tag,
                        _ => unreachable!("header kind already checked"),
                    };
                    tag.target()?
                }
                ObjectType::Commit if kind == ObjectType::Tree => {
                    let commit = self
                        .database
                        .parse_object_as_commit(&oid)?
                        .ok_or_else(|| anyhow::anyhow!("commit vanished during resolution"))?;
                    commit.tree_oid()?
                }
                _ => {
                    return Err(GitError::CannotResolve {
                        name: name.to_string(),
                        kind: kind.to_string(),
                    }
                    .into());
                }
            };
        }
    }
}
