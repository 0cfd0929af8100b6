use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::ignore::IgnoreRules;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type FileStatSet = BTreeMap<PathBuf, EntryMetadata>;
pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;
pub type FileSet = BTreeSet<PathBuf>;
pub type HeadTree = BTreeMap<PathBuf, HeadEntry>;

/// One file of the HEAD commit, flattened to its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadEntry {
    pub mode: FileMode,
    pub oid: ObjectId,
}

/// Everything a status report needs, computed in one pass.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub(crate) file_stats: FileStatSet,
    pub(crate) untracked_files: FileSet,
    pub(crate) changed_files: BTreeMap<PathBuf, FileChange>,
    pub(crate) untracked_changeset: ChangeSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) index_changeset: ChangeSet,
    pub(crate) head_tree: HeadTree,
}

impl StatusInfo {
    pub fn file_stats(&self) -> &FileStatSet {
        &self.file_stats
    }

    pub fn head_tree(&self) -> &HeadTree {
        &self.head_tree
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }

    pub fn untracked_changeset(&self) -> &ChangeSet {
        &self.untracked_changeset
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn index_changeset(&self) -> &ChangeSet {
        &self.index_changeset
    }

    pub fn changed_files(&self) -> &BTreeMap<PathBuf, FileChange> {
        &self.changed_files
    }

    pub fn is_clean(&self) -> bool {
        self.untracked_files.is_empty() && self.changed_files.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    /// Run the three-way comparison: working tree vs. index vs. HEAD.
    ///
    /// As a side effect, entries whose content turned out unchanged
    /// get their cached stat data refreshed in the given index, so a
    /// later `write_updates` re-arms the timestamp fast path.
    pub fn initialize(&self, index: &mut Index) -> anyhow::Result<StatusInfo> {
        let mut file_stats = FileStatSet::new();
        let mut untracked_files = FileSet::new();

        let inspector = Inspector::new(self.repository);
        let ignore_rules = IgnoreRules::load(
            index,
            self.repository.database(),
            &self.repository.metadata_path(),
        )?;

        self.scan_workspace(&mut untracked_files, &mut file_stats, index, &ignore_rules)?;
        let head_tree = self.load_head_tree()?;
        let mut changed_files =
            self.check_index_entries(&file_stats, &head_tree, index, &inspector)?;
        self.collect_deleted_head_files(&head_tree, index, &mut changed_files);

        let untracked_changeset = untracked_files
            .iter()
            .map(|file| (file.clone(), FileChangeType::Untracked))
            .collect::<BTreeMap<_, _>>();
        let workspace_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();
        let index_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Index(change.index_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();

        Ok(StatusInfo {
            file_stats,
            untracked_files,
            changed_files,
            untracked_changeset,
            workspace_changeset,
            index_changeset,
            head_tree,
        })
    }

    /// Walk the whole worktree once: stat tracked files, report the
    /// rest as untracked unless an ignore rule says otherwise.
    fn scan_workspace(
        &self,
        untracked_files: &mut FileSet,
        file_stats: &mut FileStatSet,
        index: &Index,
        ignore_rules: &IgnoreRules,
    ) -> anyhow::Result<()> {
        for path in self.repository.workspace().list_files(None)? {
            if index.is_directly_tracked(&path) {
                let stat = self.repository.workspace().stat_file(&path)?;
                file_stats.insert(path, stat);
            } else if !ignore_rules.is_ignored(&path) {
                untracked_files.insert(path);
            }
        }

        Ok(())
    }

    fn load_head_tree(&self) -> anyhow::Result<HeadTree> {
        let mut head_tree = HeadTree::new();

        if let Some(head_oid) = self.repository.refs().read_head()? {
            let commit = self.repository.database().parse_object_as_commit(&head_oid)?;

            if let Some(commit) = commit {
                flatten_tree(
                    self.repository.database(),
                    &commit.tree_oid()?,
                    &mut head_tree,
                )?;
            }
        }

        Ok(head_tree)
    }

    fn check_index_entries(
        &self,
        file_stats: &FileStatSet,
        head_tree: &HeadTree,
        index: &mut Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeMap<PathBuf, FileChange>> {
        let mut changed_files = BTreeMap::<PathBuf, FileChange>::new();
        let index_entries = index.entries().map(Clone::clone).collect::<Vec<_>>();

        for entry in index_entries {
            self.check_index_entry_against_workspace(
                &entry,
                file_stats,
                index,
                inspector,
                &mut changed_files,
            )?;
            self.check_index_entry_against_head_tree(
                &entry,
                head_tree,
                inspector,
                &mut changed_files,
            );
        }

        Ok(changed_files)
    }

    fn check_index_entry_against_workspace(
        &self,
        index_entry: &IndexEntry,
        file_stats: &FileStatSet,
        index: &mut Index,
        inspector: &Inspector<'_>,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) -> anyhow::Result<()> {
        let stat = file_stats.get(&index_entry.name);
        let status = inspector.check_index_against_workspace(index_entry, stat)?;

        if status != WorkspaceChangeType::None {
            changed_files
                .entry(index_entry.name.clone())
                .or_default()
                .workspace_change = status;
        } else if let Some(stat) = stat {
            index.update_entry_stat(index_entry, stat.clone());
        }

        Ok(())
    }

    fn check_index_entry_against_head_tree(
        &self,
        index_entry: &IndexEntry,
        head_tree: &HeadTree,
        inspector: &Inspector<'_>,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        let head_entry = head_tree.get(&index_entry.name);
        let status = inspector.check_index_against_head_tree(Some(index_entry), head_entry);

        if status != IndexChangeType::None {
            changed_files
                .entry(index_entry.name.clone())
                .or_default()
                .index_change = status;
        }
    }

    fn collect_deleted_head_files(
        &self,
        head_tree: &HeadTree,
        index: &Index,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        head_tree.iter().for_each(|(path, _)| {
            if !index.is_directly_tracked(path) {
                changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            }
        });
    }
}

/// Flatten a stored tree into full-path file entries with a worklist.
fn flatten_tree(
    database: &Database,
    tree_oid: &ObjectId,
    out: &mut HeadTree,
) -> anyhow::Result<()> {
    let root = database
        .parse_object_as_tree(tree_oid)?
        .ok_or_else(|| anyhow::anyhow!("not a tree: {}", tree_oid.as_ref()))?;

    let mut worklist = vec![(root, PathBuf::new())];

    while let Some((tree, prefix)) = worklist.pop() {
        for leaf in tree.into_entries() {
            let path = prefix.join(&leaf.name);
            match leaf.mode {
                EntryMode::Directory => {
                    let subtree = database
                        .parse_object_as_tree(&leaf.oid)?
                        .ok_or_else(|| anyhow::anyhow!("not a tree: {}", leaf.oid.as_ref()))?;
                    worklist.push((subtree, path));
                }
                EntryMode::File(mode) => {
                    out.insert(path, HeadEntry { mode, oid: leaf.oid });
                }
            }
        }
    }

    Ok(())
}
