use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// How a tracked file differs between the index and the working tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Modified,
    Deleted,
}

impl WorkspaceChangeType {
    pub fn porcelain_code(&self) -> &'static str {
        match self {
            WorkspaceChangeType::None => " ",
            WorkspaceChangeType::Modified => "M",
            WorkspaceChangeType::Deleted => "D",
        }
    }
}

/// How a tracked file differs between HEAD and the index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

impl IndexChangeType {
    pub fn porcelain_code(&self) -> &'static str {
        match self {
            IndexChangeType::None => " ",
            IndexChangeType::Added => "A",
            IndexChangeType::Modified => "M",
            IndexChangeType::Deleted => "D",
        }
    }
}

/// A change attributed to one of the three comparison areas, carrying
/// the long-form label used by the human-readable report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Untracked,
    Workspace(WorkspaceChangeType),
    Index(IndexChangeType),
}

impl FileChangeType {
    fn label(&self) -> &'static str {
        match self {
            FileChangeType::Untracked => "",
            FileChangeType::Workspace(change) => match change {
                WorkspaceChangeType::None => "",
                WorkspaceChangeType::Modified => "modified:   ",
                WorkspaceChangeType::Deleted => "deleted:    ",
            },
            FileChangeType::Index(change) => match change {
                IndexChangeType::None => "",
                IndexChangeType::Added => "new file:   ",
                IndexChangeType::Modified => "modified:   ",
                IndexChangeType::Deleted => "deleted:    ",
            },
        }
    }
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileChangeType::Untracked => self.label().normal(),
            FileChangeType::Workspace(_) => self.label().red(),
            FileChangeType::Index(_) => self.label().green(),
        };
        write!(f, "{:>width$}{}", "", label, width = LABEL_WIDTH)
    }
}

/// Combined two-column state of one path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub(crate) workspace_change: WorkspaceChangeType,
    pub(crate) index_change: IndexChangeType,
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.index_change.porcelain_code(),
            self.workspace_change.porcelain_code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_column_codes_compose() {
        let change = FileChange {
            workspace_change: WorkspaceChangeType::Modified,
            index_change: IndexChangeType::Added,
        };
        assert_eq!(change.to_string(), "AM");

        let unchanged = FileChange::default();
        assert_eq!(unchanged.to_string(), "  ");
    }
}
