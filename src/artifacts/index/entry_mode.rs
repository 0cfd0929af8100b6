//! File modes as stored in the index and in tree entries
//!
//! The index mode word packs a 4-bit type selector into the high bits and
//! 12 permission bits into the low bits. Trees spell the same mode as an
//! octal string: two type digits followed by four permission digits
//! (`100644`, `100755`, `120000`, `160000`), with `40000` for
//! subdirectories.

use crate::errors::GitError;

/// 4-bit type selector of the index mode word
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum FileKind {
    #[default]
    Regular,
    Symlink,
    Gitlink,
}

impl FileKind {
    pub fn bits(&self) -> u16 {
        match self {
            FileKind::Regular => 0b1000,
            FileKind::Symlink => 0b1010,
            FileKind::Gitlink => 0b1110,
        }
    }

    pub fn from_bits(bits: u16) -> anyhow::Result<Self> {
        match bits {
            0b1000 => Ok(FileKind::Regular),
            0b1010 => Ok(FileKind::Symlink),
            0b1110 => Ok(FileKind::Gitlink),
            _ => Err(GitError::MalformedIndex(format!("invalid mode type bits {bits:#06b}")).into()),
        }
    }
}

/// Index-side mode: type selector plus permission bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileMode {
    pub kind: FileKind,
    pub perms: u16,
}

impl FileMode {
    pub fn regular() -> Self {
        FileMode {
            kind: FileKind::Regular,
            perms: 0o644,
        }
    }

    pub fn executable() -> Self {
        FileMode {
            kind: FileKind::Regular,
            perms: 0o755,
        }
    }

    pub fn as_mode_word(&self) -> u16 {
        (self.kind.bits() << 12) | (self.perms & 0o7777)
    }

    pub fn from_mode_word(word: u16) -> anyhow::Result<Self> {
        Ok(FileMode {
            kind: FileKind::from_bits(word >> 12)?,
            perms: word & 0o7777,
        })
    }
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode::regular()
    }
}

/// Tree-side mode: a file mode or a subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryMode {
    File(FileMode),
    Directory,
}

impl EntryMode {
    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Octal text form used in serialized tree entries.
    pub fn as_octal_str(&self) -> String {
        match self {
            EntryMode::File(mode) => format!("{:02o}{:04o}", mode.kind.bits(), mode.perms),
            EntryMode::Directory => "40000".to_string(),
        }
    }

    pub fn from_octal_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "40000" | "040000" => Ok(EntryMode::Directory),
            _ => {
                let word = u32::from_str_radix(value, 8)
                    .map_err(|_| anyhow::anyhow!("invalid tree entry mode {value:?}"))?;
                let kind = FileKind::from_bits((word >> 12) as u16)
                    .map_err(|_| anyhow::anyhow!("invalid tree entry mode {value:?}"))?;
                Ok(EntryMode::File(FileMode {
                    kind,
                    perms: (word & 0o7777) as u16,
                }))
            }
        }
    }
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::regular())
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // ls-tree style, zero-padded to six digits
        write!(f, "{:0>6}", self.as_octal_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(EntryMode::File(FileMode::regular()), "100644")]
    #[case(EntryMode::File(FileMode::executable()), "100755")]
    #[case(EntryMode::File(FileMode { kind: FileKind::Symlink, perms: 0 }), "120000")]
    #[case(EntryMode::File(FileMode { kind: FileKind::Gitlink, perms: 0 }), "160000")]
    #[case(EntryMode::Directory, "40000")]
    fn octal_text_round_trips(#[case] mode: EntryMode, #[case] text: &str) {
        assert_eq!(mode.as_octal_str(), text);
        assert_eq!(EntryMode::from_octal_str(text).unwrap(), mode);
    }

    #[rstest]
    fn accepts_zero_padded_directory_mode() {
        assert_eq!(EntryMode::from_octal_str("040000").unwrap(), EntryMode::Directory);
    }

    #[rstest]
    fn mode_word_packs_type_and_permissions() {
        let mode = FileMode::executable();
        assert_eq!(mode.as_mode_word(), 0o100755);
        assert_eq!(FileMode::from_mode_word(0o100755).unwrap(), mode);
    }

    #[rstest]
    fn rejects_unknown_type_bits() {
        assert!(FileMode::from_mode_word(0b0110 << 12).is_err());
    }
}
