//! One tracked path in the staging index
//!
//! The fixed 62-byte head carries the cached stat data, the content
//! hash and a flags word (assume-valid bit, 2-bit merge stage, 12-bit
//! name length). The path follows, NUL-terminated, and the whole entry
//! is zero-padded to an 8-byte boundary. Names of 0xFFF bytes or more
//! store 0xFFF inline and are read up to the next NUL.

use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitError;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::cmp::min;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

/// Inline limit of the 12-bit name-length field
const MAX_NAME_LENGTH: usize = 0xFFF;

/// Entries are zero-padded to this alignment
pub const ENTRY_BLOCK: usize = 8;

/// Smallest possible entry: 62-byte head, one name byte, NUL, padding
pub const ENTRY_MIN_SIZE: usize = 64;

const FLAG_ASSUME_VALID: u16 = 0b1000_0000_0000_0000;
const FLAG_EXTENDED: u16 = 0b0100_0000_0000_0000;
const FLAG_STAGE_MASK: u16 = 0b0011_0000_0000_0000;

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Path relative to the worktree root
    pub name: PathBuf,
    /// Content hash of the staged blob
    pub oid: ObjectId,
    /// Cached stat data for fast change detection
    pub metadata: EntryMetadata,
    pub flags: EntryFlags,
}

/// The two flag bits of the entry flags word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct EntryFlags {
    pub assume_valid: bool,
    pub stage: u8,
}

/// Cached stat data: both timestamps, identity of the containing
/// device/inode, ownership and size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: FileMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name"))
    }

    /// Ancestor directories from the top down, excluding the root.
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = Vec::new();
        let mut parent = self.name.parent();

        while let Some(new_parent) = parent {
            dirs.push(new_parent);
            parent = new_parent.parent();
        }
        dirs.reverse();
        dirs[1..].to_vec()
    }

    /// Timestamp fast path used by the status engine.
    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }

    /// Cheap mismatch check that skips hashing: a changed mode or size
    /// can never be the same content.
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.mode == other.mode && self.metadata.size == other.size
    }

    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let entry_name = self
            .name
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid entry name"))?;
        let name_bytes = entry_name.as_bytes();

        let mut flags_word = min(name_bytes.len(), MAX_NAME_LENGTH) as u16;
        if self.flags.assume_valid {
            flags_word |= FLAG_ASSUME_VALID;
        }
        flags_word |= (u16::from(self.flags.stage) << 12) & FLAG_STAGE_MASK;

        let mut entry_bytes = Vec::new();
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(0)?; // reserved, reads back as zero
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.metadata.mode.as_mode_word())?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(flags_word)?;
        entry_bytes.write_all(name_bytes)?;

        // NUL terminator, then zero padding to the block size
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }

    pub fn deserialize(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(GitError::MalformedIndex("truncated entry".into()).into());
        }

        let ctime = byteorder::NetworkEndian::read_u32(&bytes[0..4]);
        let ctime_nsec = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let mtime = byteorder::NetworkEndian::read_u32(&bytes[8..12]);
        let mtime_nsec = byteorder::NetworkEndian::read_u32(&bytes[12..16]);
        let dev = byteorder::NetworkEndian::read_u32(&bytes[16..20]);
        let ino = byteorder::NetworkEndian::read_u32(&bytes[20..24]);

        let reserved = byteorder::NetworkEndian::read_u16(&bytes[24..26]);
        if reserved != 0 {
            return Err(GitError::MalformedIndex("non-zero reserved field".into()).into());
        }
        let mode = FileMode::from_mode_word(byteorder::NetworkEndian::read_u16(&bytes[26..28]))?;

        let uid = byteorder::NetworkEndian::read_u32(&bytes[28..32]);
        let gid = byteorder::NetworkEndian::read_u32(&bytes[32..36]);
        let size = byteorder::NetworkEndian::read_u32(&bytes[36..40]);
        let mut oid_bytes = &bytes[40..60];
        let oid = ObjectId::read_h40_from(&mut oid_bytes)?;

        let flags_word = byteorder::NetworkEndian::read_u16(&bytes[60..62]);
        if flags_word & FLAG_EXTENDED != 0 {
            return Err(GitError::MalformedIndex("extended flag is not supported".into()).into());
        }
        let flags = EntryFlags {
            assume_valid: flags_word & FLAG_ASSUME_VALID != 0,
            stage: ((flags_word & FLAG_STAGE_MASK) >> 12) as u8,
        };

        let name_length = (flags_word & MAX_NAME_LENGTH as u16) as usize;
        let name_bytes = if name_length < MAX_NAME_LENGTH {
            if bytes.get(62 + name_length) != Some(&0) {
                return Err(GitError::MalformedIndex("entry name is not NUL-terminated".into()).into());
            }
            &bytes[62..62 + name_length]
        } else {
            // 12-bit overflow escape: the real name runs to the next NUL
            let nul = bytes[62 + MAX_NAME_LENGTH..]
                .iter()
                .position(|&b| b == 0)
                .map(|p| 62 + MAX_NAME_LENGTH + p)
                .ok_or_else(|| GitError::MalformedIndex("unterminated long entry name".into()))?;
            &bytes[62..nul]
        };
        let name = PathBuf::from(
            std::str::from_utf8(name_bytes)
                .map_err(|_| GitError::MalformedIndex("entry name is not UTF-8".into()))?,
        );

        Ok(IndexEntry {
            name,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
            },
            flags,
        })
    }
}

impl TryFrom<(&Path, &Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    /// Cached stat data from a live file. Takes the worktree root and
    /// the relative path separately so executability is probed on the
    /// real location.
    fn try_from((root, file_path, metadata): (&Path, &Path, Metadata)) -> Result<Self, Self::Error> {
        let mode = if root.join(file_path).is_executable() {
            FileMode::executable()
        } else {
            FileMode::regular()
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}
