//! File kind classification

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

use crate::error::ConfigError;
use crate::fs::FileMode;

/// Three-way classification of a listed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[serde(rename = "file")]
    RegularFile,
    #[serde(rename = "dir")]
    Directory,
    /// Symlinks, devices, sockets, pipes and anything irregular.
    Other,
}

impl FileKind {
    /// Classify unresolved metadata. A symlink to a directory is `Other`, which
    /// is what keeps the walker out of symlink cycles.
    pub fn from_mode(mode: FileMode) -> Self {
        if mode.is_regular() {
            FileKind::RegularFile
        } else if mode.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        }
    }

    pub fn marker(self) -> char {
        match self {
            FileKind::RegularFile => 'f',
            FileKind::Directory => 'd',
            FileKind::Other => '?',
        }
    }

    fn from_marker(c: char) -> Option<Self> {
        match c {
            'f' => Some(FileKind::RegularFile),
            'd' => Some(FileKind::Directory),
            '?' => Some(FileKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

bitflags! {
    /// Set of kinds allowed in a listing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileKinds: u8 {
        const FILE  = 1 << 0;
        const DIR   = 1 << 1;
        const OTHER = 1 << 2;
    }
}

impl FileKinds {
    /// Parse a type filter such as `"fd"` or `"?"`.
    pub fn parse(types: &str) -> Result<Self, ConfigError> {
        if types.is_empty() {
            return Err(ConfigError::EmptyType);
        }
        types.chars().try_fold(FileKinds::empty(), |kinds, c| {
            FileKind::from_marker(c)
                .map(|kind| kinds | kind.into())
                .ok_or(ConfigError::InvalidType(c))
        })
    }

    pub fn allows(self, kind: FileKind) -> bool {
        self.contains(kind.into())
    }
}

impl From<FileKind> for FileKinds {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::RegularFile => FileKinds::FILE,
            FileKind::Directory => FileKinds::DIR,
            FileKind::Other => FileKinds::OTHER,
        }
    }
}
