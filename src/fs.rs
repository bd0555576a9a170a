//! Filesystem access used by the walker
//!
//! Listings are produced through the [`FileSystem`] trait so the same walk can
//! run against the real disk ([`OsFs`]) or an in-memory tree ([`MemFs`]).
//! Metadata is always taken without following symlinks.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use bitflags::bitflags;

bitflags! {
    /// Raw mode bits of a node: type bits plus the Unix permission bits.
    /// A mode without any type bit describes a regular file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileMode: u32 {
        const DIR         = 1 << 31;
        const SYMLINK     = 1 << 27;
        const DEVICE      = 1 << 26;
        const NAMED_PIPE  = 1 << 25;
        const SOCKET      = 1 << 24;
        const CHAR_DEVICE = 1 << 21;
        const IRREGULAR   = 1 << 19;

        const TYPE = Self::DIR.bits()
            | Self::SYMLINK.bits()
            | Self::DEVICE.bits()
            | Self::NAMED_PIPE.bits()
            | Self::SOCKET.bits()
            | Self::CHAR_DEVICE.bits()
            | Self::IRREGULAR.bits();

        const PERM = 0o777;
    }
}

impl FileMode {
    /// Regular file with the given permission bits.
    pub fn file(perm: u32) -> Self {
        Self::from_bits_retain(perm) & Self::PERM
    }

    /// Directory with the given permission bits.
    pub fn dir(perm: u32) -> Self {
        Self::DIR | Self::file(perm)
    }

    /// Symbolic link with the given permission bits.
    pub fn symlink(perm: u32) -> Self {
        Self::SYMLINK | Self::file(perm)
    }

    /// Only the type bits.
    pub fn file_type(self) -> Self {
        self & Self::TYPE
    }

    pub fn is_regular(self) -> bool {
        !self.intersects(Self::TYPE)
    }

    /// True only when the type bits are exactly [`FileMode::DIR`].
    pub fn is_dir(self) -> bool {
        self.file_type() == Self::DIR
    }

    pub fn is_symlink(self) -> bool {
        self.contains(Self::SYMLINK)
    }

    pub fn perm(self) -> u32 {
        (self & Self::PERM).bits()
    }

    /// Type bits of a std file type, as reported without following symlinks.
    pub fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            return Self::SYMLINK;
        }
        if ft.is_dir() {
            return Self::DIR;
        }
        if ft.is_file() {
            return Self::empty();
        }
        special_type(ft)
    }
}

impl From<&std::fs::Metadata> for FileMode {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self::from_file_type(meta.file_type()) | Self::file(permission_bits(meta))
    }
}

#[cfg(unix)]
fn special_type(ft: std::fs::FileType) -> FileMode {
    use std::os::unix::fs::FileTypeExt;

    if ft.is_char_device() {
        FileMode::DEVICE | FileMode::CHAR_DEVICE
    } else if ft.is_block_device() {
        FileMode::DEVICE
    } else if ft.is_fifo() {
        FileMode::NAMED_PIPE
    } else if ft.is_socket() {
        FileMode::SOCKET
    } else {
        FileMode::IRREGULAR
    }
}

#[cfg(not(unix))]
fn special_type(_ft: std::fs::FileType) -> FileMode {
    FileMode::IRREGULAR
}

#[cfg(unix)]
fn permission_bits(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn permission_bits(meta: &std::fs::Metadata) -> u32 {
    // Synthesize a mode for platforms without Unix permissions
    match (meta.is_dir(), meta.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

/// Metadata of a single node, read without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub mode: FileMode,
    pub len: u64,
}

/// A child listed by [`FileSystem::read_dir`]. `mode` carries type bits only.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: OsString,
    pub path: PathBuf,
    pub mode: FileMode,
}

/// Minimal filesystem capability needed to list a tree.
pub trait FileSystem {
    /// Metadata of `path`, not following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat>;

    /// Children of the directory at `path`, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Open the file at `path` for reading its content.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        (**self).symlink_metadata(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(FileStat {
            mode: FileMode::from(&meta),
            len: meta.len(),
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        std::fs::read_dir(path)?
            .map(|entry| {
                let entry = entry?;
                Ok(DirEntry {
                    name: entry.file_name(),
                    path: entry.path(),
                    mode: FileMode::from_file_type(entry.file_type()?),
                })
            })
            .collect()
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(path)?))
    }
}

/// A node stored in a [`MemFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemFile {
    pub data: Vec<u8>,
    pub mode: FileMode,
}

impl MemFile {
    pub fn file(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            mode: FileMode::file(0o644),
        }
    }

    pub fn dir() -> Self {
        Self {
            data: Vec::new(),
            mode: FileMode::dir(0o755),
        }
    }

    /// Symlink whose content is the link target.
    pub fn symlink(target: &str) -> Self {
        Self {
            data: target.as_bytes().to_vec(),
            mode: FileMode::symlink(0o777),
        }
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Mode given to directories that only exist because they have children.
const IMPLICIT_DIR_MODE: u32 = 0o555;

/// In-memory filesystem keyed by slash-separated paths relative to `.`.
///
/// Parent directories don't need to be inserted: any path prefix of a stored
/// node is reported as a directory.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: BTreeMap<String, MemFile>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `file` at `path`, replacing any previous node there.
    pub fn insert(&mut self, path: &str, file: MemFile) {
        self.files.insert(path.trim_matches('/').to_string(), file);
    }

    pub fn with(mut self, path: &str, file: MemFile) -> Self {
        self.insert(path, file);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<MemFile> {
        self.files.remove(path.trim_matches('/'))
    }

    fn key(path: &Path) -> io::Result<String> {
        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("non UTF-8 path {}", path.display()),
                    )
                })?),
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path {} must be relative to the filesystem root", path.display()),
                    ));
                }
            }
        }
        Ok(parts.join("/"))
    }

    fn has_children(&self, prefix: &str) -> bool {
        self.files
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }

    fn stat_key(&self, key: &str) -> Option<FileStat> {
        if let Some(file) = self.files.get(key) {
            return Some(FileStat {
                mode: file.mode,
                len: file.data.len() as u64,
            });
        }
        if key.is_empty() || self.has_children(&format!("{key}/")) {
            return Some(FileStat {
                mode: FileMode::dir(IMPLICIT_DIR_MODE),
                len: 0,
            });
        }
        None
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

impl FileSystem for MemFs {
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileStat> {
        let key = Self::key(path)?;
        self.stat_key(&key).ok_or_else(|| not_found(path))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let key = Self::key(path)?;
        let stat = self.stat_key(&key).ok_or_else(|| not_found(path))?;
        if !stat.mode.is_dir() {
            return Err(io::Error::other(format!(
                "{}: not a directory",
                path.display()
            )));
        }

        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        };

        let mut children: BTreeMap<&str, FileMode> = BTreeMap::new();
        for (k, _) in self
            .files
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
        {
            let rest = &k[prefix.len()..];
            let name = rest.split('/').next().unwrap_or(rest);
            if name.is_empty() || children.contains_key(name) {
                continue;
            }
            let mode = self
                .files
                .get(&format!("{prefix}{name}"))
                .map(|f| f.mode)
                .unwrap_or_else(|| FileMode::dir(IMPLICIT_DIR_MODE));
            children.insert(name, mode);
        }

        Ok(children
            .into_iter()
            .map(|(name, mode)| DirEntry {
                name: OsString::from(name),
                path: path.join(name),
                mode: mode.file_type(),
            })
            .collect())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let key = Self::key(path)?;
        match self.files.get(&key) {
            Some(file) if !file.mode.is_dir() => Ok(Box::new(file.data.as_slice())),
            Some(_) => Err(io::Error::other(format!(
                "{}: is a directory",
                path.display()
            ))),
            None => Err(not_found(path)),
        }
    }
}
