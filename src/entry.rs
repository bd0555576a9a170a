//! Listed entries and their fixed-width rendering

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::checksum::{Checksummer, NOT_APPLICABLE, format_checksum};
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::kind::FileKind;
use crate::mode::PrintMode;

// Sizes are padded to SIZE_DIGITS digits plus the 'b' suffix so that most
// fields line up. Bigger sizes are printed whole rather than truncated.
const SIZE_DIGITS: usize = 9;
const SIZE_WIDTH: usize = SIZE_DIGITS + 1;

/// One visited node, holding the attributes its print mode asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(skip)]
    path: PathBuf,
    #[serde(rename = "path")]
    rel_path: String,
    kind: FileKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_checksum"
    )]
    // Outer: requested by the mode. Inner: could be computed.
    checksum: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symlink: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    perm: Option<u32>,
    #[serde(skip)]
    mode: PrintMode,
}

impl Entry {
    /// Gather the attributes requested by `mode` for the node at `path`.
    ///
    /// Metadata is read at most once and only when a field needs it; failing
    /// to read it is an error. A checksum that can't be computed is not.
    pub fn build<F: FileSystem + ?Sized>(
        fs: &F,
        checksummer: &mut Checksummer,
        mode: PrintMode,
        path: &Path,
        rel_path: String,
        kind: FileKind,
    ) -> Result<Self> {
        let stat = if mode.needs_stat(kind) {
            Some(
                fs.symlink_metadata(path)
                    .map_err(|source| Error::Metadata {
                        path: path.to_path_buf(),
                        source,
                    })?,
            )
        } else {
            None
        };

        let size = stat
            .filter(|_| mode.contains(PrintMode::SIZE) && kind == FileKind::RegularFile)
            .map(|s| s.len);
        let symlink = stat
            .filter(|_| mode.contains(PrintMode::SYMLINK))
            .map(|s| s.mode.is_symlink());
        let perm = stat
            .filter(|_| mode.contains(PrintMode::PERM))
            .map(|s| s.mode.perm());
        let checksum = mode
            .contains(PrintMode::CHECKSUM)
            .then(|| checksummer.checksum(fs, kind, path));

        Ok(Self {
            path: path.to_path_buf(),
            rel_path,
            kind,
            size,
            checksum,
            symlink,
            perm,
            mode,
        })
    }

    /// Path as handed to the filesystem.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Slash separated path relative to the listing root, `.` for the root.
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Size in bytes; 0 unless this is a regular file listed with `SIZE`.
    pub fn size(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    /// Rendered checksum, or the `n/a` sentinel.
    pub fn checksum(&self) -> String {
        format_checksum(self.checksum.flatten())
    }

    pub fn is_symlink(&self) -> bool {
        self.symlink.unwrap_or(false)
    }

    pub fn perm(&self) -> Option<u32> {
        self.perm
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// Render the selected fields, each followed by a single space, so the
    /// relative path can be appended as is.
    pub fn format(&self) -> String {
        let mut out = String::with_capacity(48);
        if self.mode.contains(PrintMode::KIND) {
            out.push(self.kind.marker());
            out.push(' ');
        }
        if self.mode.contains(PrintMode::SIZE) {
            out.push_str(&format_size(self.size));
            out.push(' ');
        }
        if self.mode.contains(PrintMode::CHECKSUM) {
            out.push_str("crc=");
            out.push_str(&format_checksum(self.checksum.flatten()));
            out.push(' ');
        }
        if self.mode.contains(PrintMode::SYMLINK) {
            out.push_str(if self.is_symlink() { "sym=1 " } else { "sym=0 " });
        }
        if self.mode.contains(PrintMode::PERM) {
            let _ = write!(out, "perm={:03o} ", self.perm.unwrap_or(0));
        }
        out
    }
}

/// A full listing line without its terminator.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.format(), self.rel_path)
    }
}

fn format_size(size: Option<u64>) -> String {
    match size {
        Some(size) => format!("{:<width$}", format!("{size}b"), width = SIZE_WIDTH),
        None => " ".repeat(SIZE_WIDTH),
    }
}

/// Hex digits, or a bare `n/a` when the checksum was requested but unavailable.
fn serialize_checksum<S: Serializer>(
    crc: &Option<Option<u32>>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match crc.flatten() {
        Some(crc) => s.serialize_str(&format_checksum(Some(crc))),
        None => s.serialize_str(NOT_APPLICABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileMode, MemFile, MemFs, OsFs};
    use std::fs;
    use tempfile::TempDir;

    fn memfs() -> MemFs {
        MemFs::new()
            .with("A", MemFile::dir().with_mode(FileMode::dir(0o744)))
            .with(
                "A/file1",
                MemFile::file("dummy content").with_mode(FileMode::file(0o744)),
            )
            .with("A/symfile1", MemFile::symlink("file1"))
    }

    fn build(mode: PrintMode, path: &str, kind: FileKind) -> Result<Entry> {
        Entry::build(
            &memfs(),
            &mut Checksummer::new(),
            mode,
            Path::new(path),
            path.to_string(),
            kind,
        )
    }

    fn line(mode: PrintMode, path: &str, kind: FileKind) -> String {
        build(mode, path, kind).unwrap().to_string()
    }

    #[test]
    fn test_format_kind_only() {
        assert_eq!(line(PrintMode::KIND, "A/file1", FileKind::RegularFile), "f A/file1");
        assert_eq!(line(PrintMode::KIND, "A", FileKind::Directory), "d A");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(
            line(PrintMode::SIZE, "A/file1", FileKind::RegularFile),
            "13b        A/file1"
        );
        assert_eq!(
            line(PrintMode::DEFAULT, "A/file1", FileKind::RegularFile),
            "f 13b        A/file1"
        );
        assert_eq!(
            line(PrintMode::DEFAULT, "A", FileKind::Directory),
            "d            A"
        );
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(
            line(PrintMode::CHECKSUM, "A/file1", FileKind::RegularFile),
            "crc=0451ac5e A/file1"
        );
        assert_eq!(
            line(PrintMode::CHECKSUM, "A", FileKind::Directory),
            "crc=n/a      A"
        );
        assert_eq!(
            line(PrintMode::CHECKSUM, "A/symfile1", FileKind::Other),
            "crc=n/a      A/symfile1"
        );
    }

    #[test]
    fn test_format_all() {
        assert_eq!(
            line(PrintMode::ALL, "A/file1", FileKind::RegularFile),
            "f 13b        crc=0451ac5e sym=0 perm=744 A/file1"
        );
        assert_eq!(
            line(PrintMode::ALL, "A/symfile1", FileKind::Other),
            "?            crc=n/a      sym=1 perm=777 A/symfile1"
        );
    }

    #[test]
    fn test_format_empty_mode() {
        let entry = build(PrintMode::empty(), "A/file1", FileKind::RegularFile).unwrap();
        assert_eq!(entry.format(), "");
        assert_eq!(entry.to_string(), "A/file1");
    }

    #[test]
    fn test_non_regular_size_and_checksum_sentinels() {
        let entry = build(PrintMode::ALL, "A/symfile1", FileKind::Other).unwrap();
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.checksum(), "n/a     ");
        assert!(entry.is_symlink());
    }

    #[test]
    fn test_unrequested_fields_not_gathered() {
        let entry = build(PrintMode::KIND, "A/file1", FileKind::RegularFile).unwrap();
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.perm(), None);
        assert_eq!(entry.checksum(), "n/a     ");
    }

    #[test]
    fn test_size_wider_than_column_not_truncated() {
        assert_eq!(format_size(Some(1234567890123)), "1234567890123b");
        assert_eq!(format_size(Some(123456789)), "123456789b");
        assert_eq!(format_size(Some(0)), "0b        ");
        assert_eq!(format_size(None).len(), SIZE_WIDTH);
    }

    #[test]
    fn test_stat_failure_is_an_error() {
        let err = build(PrintMode::DEFAULT, "A/missing", FileKind::RegularFile).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
        assert!(err.to_string().contains("A/missing"));
    }

    #[test]
    fn test_missing_file_without_stat_fields_degrades() {
        // Only the checksum is requested: no stat, and the read failure is tolerated
        let entry = build(PrintMode::KIND | PrintMode::CHECKSUM, "A/gone", FileKind::RegularFile).unwrap();
        assert_eq!(entry.to_string(), "f crc=n/a      A/gone");
    }

    #[test]
    fn test_format_does_not_requery_filesystem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file");
        fs::write(&path, "abc").unwrap();

        let entry = Entry::build(
            &OsFs,
            &mut Checksummer::new(),
            PrintMode::ALL,
            &path,
            "file".to_string(),
            FileKind::RegularFile,
        )
        .unwrap();
        let before = entry.format();
        fs::remove_file(&path).unwrap();
        assert_eq!(entry.format(), before);
    }

    #[test]
    fn test_json_fields() {
        let entry = build(
            PrintMode::KIND | PrintMode::SIZE | PrintMode::CHECKSUM,
            "A/file1",
            FileKind::RegularFile,
        )
        .unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["path"], "A/file1");
        assert_eq!(json["kind"], "file");
        assert_eq!(json["size"], 13);
        assert_eq!(json["checksum"], "0451ac5e");
        assert!(json.get("perm").is_none());
        assert!(json.get("mode").is_none());
    }

    #[test]
    fn test_json_requested_checksum_always_present() {
        let dir = build(PrintMode::CHECKSUM, "A", FileKind::Directory).unwrap();
        let json = serde_json::to_value(&dir).unwrap();
        assert_eq!(json["checksum"], "n/a");

        let gone = build(PrintMode::CHECKSUM, "A/gone", FileKind::RegularFile).unwrap();
        let json = serde_json::to_value(&gone).unwrap();
        assert_eq!(json["checksum"], "n/a");

        let unrequested = build(PrintMode::KIND, "A/file1", FileKind::RegularFile).unwrap();
        let json = serde_json::to_value(&unrequested).unwrap();
        assert!(json.get("checksum").is_none());
    }
}
