//! CRC-32 content checksums

use std::io::{self, Read};
use std::path::Path;

use crate::fs::FileSystem;
use crate::kind::FileKind;

/// Placeholder rendered for values that can't or shouldn't be computed.
pub const NOT_APPLICABLE: &str = "n/a";

/// Number of hex chars in a rendered CRC-32.
pub const CRC_CHARS: usize = 8;

const BUF_SIZE: usize = 32 * 1024;

/// Streams file content through a CRC-32 (IEEE) hasher.
///
/// The read buffer is owned by the instance and reused across calls, so a
/// `Checksummer` must not be shared by concurrent walks; give each its own.
pub struct Checksummer {
    buf: Box<[u8]>,
}

impl Checksummer {
    pub fn new() -> Self {
        Self {
            buf: vec![0; BUF_SIZE].into_boxed_slice(),
        }
    }

    /// Checksum of the regular file at `path`.
    ///
    /// Returns `None` for other kinds and whenever the file can't be opened
    /// or read, e.g. because it vanished after being listed.
    pub fn checksum<F: FileSystem + ?Sized>(
        &mut self,
        fs: &F,
        kind: FileKind,
        path: &Path,
    ) -> Option<u32> {
        if kind != FileKind::RegularFile {
            return None;
        }
        match self.crc32(fs, path) {
            Ok(crc) => Some(crc),
            Err(e) => {
                log::debug!("checksum of {} unavailable: {}", path.display(), e);
                None
            }
        }
    }

    fn crc32<F: FileSystem + ?Sized>(&mut self, fs: &F, path: &Path) -> io::Result<u32> {
        let mut reader = fs.open(path)?;
        let mut hasher = crc32fast::Hasher::new();
        loop {
            let n = match reader.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&self.buf[..n]);
        }
        Ok(hasher.finalize())
    }
}

impl Default for Checksummer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a checksum as 8 lowercase hex digits, or the padded sentinel.
pub fn format_checksum(crc: Option<u32>) -> String {
    match crc {
        Some(crc) => format!("{:0width$x}", crc, width = CRC_CHARS),
        None => format!("{:<width$}", NOT_APPLICABLE, width = CRC_CHARS),
    }
}
