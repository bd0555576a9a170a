//! Listing output
//!
//! - `streaming` - line writer sink, one line per entry
//! - `json` - JSON array of entries

mod json;
mod streaming;

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::fs::{FileSystem, OsFs};
use crate::tree::{Config, ListOption, Walker};

pub use json::{print_json, write_json};
pub use streaming::LineWriter;

/// Walk the tree rooted at `root` and write one line per entry into `w`.
pub fn write<W: Write>(w: W, root: impl AsRef<Path>, opts: &[ListOption]) -> Result<()> {
    write_fs(w, &OsFs, root, opts)
}

/// Walk the tree rooted at `root` inside `fs` and write one line per entry
/// into `w`. Lines are streamed as the walk goes; on error, what was already
/// produced may have been written.
pub fn write_fs<W: Write, F: FileSystem + ?Sized>(
    w: W,
    fs: &F,
    root: impl AsRef<Path>,
    opts: &[ListOption],
) -> Result<()> {
    let config = Config::resolve(opts)?;
    let mut sink = LineWriter::new(w);
    Walker::new(fs, config).walk(root.as_ref(), &mut sink)?;
    Ok(())
}

/// Listing of `root` as a single string. Wrapper around [`write`].
pub fn sprint(root: impl AsRef<Path>, opts: &[ListOption]) -> Result<String> {
    sprint_fs(&OsFs, root, opts)
}

/// Listing of `root` inside `fs` as a single string. Wrapper around
/// [`write_fs`].
pub fn sprint_fs<F: FileSystem + ?Sized>(
    fs: &F,
    root: impl AsRef<Path>,
    opts: &[ListOption],
) -> Result<String> {
    let mut buf = Vec::new();
    write_fs(&mut buf, fs, root, opts)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
