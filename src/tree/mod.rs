//! Directory tree walking logic
//!
//! Options are resolved into a [`Config`] first, so invalid options fail
//! before the filesystem is touched. The [`Walker`] then visits the tree and
//! hands kept entries to an [`EntrySink`]: a `Vec<Entry>` for [`list`], or a
//! line writer from the output module.

mod config;
mod filter;
mod walker;

use std::path::Path;

use crate::entry::Entry;
use crate::error::Result;
use crate::fs::{FileSystem, OsFs};

pub use config::{Config, ListOption};
pub use filter::{PathFilter, PathPattern, Role};
pub use walker::{EntrySink, Walker};

/// List the tree rooted at `root` on the real filesystem.
pub fn list(root: impl AsRef<Path>, opts: &[ListOption]) -> Result<Vec<Entry>> {
    list_fs(&OsFs, root, opts)
}

/// List the tree rooted at `root` inside `fs`.
pub fn list_fs<F: FileSystem + ?Sized>(
    fs: &F,
    root: impl AsRef<Path>,
    opts: &[ListOption],
) -> Result<Vec<Entry>> {
    let config = Config::resolve(opts)?;
    let mut entries = Vec::with_capacity(128);
    Walker::new(fs, config).walk(root.as_ref(), &mut entries)?;
    Ok(entries)
}
