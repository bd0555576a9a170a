//! Walker - depth-first traversal producing entries in listing order

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::path::Path;

use crate::checksum::Checksummer;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::kind::FileKind;

use super::config::Config;

/// Receives entries in traversal order.
pub trait EntrySink {
    fn accept(&mut self, entry: Entry) -> Result<()>;

    /// Called once after the last entry of a successful walk.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl EntrySink for Vec<Entry> {
    fn accept(&mut self, entry: Entry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

/// Lists a tree of a [`FileSystem`] according to a [`Config`].
///
/// Nodes are visited depth-first, parents before children, siblings sorted
/// by name bytes. Symlinks are never followed. A walker owns the buffer used
/// for checksums and is meant for a single thread.
pub struct Walker<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    config: Config,
    checksummer: Checksummer,
    kept: usize,
}

impl<'a, F: FileSystem + ?Sized> Walker<'a, F> {
    pub fn new(fs: &'a F, config: Config) -> Self {
        Self {
            fs,
            config,
            checksummer: Checksummer::new(),
            kept: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Walk the tree rooted at `root`, handing every kept entry to `sink`.
    /// Returns the number of entries produced.
    ///
    /// Any error other than an unreadable file content aborts the walk.
    pub fn walk<S: EntrySink + ?Sized>(&mut self, root: &Path, sink: &mut S) -> Result<usize> {
        log::debug!("listing {}", root.display());
        self.kept = 0;

        let stat = self
            .fs
            .symlink_metadata(root)
            .map_err(|source| Error::Metadata {
                path: root.to_path_buf(),
                source,
            })?;

        self.visit(root, ".", FileKind::from_mode(stat.mode), 1, true, sink)?;
        sink.finish()?;

        log::debug!("listed {} entries under {}", self.kept, root.display());
        Ok(self.kept)
    }

    fn visit<S: EntrySink + ?Sized>(
        &mut self,
        path: &Path,
        rel_path: &str,
        kind: FileKind,
        depth: usize,
        is_root: bool,
        sink: &mut S,
    ) -> Result<()> {
        // Depth prunes whole subtrees, whatever the node kind
        if self.config.exceeds_depth(depth) {
            log::trace!("{rel_path}: beyond depth {}", self.config.max_depth);
            return Ok(());
        }

        if self.should_list(rel_path, kind, is_root) {
            let entry = Entry::build(
                self.fs,
                &mut self.checksummer,
                self.config.mode,
                path,
                rel_path.to_string(),
                kind,
            )?;
            sink.accept(entry)?;
            self.kept += 1;
        }

        if kind == FileKind::Directory && self.descends(depth, is_root) {
            let mut children = self.fs.read_dir(path).map_err(|source| Error::ReadDir {
                path: path.to_path_buf(),
                source,
            })?;
            children.sort_by(|a, b| a.name.cmp(&b.name));

            for child in children {
                let name = escape_name(&child.name);
                let (child_rel, child_depth) = if is_root {
                    (name.into_owned(), 1)
                } else {
                    (format!("{rel_path}/{name}"), depth + 1)
                };
                self.visit(
                    &child.path,
                    &child_rel,
                    FileKind::from_mode(child.mode),
                    child_depth,
                    false,
                    sink,
                )?;
            }
        }

        Ok(())
    }

    /// Kind, root and pattern filters. None of them prunes the subtree.
    fn should_list(&self, rel_path: &str, kind: FileKind, is_root: bool) -> bool {
        if !self.config.allows(kind) {
            log::trace!("{rel_path}: kind {kind} filtered out");
            return false;
        }
        if is_root && !self.config.show_root {
            return false;
        }
        if !self.config.filter.is_included(rel_path) {
            log::trace!("{rel_path}: excluded by patterns");
            return false;
        }
        true
    }

    /// The root's children sit at depth 1 like the root itself, so the root
    /// is always read. Other directories are read only if their children can
    /// still be within the limit.
    fn descends(&self, depth: usize, is_root: bool) -> bool {
        is_root || self.config.max_depth == 0 || depth < self.config.max_depth
    }
}

/// Path segment for `name`. Backslashes are doubled and bytes that aren't
/// valid UTF-8 are written as `\xNN`, so distinct names never render alike.
fn escape_name(name: &OsStr) -> Cow<'_, str> {
    let bytes = name.as_encoded_bytes();
    if !bytes.contains(&b'\\') {
        if let Some(name) = name.to_str() {
            return Cow::Borrowed(name);
        }
    }

    let mut out = String::with_capacity(bytes.len() + 8);
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            if c == '\\' {
                out.push_str("\\\\");
            } else {
                out.push(c);
            }
        }
        for b in chunk.invalid() {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
    Cow::Owned(out)
}
