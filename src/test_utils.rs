//! Test utilities for creating temporary directory trees.
//!
//! This module is only compiled with the `test-utils` feature, for tests and
//! benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// Paths given to its methods are relative to the tree root and may use `/`.
/// The directory is removed when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Create the reference tree used across the test suite:
    ///
    /// ```text
    /// .
    /// └── A
    ///     ├── B
    ///     │   └── symdirA -> A
    ///     ├── file1           "dummy content"
    ///     └── symfile1 -> A/file1
    /// ```
    ///
    /// The root, `A`, `A/B` and `A/file1` get mode 0744.
    #[cfg(unix)]
    pub fn sample() -> Self {
        let tree = Self::new();
        tree.set_mode(".", 0o744);
        let dir_a = tree.add_dir("A");
        tree.set_mode("A", 0o744);
        tree.add_dir("A/B");
        tree.set_mode("A/B", 0o744);
        let file1 = tree.add_file("A/file1", "dummy content");
        tree.set_mode("A/file1", 0o744);
        tree.add_symlink(&file1, "A/symfile1");
        tree.add_symlink(&dir_a, "A/B/symdirA");
        tree
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn join(&self, rel: &str) -> PathBuf {
        if rel == "." {
            return self.dir.path().to_path_buf();
        }
        self.dir.path().join(rel)
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, rel: &str, content: &str) -> PathBuf {
        let full_path = self.join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a directory and its missing parents.
    pub fn add_dir(&self, rel: &str) -> PathBuf {
        let full_path = self.join(rel);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a symlink at `rel` pointing to `target`.
    #[cfg(unix)]
    pub fn add_symlink(&self, target: impl AsRef<Path>, rel: &str) -> PathBuf {
        let full_path = self.join(rel);
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Set the Unix permission bits of `rel`.
    #[cfg(unix)]
    pub fn set_mode(&self, rel: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(self.join(rel), fs::Permissions::from_mode(mode))
            .expect("Failed to set permissions");
    }

    /// Remove the file at `rel`.
    pub fn remove_file(&self, rel: &str) {
        fs::remove_file(self.join(rel)).expect("Failed to remove file");
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
