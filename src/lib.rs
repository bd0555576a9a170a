//! dirtree - deterministic directory listings for golden-file tests
//!
//! Each visited node becomes one line made of fixed-width fields followed by
//! its slash separated path relative to the root:
//!
//! ```text
//! d            crc=n/a      .
//! d            crc=n/a      A
//! f 13b        crc=0451ac5e A/file1
//! ?            crc=n/a      A/symfile1
//! ```
//!
//! Two trees can then be compared by comparing their listings.

pub mod checksum;
pub mod entry;
pub mod error;
pub mod fs;
pub mod kind;
pub mod mode;
pub mod output;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use entry::Entry;
pub use error::{ConfigError, Error, Result};
pub use fs::{FileMode, FileSystem, MemFile, MemFs, OsFs};
pub use kind::{FileKind, FileKinds};
pub use mode::PrintMode;
pub use output::{LineWriter, print_json, sprint, sprint_fs, write, write_fs, write_json};
pub use tree::{Config, EntrySink, ListOption, Walker, list, list_fs};
