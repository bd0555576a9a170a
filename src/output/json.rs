//! JSON output formatting

use std::io::{self, Write};

use crate::entry::Entry;
use crate::error::{Error, Result};

/// Write entries as a pretty-printed JSON array followed by a newline.
pub fn write_json<W: Write>(mut w: W, entries: &[Entry]) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, entries)?;
    writeln!(w).map_err(Error::Output)?;
    w.flush().map_err(Error::Output)
}

/// Print entries as pretty-printed JSON to stdout.
pub fn print_json(entries: &[Entry]) -> Result<()> {
    write_json(io::stdout().lock(), entries)
}
