//! Streaming line output
//!
//! `LineWriter` writes each entry as soon as the walker produces it, so a
//! listing never has to be held in memory.

use std::io::{BufWriter, Write};

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::tree::EntrySink;

/// Writes one `<fields><relative path>\n` line per entry into a buffered
/// writer, flushed when the walk finishes.
pub struct LineWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }
}

impl<W: Write> EntrySink for LineWriter<W> {
    fn accept(&mut self, entry: Entry) -> Result<()> {
        writeln!(self.out, "{entry}").map_err(Error::Output)
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().map_err(Error::Output)
    }
}
