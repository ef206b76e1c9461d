//! JSON Lines output for node and edge tuples

use hmdb_common::Result;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Writes one JSON object per line
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    batch_size: usize,
    written: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    /// `batch_size` controls how often progress is logged
    pub fn new(writer: W, batch_size: usize) -> Self {
        Self {
            writer,
            batch_size: batch_size.max(1),
            written: 0,
        }
    }

    pub fn write<T: Serialize>(&mut self, item: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, item)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;

        if self.written % self.batch_size == 0 {
            info!(written = self.written, "Progress");
        }

        Ok(())
    }

    /// Flush the underlying writer and return the number of lines written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
