//! Spreadsheet-friendly CSV documents.
//!
//! Every field is double-quoted and embedded quotes are doubled. That is the
//! only escaping: a newline inside a field stays inside its quotes. Bodies
//! start with a UTF-8 byte-order mark so spreadsheet tools pick the right
//! encoding, and records may have any number of fields so a document can mix
//! preamble lines, section labels and tables.

use chrono::{DateTime, Utc};

use crate::error::{ExportError, Result};

/// Byte-order mark prefixed to every CSV body.
pub const BOM: char = '\u{feff}';

/// A CSV body built record by record.
pub struct CsvDocument {
    writer: csv::Writer<Vec<u8>>,
}

impl Default for CsvDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvDocument {
    /// Start a document with the byte-order mark.
    pub fn new() -> Self {
        let mut buf = Vec::new();
        let mut bom = [0u8; 4];
        buf.extend_from_slice(BOM.encode_utf8(&mut bom).as_bytes());

        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(buf);
        Self { writer }
    }

    /// Append one record.
    pub fn record<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        Ok(())
    }

    /// Append an empty line between sections.
    pub fn blank(&mut self) -> Result<()> {
        // Pending records must reach the buffer before the raw newline.
        self.writer.flush()?;
        self.writer.get_mut().push(b'\n');
        Ok(())
    }

    /// Finish the document.
    pub fn finish(self) -> Result<String> {
        let buf = self
            .writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.error().kind().into()))?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Shortest round-trip form of an amount: `100`, `99.5`, `0.1`.
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// ISO-8601 with millisecond precision in UTC, e.g. `2024-03-01T10:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
