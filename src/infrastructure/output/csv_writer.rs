//! CSV output for report rows.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::domain::entities::ReportRow;

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "clicks.csv";

/// Column headers, in output order.
pub const HEADER: [&str; 5] = ["Campaign", "URL", "URL Clicks", "Recipients", "Ratio"];

/// Writes report rows as comma-separated values.
///
/// Fields containing a comma, quote or line break are quoted, with inner
/// quotes doubled. A missing recipient count or ratio is written as an empty
/// cell. Lines end with `\r\n`.
///
/// Rows can be appended one campaign at a time with [`write_rows`], each call
/// flushing the underlying writer.
///
/// [`write_rows`]: CsvReportWriter::write_rows
pub struct CsvReportWriter<W: Write> {
    inner: W,
}

impl CsvReportWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> CsvReportWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes the header line and flushes.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_record(&HEADER.map(Cow::Borrowed))?;
        self.inner.flush()
    }

    /// Appends one line per row and flushes.
    pub fn write_rows(&mut self, rows: &[ReportRow]) -> io::Result<()> {
        for row in rows {
            let record = [
                escape_field(&row.campaign_title),
                escape_field(&row.link_key),
                Cow::Owned(row.clicks.to_string()),
                Cow::Owned(row.recipient_count.map(|c| c.to_string()).unwrap_or_default()),
                Cow::Owned(row.ratio.map(|r| r.to_string()).unwrap_or_default()),
            ];
            self.write_record(&record)?;
        }

        self.inner.flush()
    }

    /// Writes the header followed by every row and returns the underlying
    /// writer.
    pub fn write_report(mut self, rows: &[ReportRow]) -> io::Result<W> {
        self.write_header()?;
        self.write_rows(rows)?;
        Ok(self.inner)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn write_record(&mut self, fields: &[Cow<'_, str>]) -> io::Result<()> {
        let line = fields.join(",");
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\r\n")
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
