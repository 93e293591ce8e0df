//! Report output formats.

pub mod csv_writer;

pub use csv_writer::{CsvReportWriter, DEFAULT_OUTPUT_FILE, HEADER};
