//! Trace file reading.

pub mod csv_reader;

pub use csv_reader::{count_records, CsvTraceReader, TraceError, TIMESTAMP_FORMAT};
