//! Replay observers: statistics files and progress logging.

pub mod batch_csv;
pub mod progress;
pub mod stats_csv;

pub use batch_csv::BatchCsvWriter;
pub use progress::ProgressLogger;
pub use stats_csv::StatsCsvWriter;
