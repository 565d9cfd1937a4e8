//! TAP-IN call-record extraction.
//!
//! Scans a directory of gzip-compressed call-record files, keeps the records
//! whose MSISDN appears in a reference list and writes them to plain-text
//! files, logging one line per file to a per-run log.

pub mod error;
pub mod filter;
mod lines;
pub mod reference;
pub mod run_log;
pub mod runner;
pub mod selector;

// Re-export commonly used types
pub use error::{ExtractError, Result};
pub use filter::{
    FileOutcome, FilterStats, MIN_FILE_SIZE, RecordFilter, filter_records, output_file_name,
};
pub use reference::ReferenceSet;
pub use run_log::{RunLog, log_file_name};
pub use runner::{Extractor, RunSummary};
pub use selector::{INPUT_PATTERNS, InputFile, select_input_files};
