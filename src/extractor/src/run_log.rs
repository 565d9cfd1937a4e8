//! Human-readable per-run log of file outcomes.

use crate::error::{ExtractError, Result};
use crate::filter::FileOutcome;
use crate::selector::InputFile;
use chrono::{DateTime, Local};
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the log file for a run started at `started_at`.
pub fn log_file_name(started_at: &DateTime<Local>) -> String {
    format!("log_{}.txt", started_at.format("%Y%m%d_%H%M%S"))
}

/// Append-only log with one line per file event, open for the whole run.
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RunLog {
    /// Create the log directory if needed and open this run's log file.
    pub fn create(log_dir: &Path, started_at: &DateTime<Local>) -> Result<Self> {
        let path = log_dir.join(log_file_name(started_at));
        let error = |source| ExtractError::RunLog {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(log_dir).map_err(error)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(error)?;

        tracing::debug!(path = %path.display(), "Opened run log");

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the line describing `outcome` for `file`.
    pub fn record(&mut self, file: &InputFile, outcome: &FileOutcome) -> Result<()> {
        let input = file.path.display();
        match outcome {
            FileOutcome::Skipped { size } => {
                self.write_line(format_args!("Skipping file {input}: size {size} bytes"))
            }
            FileOutcome::NoMatch { output } => self.write_line(format_args!(
                "No matches found for file {input}. Deleted output file {}.",
                output.display()
            )),
            FileOutcome::Processed { output, .. } => self.write_line(format_args!(
                "Processed file {input}. Output written to {}.",
                output.display()
            )),
        }
    }

    /// Write the line for a file whose processing failed.
    pub fn record_failure(&mut self, file: &InputFile, error: &ExtractError) -> Result<()> {
        self.write_line(format_args!(
            "Failed to process file {}: {error}",
            file.path.display()
        ))
    }

    /// Flush and close the log.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush().map_err(|source| ExtractError::RunLog {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }

    fn write_line(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|source| ExtractError::RunLog {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn started_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap()
    }

    fn input(name: &str) -> InputFile {
        InputFile {
            path: PathBuf::from("/in").join(name),
            name: name.to_string(),
            size: 4096,
        }
    }

    #[test]
    fn test_log_file_name_embeds_timestamp() {
        assert_eq!(log_file_name(&started_at()), "log_20240307_090501.txt");
    }

    #[test]
    fn test_records_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let mut log = RunLog::create(&log_dir, &started_at()).unwrap();

        log.record(&input("a_gprsCall.gz"), &FileOutcome::Skipped { size: 20 })
            .unwrap();
        log.record(
            &input("b_gprsCall.gz"),
            &FileOutcome::NoMatch {
                output: PathBuf::from("/out/b_gprsCall.txt"),
            },
        )
        .unwrap();
        log.record(
            &input("c_gprsCall.gz"),
            &FileOutcome::Processed {
                output: PathBuf::from("/out/c_gprsCall.txt"),
                matched_rows: 3,
            },
        )
        .unwrap();
        let path = log.finish().unwrap();

        assert_eq!(path, log_dir.join("log_20240307_090501.txt"));
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "Skipping file /in/a_gprsCall.gz: size 20 bytes\n\
             No matches found for file /in/b_gprsCall.gz. Deleted output file /out/b_gprsCall.txt.\n\
             Processed file /in/c_gprsCall.gz. Output written to /out/c_gprsCall.txt.\n"
        );
    }

    #[test]
    fn test_existing_log_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(log_file_name(&started_at()));
        fs::write(&path, "earlier\n").unwrap();

        let mut log = RunLog::create(dir.path(), &started_at()).unwrap();
        log.record(&input("a_gprsCall.gz"), &FileOutcome::Skipped { size: 1 })
            .unwrap();
        log.finish().unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("earlier\n"));
        assert!(content.ends_with("size 1 bytes\n"));
    }
}
