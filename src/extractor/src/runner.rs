//! One extraction run over the configured input directory.

use crate::error::{ExtractError, Result};
use crate::filter::{FileOutcome, RecordFilter};
use crate::reference::ReferenceSet;
use crate::run_log::RunLog;
use crate::selector::{INPUT_PATTERNS, select_input_files};
use chrono::{DateTime, Local};
use common::config::Configuration;
use std::fs;
use std::path::PathBuf;

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries produced by file selection, duplicates included
    pub files_seen: usize,
    pub skipped: usize,
    pub no_match: usize,
    pub processed: usize,
    /// Files that failed while failure isolation was enabled
    pub failed: usize,
    pub rows_matched: u64,
    pub log_path: PathBuf,
}

impl RunSummary {
    fn count(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::NoMatch { .. } => self.no_match += 1,
            FileOutcome::Processed { matched_rows, .. } => {
                self.processed += 1;
                self.rows_matched += matched_rows;
            }
        }
    }
}

/// Sequential filter run: load references, select inputs, filter each file
/// in turn and log its outcome.
pub struct Extractor {
    config: Configuration,
}

impl Extractor {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunSummary> {
        self.run_at(Local::now())
    }

    /// Run with `started_at` as the timestamp in the run log's name.
    pub fn run_at(&self, started_at: DateTime<Local>) -> Result<RunSummary> {
        let paths = &self.config.paths;

        let msisdns = ReferenceSet::load(&paths.reference_file)?;
        tracing::info!(
            reference_file = %paths.reference_file.display(),
            msisdns = msisdns.len(),
            "Loaded reference MSISDNs"
        );

        let mut run_log = RunLog::create(&paths.log_directory, &started_at)?;
        tracing::info!(path = %run_log.path().display(), "Writing run log");

        fs::create_dir_all(&paths.output_directory).map_err(|source| ExtractError::Write {
            path: paths.output_directory.clone(),
            source,
        })?;

        let files = select_input_files(&paths.input_directory, &INPUT_PATTERNS)?;
        tracing::info!(
            input_directory = %paths.input_directory.display(),
            files = files.len(),
            "Selected input files"
        );

        let filter = RecordFilter::new(&msisdns, &paths.output_directory);
        let mut summary = RunSummary {
            files_seen: files.len(),
            ..Default::default()
        };

        for file in &files {
            match filter.process(file) {
                Ok(outcome) => {
                    run_log.record(file, &outcome)?;
                    if let FileOutcome::Processed {
                        output,
                        matched_rows,
                    } = &outcome
                    {
                        tracing::info!(
                            path = %file.path.display(),
                            output = %output.display(),
                            matched_rows,
                            "Processed file"
                        );
                    }
                    summary.count(&outcome);
                }
                Err(e) if self.config.filter.isolate_failures => {
                    tracing::error!(path = %file.path.display(), error = %e, "Failed to process file");
                    run_log.record_failure(file, &e)?;
                    summary.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        summary.log_path = run_log.finish()?;
        Ok(summary)
    }
}
