//! Record filtering of compressed call-record files.
//!
//! Each input is a gzip-compressed, pipe-delimited text file whose first line
//! is a header. Records are kept when their second field, trimmed, is a known
//! MSISDN. Survivors are written verbatim next to the header in a `.txt` file
//! in the output directory; an output with no surviving record is removed.

use crate::error::{ExtractError, Result};
use crate::lines::{read_line, strip_bom};
use crate::reference::ReferenceSet;
use crate::selector::InputFile;
use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const FIELD_SEPARATOR: u8 = b'|';
const MSISDN_FIELD: usize = 1;

/// Archives at or below this many bytes hold no records and are skipped.
pub const MIN_FILE_SIZE: u64 = 1024;

/// What happened to a single input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Too small to hold any record; nothing was written.
    Skipped { size: u64 },
    /// No record matched; the output file was removed again.
    NoMatch { output: PathBuf },
    /// At least one record matched and `output` holds header plus matches.
    Processed { output: PathBuf, matched_rows: u64 },
}

/// Line counts for one filtered stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub header_written: bool,
    /// Data lines read after the header
    pub rows_read: u64,
    pub rows_matched: u64,
    /// Data lines with fewer than two fields
    pub rows_malformed: u64,
}

/// Output name for an input archive: the first `.gz` becomes `.txt`.
///
/// Only the first occurrence is replaced, wherever it sits in the name.
pub fn output_file_name(name: &str) -> String {
    name.replacen(".gz", ".txt", 1)
}

enum StreamFault {
    Read(io::Error),
    Write(io::Error),
}

impl StreamFault {
    fn into_inner(self) -> io::Error {
        match self {
            Self::Read(e) | Self::Write(e) => e,
        }
    }
}

/// Copy the header line and every matching record from `reader` to `writer`.
///
/// Line terminators (`\n`, `\r\n` or a lone `\r`) are normalised to `\n`
/// and a leading byte order mark is dropped; line contents are otherwise
/// copied byte for byte.
pub fn filter_records<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    msisdns: &ReferenceSet,
) -> io::Result<FilterStats> {
    filter_stream(reader, writer, msisdns).map_err(StreamFault::into_inner)
}

fn filter_stream<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    msisdns: &ReferenceSet,
) -> std::result::Result<FilterStats, StreamFault> {
    let mut stats = FilterStats::default();
    let mut buf = Vec::new();

    if !read_line(&mut reader, &mut buf).map_err(StreamFault::Read)? {
        return Ok(stats);
    }
    strip_bom(&mut buf);
    write_line(&mut writer, &buf).map_err(StreamFault::Write)?;
    stats.header_written = true;

    while read_line(&mut reader, &mut buf).map_err(StreamFault::Read)? {
        stats.rows_read += 1;

        let Some(field) = buf.split(|b| *b == FIELD_SEPARATOR).nth(MSISDN_FIELD) else {
            stats.rows_malformed += 1;
            continue;
        };

        let msisdn = String::from_utf8_lossy(field);
        if msisdns.contains(msisdn.trim()) {
            write_line(&mut writer, &buf).map_err(StreamFault::Write)?;
            stats.rows_matched += 1;
        }
    }

    writer.flush().map_err(StreamFault::Write)?;
    Ok(stats)
}

fn write_line<W: Write>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    writer.write_all(line)?;
    writer.write_all(b"\n")
}

/// Filters input archives against a reference set into an output directory.
pub struct RecordFilter<'a> {
    msisdns: &'a ReferenceSet,
    output_dir: PathBuf,
}

impl<'a> RecordFilter<'a> {
    pub fn new(msisdns: &'a ReferenceSet, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            msisdns,
            output_dir: output_dir.into(),
        }
    }

    /// Where the filtered records of `file` are written.
    pub fn output_path(&self, file: &InputFile) -> PathBuf {
        self.output_dir.join(output_file_name(&file.name))
    }

    /// Filter one input file.
    ///
    /// A partially written output is removed before an error is returned.
    pub fn process(&self, file: &InputFile) -> Result<FileOutcome> {
        if file.size <= MIN_FILE_SIZE {
            tracing::debug!(
                path = %file.path.display(),
                size = file.size,
                "Skipping undersized file"
            );
            return Ok(FileOutcome::Skipped { size: file.size });
        }

        let output = self.output_path(file);
        let stats = match self.filter_into(&file.path, &output) {
            Ok(stats) => stats,
            Err(e) => {
                discard(&output);
                return Err(e);
            }
        };

        if !stats.header_written {
            tracing::warn!(path = %file.path.display(), "Archive holds no lines");
        }

        tracing::debug!(
            path = %file.path.display(),
            rows_read = stats.rows_read,
            rows_matched = stats.rows_matched,
            rows_malformed = stats.rows_malformed,
            "Filtered file"
        );

        if stats.rows_matched == 0 {
            fs::remove_file(&output).map_err(|source| ExtractError::Write {
                path: output.clone(),
                source,
            })?;
            return Ok(FileOutcome::NoMatch { output });
        }

        Ok(FileOutcome::Processed {
            output,
            matched_rows: stats.rows_matched,
        })
    }

    fn filter_into(&self, input: &Path, output: &Path) -> Result<FilterStats> {
        let source = File::open(input).map_err(|source| ExtractError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        let sink = File::create(output).map_err(|source| ExtractError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        let reader = BufReader::new(MultiGzDecoder::new(BufReader::new(source)));
        let writer = BufWriter::new(sink);

        filter_stream(reader, writer, self.msisdns).map_err(|fault| match fault {
            StreamFault::Read(source) => ExtractError::Read {
                path: input.to_path_buf(),
                source,
            },
            StreamFault::Write(source) => ExtractError::Write {
                path: output.to_path_buf(),
                source,
            },
        })
    }
}

fn discard(output: &Path) {
    if let Err(e) = fs::remove_file(output) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(
                path = %output.display(),
                error = %e,
                "Failed to remove partial output file"
            );
        }
    }
}
