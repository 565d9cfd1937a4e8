//! Input file selection by name pattern.

use crate::error::{ExtractError, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// File name patterns for the two record types, enumerated in this order.
pub const INPUT_PATTERNS: [&str; 2] = ["*_gprsCall*.gz", "*_mobileOriginatedCall*.gz"];

/// Input archive picked up from the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// File name component, used to derive the output name
    pub name: String,
    /// Size on disk in bytes
    pub size: u64,
}

/// List regular files in `dir` matching each pattern in turn.
///
/// Matches for one pattern are sorted by name and fully listed before the
/// next pattern is consulted. A file matching several patterns is listed once
/// per pattern.
pub fn select_input_files(dir: &Path, patterns: &[&str]) -> Result<Vec<InputFile>> {
    let compiled = patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| ExtractError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let candidates = list_files(dir)?;

    let mut selected = Vec::new();
    for pattern in &compiled {
        let mut matches: Vec<&InputFile> = candidates
            .iter()
            .filter(|file| pattern.matches(&file.name))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            pattern = pattern.as_str(),
            matches = matches.len(),
            "Matched input files"
        );
        selected.extend(matches.into_iter().cloned());
    }

    Ok(selected)
}

fn list_files(dir: &Path) -> Result<Vec<InputFile>> {
    let list_error = |source| ExtractError::ListInputs {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|source| ExtractError::Metadata {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            continue;
        }

        // Names that aren't valid UTF-8 can't match a textual pattern
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %path.display(), "Ignoring non UTF-8 file name");
            continue;
        };

        files.push(InputFile {
            path,
            name,
            size: metadata.len(),
        });
    }

    Ok(files)
}
