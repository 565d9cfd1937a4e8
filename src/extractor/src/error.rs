use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read reference file {}: {source}", path.display())]
    ReferenceFile { path: PathBuf, source: io::Error },
    #[error("Failed to list input directory {}: {source}", path.display())]
    ListInputs { path: PathBuf, source: io::Error },
    #[error("Invalid file pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Failed to inspect {}: {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to write run log {}: {source}", path.display())]
    RunLog { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
