//! Pipeline error types.
//!
//! Every failure mode has a named variant. Row-level problems (bad dates,
//! blank stock cells) never reach these types; they are absorbed by the
//! loader and only counted.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::columns::Role;

/// Failure to turn a source into a dataset. All variants are fatal: no
/// partial dataset is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open '{}': {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}. Please check your CSV file.")]
    MissingColumn(Role),
}

impl From<ResolutionError> for LoadError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::AmbiguousOrMissing(role) => LoadError::MissingColumn(role),
        }
    }
}

/// No column matched the keywords of a role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("No column matches role {0}")]
    AmbiguousOrMissing(Role),
}

/// Failure to write the filtered dataset back out.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for load operations.
pub type LoadResult<T> = Result<T, LoadError>;
