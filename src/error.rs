//! Error types for bundle ingestion

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for bundle operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors that can occur while ingesting an evidence bundle
#[derive(Debug)]
pub enum CheckError {
    /// Target path is neither a directory nor a regular file
    InvalidTarget(PathBuf),
    /// A file requested from a directory-form bundle does not exist
    FileNotFound { bundle: PathBuf, path: String },
    /// An entry requested from an archive-form bundle does not exist
    EntryNotFound { bundle: PathBuf, entry: String },
    /// A regular-file target could not be opened as a ZIP archive
    NotAnArchive { path: PathBuf, source: zip::result::ZipError },
    /// I/O failure while building the directory listing
    ListDir { path: PathBuf, source: io::Error },
    /// An entry matched the bug report suffix but is not a valid ZIP
    CorruptBugReport { entry: String, source: zip::result::ZipError },
    /// I/O error (file read, directory walk)
    Io(io::Error),
    /// ZIP container error (outer archive)
    Zip(zip::result::ZipError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::InvalidTarget(path) => {
                write!(f, "target is neither a directory nor a file: {}", path.display())
            }
            CheckError::FileNotFound { bundle, path } => {
                write!(f, "file not found in bundle {}: {}", bundle.display(), path)
            }
            CheckError::EntryNotFound { bundle, entry } => {
                write!(f, "entry not found in archive {}: {}", bundle.display(), entry)
            }
            CheckError::NotAnArchive { path, source } => {
                write!(f, "could not open {} as a ZIP archive: {}", path.display(), source)
            }
            CheckError::ListDir { path, source } => {
                write!(f, "could not list directory {}: {}", path.display(), source)
            }
            CheckError::CorruptBugReport { entry, source } => {
                write!(f, "entry {} is not a valid bug report archive: {}", entry, source)
            }
            CheckError::Io(e) => write!(f, "I/O error: {}", e),
            CheckError::Zip(e) => write!(f, "ZIP error: {}", e),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Io(e) => Some(e),
            CheckError::Zip(e) => Some(e),
            CheckError::NotAnArchive { source, .. } => Some(source),
            CheckError::ListDir { source, .. } => Some(source),
            CheckError::CorruptBugReport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for CheckError {
    fn from(err: io::Error) -> Self {
        CheckError::Io(err)
    }
}

impl From<zip::result::ZipError> for CheckError {
    fn from(err: zip::result::ZipError) -> Self {
        CheckError::Zip(err)
    }
}
