//! Error type shared by the library and the command line.
//!
//! Only I/O and export failures are errors. Malformed data lines inside an
//! instance file are skipped by the parser and never surface here.

use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The instance file could not be opened or read.
    Open { path: PathBuf, source: io::Error },
    /// A result file could not be created or written.
    Write { path: PathBuf, source: io::Error },
    /// JSON export failed.
    Json(serde_json::Error),
    /// CSV export failed.
    Csv(csv::Error),
}

impl Error {
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Open { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write { path: path.into(), source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open { path, source } => {
                write!(f, "cannot open instance {}: {}", path.display(), source)
            }
            Error::Write { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
            Error::Json(e) => write!(f, "JSON export failed: {}", e),
            Error::Csv(e) => write!(f, "CSV export failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { source, .. } | Error::Write { source, .. } => Some(source),
            Error::Json(e) => Some(e),
            Error::Csv(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}
