//! Error types produced by the utility layer.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type BindResult<T> = Result<T, BindError>;

/// Errors that can occur while persisting or reading property data.
///
/// Every failure is reported to the immediate caller after a single attempt;
/// nothing in this crate retries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// A file-system operation failed on the named path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating-system error.
        #[source]
        source: io::Error,
    },

    /// A freshly written temporary file could not replace the target.
    ///
    /// Both paths are embedded so callers can diagnose a partial-persist
    /// state: the temporary file is left behind rather than deleted.
    #[error("failed to replace '{to}' with '{from}': {source}")]
    Rename {
        /// Temporary file that holds the complete new content.
        from: PathBuf,
        /// Target the rename was meant to land on.
        to: PathBuf,
        /// Underlying operating-system error.
        #[source]
        source: io::Error,
    },

    /// The archive container could not be written.
    #[error("archive error on '{path}': {source}")]
    Archive {
        /// Archive file being written.
        path: PathBuf,
        /// Underlying error reported by the container writer.
        #[source]
        source: Box<zip::result::ZipError>,
    },

    /// Textual property data was malformed.
    #[error("malformed property data at line {line}: {message}")]
    Parse {
        /// One-based line number within the input.
        line: usize,
        /// Human-readable description of the defect.
        message: String,
    },
}

impl BindError {
    /// Construct an [`BindError::Io`] for a path.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn archive(path: &Path, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Fatal assertion for states that a logic invariant rules out.
///
/// Reaching this function signals a defect in this crate, never an
/// environmental failure, so it aborts with a fixed diagnostic instead of
/// returning an error the caller could be tempted to handle.
#[cold]
pub(crate) fn unreachable_invariant() -> ! {
    panic!("this code should never be reached")
}
