//! Error types for DNA queries.

use std::io;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::privacy::Rejection;

/// Failure of a bounded, timed file read.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadError {
    /// The file is larger than the configured cap; nothing was read.
    #[error("file is {size} bytes, exceeding the maximum of {max_bytes} bytes")]
    TooLarge { size: u64, max_bytes: u64 },
    /// The read did not complete within its deadline.
    #[error("read did not complete within {}ms", timeout.as_millis())]
    TimedOut { timeout: Duration },
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("file is not valid UTF-8")]
    InvalidEncoding,
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::InvalidData => Self::InvalidEncoding,
            _ => Self::Io(err),
        }
    }
}

/// Coarse classification of a [`QueryError`], reported alongside the message
/// in every error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// An identifier does not match the RSID grammar.
    Validation,
    /// Too many or too few identifiers were requested.
    Cardinality,
    /// The subject or a required file does not exist.
    NotFound,
    /// A subject filter pattern could not be compiled.
    Pattern,
    /// A file exceeded the configured size cap.
    ResourceLimit,
    /// A file read exceeded its deadline.
    Timeout,
    /// A file could not be read due to permissions.
    Permission,
    /// Any other I/O failure.
    Io,
}

/// Foreseen failure of a single operation.
///
/// These never escape an operation as a transport-level failure; they are
/// rendered into the operation's result payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Subject '{0}' not found")]
    SubjectNotFound(String),

    #[error("No {file} file found for subject '{subject}'")]
    MissingFile { subject: String, file: &'static str },

    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Error reading {file} for subject '{subject}': {source}")]
    Read {
        subject: String,
        file: &'static str,
        #[source]
        source: ReadError,
    },

    #[error("Error listing subjects: {0}")]
    ListSubjects(#[source] io::Error),
}

impl QueryError {
    /// Classify this error for the result payload.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(Rejection::InvalidFormat { .. }) => ErrorKind::Validation,
            Self::Rejected(Rejection::TooMany { .. } | Rejection::TooFew) => {
                ErrorKind::Cardinality
            }
            Self::SubjectNotFound(_) | Self::MissingFile { .. } => ErrorKind::NotFound,
            Self::InvalidPattern { .. } => ErrorKind::Pattern,
            Self::Read { source, .. } => match source {
                ReadError::TooLarge { .. } => ErrorKind::ResourceLimit,
                ReadError::TimedOut { .. } => ErrorKind::Timeout,
                ReadError::NotFound => ErrorKind::NotFound,
                ReadError::PermissionDenied => ErrorKind::Permission,
                ReadError::InvalidEncoding | ReadError::Io(_) => ErrorKind::Io,
            },
            Self::ListSubjects(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let not_found: ReadError = io::Error::from(io::ErrorKind::NotFound).into();
        assert!(matches!(not_found, ReadError::NotFound));

        let denied: ReadError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert!(matches!(denied, ReadError::PermissionDenied));

        let other: ReadError = io::Error::other("disk on fire").into();
        assert!(matches!(other, ReadError::Io(_)));
        assert_eq!(other.to_string(), "I/O error: disk on fire");
    }

    #[test]
    fn test_kind_classification() {
        let err = QueryError::Read {
            subject: "alice".to_owned(),
            file: "snp.txt",
            source: ReadError::TimedOut {
                timeout: Duration::from_millis(50),
            },
        };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(
            err.to_string(),
            "Error reading snp.txt for subject 'alice': read did not complete within 50ms"
        );

        let err = QueryError::Read {
            subject: "alice".to_owned(),
            file: "snp.txt",
            source: ReadError::TooLarge {
                size: 10,
                max_bytes: 5,
            },
        };
        assert_eq!(err.kind(), ErrorKind::ResourceLimit);

        assert_eq!(
            QueryError::SubjectNotFound("bob".to_owned()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            QueryError::Rejected(Rejection::TooFew).kind(),
            ErrorKind::Cardinality
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ResourceLimit).unwrap();
        assert_eq!(json, "\"resource_limit\"");
    }
}
