//! Result payloads returned by the query operations.

use serde::Serialize;

use crate::error::{ErrorKind, QueryError};

/// Subjects available in the store, sorted lexicographically.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SubjectList {
    pub subjects: Vec<String>,
}

/// Free-text metadata about a subject or their test.
///
/// `info` is `None` when the optional file is absent; `message` then tells
/// the caller how to provide it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InfoResult {
    pub subject: String,
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of an SNP lookup.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SnpQueryResult {
    pub subject: String,
    /// Comma-delimited header, absent if the marker file had no content.
    pub header: Option<String>,
    /// Comma-delimited matching rows in file order.
    pub matching_rows: Vec<String>,
    /// Identifiers as queried, order and duplicates preserved.
    pub queried_rsids: Vec<String>,
    /// Number of matching rows.
    pub found_count: usize,
    /// Identifiers with at least one match, in order of first occurrence in
    /// the file.
    pub found_rsids: Vec<String>,
    /// Queried identifiers with no match, in query order.
    pub not_found_rsids: Vec<String>,
}

/// Structured form of a [`QueryError`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&QueryError> for ErrorPayload {
    fn from(err: &QueryError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}
