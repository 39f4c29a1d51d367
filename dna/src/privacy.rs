//! Privacy gate for SNP queries.
//!
//! Bounds how much of a genome a single request can reveal. Cardinality is
//! checked before identifier format, so an oversized request is reported as a
//! privacy violation even when its identifiers are also malformed. The gate
//! runs before any file access.

use dna_rsid::is_valid_rsid;
use thiserror::Error;

/// Maximum number of identifiers accepted in one query.
pub const MAX_RSIDS_PER_QUERY: usize = 10;

/// Minimum number of identifiers accepted in one query.
pub const MIN_RSIDS_PER_QUERY: usize = 1;

/// Reason a query was refused by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Maximum {MAX_RSIDS_PER_QUERY} RSIDs allowed per query for privacy protection")]
    TooMany { count: usize },

    #[error("At least {MIN_RSIDS_PER_QUERY} RSID must be provided")]
    TooFew,

    #[error(
        "Invalid RSID format(s): {}. RSIDs must match pattern: rs followed by digits (e.g., rs123456)",
        format_list(invalid)
    )]
    InvalidFormat { invalid: Vec<String> },
}

fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Check a normalized identifier list against the cardinality and format
/// policy.
///
/// # Errors
/// Returns the first policy violated, in order: too many, too few, invalid
/// format (naming every failing element, in input order).
pub fn check(rsids: &[String]) -> Result<(), Rejection> {
    if rsids.len() > MAX_RSIDS_PER_QUERY {
        return Err(Rejection::TooMany { count: rsids.len() });
    }
    if rsids.len() < MIN_RSIDS_PER_QUERY {
        return Err(Rejection::TooFew);
    }

    let invalid: Vec<String> = rsids
        .iter()
        .filter(|id| !is_valid_rsid(id))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(Rejection::InvalidFormat { invalid });
    }

    Ok(())
}
