//! Shared RSID validation primitives.
//!
//! An RSID (reference SNP identifier) is the literal prefix `rs` followed by
//! one or more ASCII decimal digits. Surrounding whitespace is ignored; case
//! is significant, so `RS123` is rejected.
//!
//! This crate is the single source of truth for the identifier grammar and is
//! used by the `dna` query engine before any genetic data is touched.

use thiserror::Error;

/// The required prefix for all RSIDs.
pub const RSID_PREFIX: &str = "rs";

/// Errors from RSID validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsidError {
    /// The identifier is empty after trimming.
    #[error("RSID is empty")]
    Empty,

    /// The identifier does not start with the lowercase `rs` prefix.
    #[error("RSID '{id}' must start with '{RSID_PREFIX}'")]
    MissingPrefix {
        /// The trimmed identifier that failed validation.
        id: String,
    },

    /// Nothing follows the `rs` prefix.
    #[error("RSID '{id}' has no digits after '{RSID_PREFIX}'")]
    MissingDigits {
        /// The trimmed identifier that failed validation.
        id: String,
    },

    /// A non-digit character follows the prefix.
    #[error("RSID '{id}' contains invalid character '{ch}' at offset {offset}")]
    InvalidCharacter {
        /// The trimmed identifier that failed validation.
        id: String,
        /// The offending character.
        ch: char,
        /// Byte offset of the character within the trimmed identifier.
        offset: usize,
    },
}

/// Validate an RSID and return its trimmed form.
///
/// # Errors
/// Returns [`RsidError`] describing the first grammar violation found.
pub fn validate_rsid(id: &str) -> Result<&str, RsidError> {
    let raw = id.trim();

    if raw.is_empty() {
        return Err(RsidError::Empty);
    }

    let Some(digits) = raw.strip_prefix(RSID_PREFIX) else {
        return Err(RsidError::MissingPrefix { id: raw.to_owned() });
    };

    if digits.is_empty() {
        return Err(RsidError::MissingDigits { id: raw.to_owned() });
    }

    if let Some((pos, ch)) = digits.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(RsidError::InvalidCharacter {
            id: raw.to_owned(),
            ch,
            offset: RSID_PREFIX.len() + pos,
        });
    }

    Ok(raw)
}

/// Check an RSID against the grammar `^rs[0-9]+$` after trimming.
#[inline]
#[must_use]
pub fn is_valid_rsid(id: &str) -> bool {
    validate_rsid(id).is_ok()
}
