//! Single-pass scanner for tab-delimited marker files.
//!
//! Layout of a marker file (`snp.txt`), columns separated by tabs:
//!
//! ```text
//! rsid       chromosome  position  allele1  allele2
//! rs3131972  1           752721    A        G
//! ```
//!
//! Lines are trimmed before use and blank lines are skipped everywhere. The
//! first remaining line is the header; every later line is a data row whose
//! first column is the RSID. Header and matched rows are returned with tabs
//! converted to commas.

use std::collections::HashSet;

/// Result of scanning a marker file for a set of identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Comma-delimited header, or `None` if the file had no non-blank lines.
    pub header: Option<String>,
    /// Comma-delimited matching rows, in file order.
    pub rows: Vec<String>,
    /// Identifiers with at least one matching row, in order of first
    /// occurrence in the file.
    pub found: Vec<String>,
}

impl ScanOutcome {
    /// Queried identifiers with no matching row.
    ///
    /// Derived by filtering the queried list, so order and duplicates of the
    /// query are preserved: a missing identifier asked for twice is reported
    /// twice, a found one is never reported.
    #[must_use]
    pub fn not_found(&self, queried: &[String]) -> Vec<String> {
        let found: HashSet<&str> = self.found.iter().map(String::as_str).collect();
        queried
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Scan `text` once, collecting rows whose first column is in `rsids`.
#[must_use]
pub fn scan(text: &str, rsids: &[String]) -> ScanOutcome {
    let wanted: HashSet<&str> = rsids.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(wanted.len());
    let mut outcome = ScanOutcome::default();

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if outcome.header.is_none() {
            outcome.header = Some(line.replace('\t', ","));
            continue;
        }

        let mut columns = line.split('\t');
        let Some(rsid) = columns.next() else {
            continue;
        };
        if !wanted.contains(rsid) {
            continue;
        }

        outcome.rows.push(line.replace('\t', ","));
        if seen.insert(rsid) {
            outcome.found.push(rsid.to_owned());
        }
    }

    outcome
}
