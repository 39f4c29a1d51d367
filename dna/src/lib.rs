//! # dna
//!
//! Privacy-gated queries over a local genetic data store.
//!
//! The store is a directory with one sub-directory per subject:
//!
//! ```text
//! ~/dna-profiles/
//! ├── alice/
//! │   ├── snp.txt            # tab-delimited: rsid, chromosome, position, allele1, allele2
//! │   ├── subject_info.txt   # optional free text about the person
//! │   └── test_info.txt      # optional free text about the DNA test
//! └── bob/
//!     └── snp.txt
//! ```
//!
//! Four operations are exposed: list subjects, fetch subject or test
//! metadata, and look up SNPs by RSID. SNP lookups pass through a privacy
//! gate (1 to 10 well-formed RSIDs) before the store is touched, then scan
//! the marker file once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dna::{DnaConfig, DnaOps, RsidInput};
//!
//! # async fn run() {
//! let ops = DnaOps::with_fs(DnaConfig::new("/data/dna-profiles"));
//! let result = ops
//!     .query_snp_data("alice", RsidInput::from(vec!["rs3131972", "rs1815739"]))
//!     .await;
//! match result {
//!     Ok(found) => println!("{} matching rows", found.found_count),
//!     Err(err) => println!("query failed: {err}"),
//! }
//! # }
//! ```

mod config;
mod error;
mod input;
mod ops;
pub mod privacy;
mod results;
pub mod scan;
pub mod store;
pub mod tools;

pub use config::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_READ_TIMEOUT, DEFAULT_READ_TIMEOUT_MS, DEFAULT_ROOT, DnaConfig,
    SNP_FILE, SUBJECT_INFO_FILE, TEST_INFO_FILE,
};
pub use error::{ErrorKind, QueryError, ReadError};
pub use input::RsidInput;
pub use ops::{DnaOps, InfoFile};
pub use privacy::{MAX_RSIDS_PER_QUERY, Rejection};
pub use results::{ErrorPayload, InfoResult, SnpQueryResult, SubjectList};
pub use store::SubjectStore;
pub use store::fs::FsStore;
pub use tools::{Operation, ToolDescriptor, ToolError, tool_descriptors};

pub use dna_rsid::{is_valid_rsid, validate_rsid};
