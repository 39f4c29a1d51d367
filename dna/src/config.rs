//! Configuration for the DNA query engine.
//!
//! The configuration is an explicit value handed to [`crate::DnaOps::new`];
//! nothing in the core reads process environment on its own. Resolving the
//! root directory from flags or environment variables is a CLI concern.

use std::path::PathBuf;
use std::time::Duration;

/// Default location of the subject store, relative to the user's home.
pub const DEFAULT_ROOT: &str = "~/dna-profiles";

/// Default maximum size of a single file read (256 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 268_435_456;

/// Default wall-clock budget for a single file read, in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;

/// Default wall-clock budget for a single file read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(DEFAULT_READ_TIMEOUT_MS);

/// Marker file holding tab-delimited variant calls.
pub const SNP_FILE: &str = "snp.txt";

/// Optional free-text file describing the subject.
pub const SUBJECT_INFO_FILE: &str = "subject_info.txt";

/// Optional free-text file describing the DNA test itself.
pub const TEST_INFO_FILE: &str = "test_info.txt";

/// Store location and read limits.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DnaConfig {
    /// Directory containing one sub-directory per subject.
    pub root: PathBuf,
    /// Files larger than this many bytes are rejected before being read.
    pub max_file_size: u64,
    /// Reads that do not complete within this budget are abandoned.
    pub read_timeout: Duration,
}

impl DnaConfig {
    /// Build a configuration rooted at `root` with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from a user-supplied path, expanding `~` and
    /// environment variables.
    ///
    /// Unresolvable variables leave the path as written.
    #[must_use]
    pub fn from_user_path(path: &str) -> Self {
        let expanded = shellexpand::full(path).unwrap_or_else(|_| shellexpand::tilde(path));
        Self::new(expanded.as_ref())
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

impl Default for DnaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(shellexpand::tilde(DEFAULT_ROOT).as_ref()),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
