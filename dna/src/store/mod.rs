//! Filesystem collaborator.
//!
//! The query engine never touches the filesystem directly; it goes through
//! [`SubjectStore`], which keeps the orchestration testable with injected
//! stores. [`fs::FsStore`] is the tokio-backed implementation.
//!
//! Every method is a suspension point for the calling request only.

pub mod fs;

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::error::ReadError;

/// Read-only access to the subject store.
pub trait SubjectStore: Send + Sync {
    /// Names of the immediate entries of `dir`, in enumeration order.
    fn list_entries(&self, dir: &Path) -> impl Future<Output = io::Result<Vec<String>>> + Send;

    /// Whether `path` exists and is a directory.
    fn is_container(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;

    /// Read `path` as UTF-8 text.
    ///
    /// Files larger than `max_bytes` are rejected before their content is
    /// read, and the whole read is abandoned once `timeout` elapses.
    fn read_text(
        &self,
        path: &Path,
        max_bytes: u64,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, ReadError>> + Send;
}

/// Race `read` against a `timeout` deadline; the first to settle wins.
///
/// When the deadline wins, the read future is dropped. Any blocking I/O it
/// already handed off may still run to completion in the background; its
/// result is discarded.
///
/// # Errors
/// Returns [`ReadError::TimedOut`] if the deadline elapses first, otherwise
/// whatever `read` returned.
pub async fn with_deadline<F, T>(timeout: Duration, read: F) -> Result<T, ReadError>
where
    F: Future<Output = Result<T, ReadError>>,
{
    tokio::time::timeout(timeout, read)
        .await
        .unwrap_or(Err(ReadError::TimedOut { timeout }))
}
