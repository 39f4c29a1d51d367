//! Local filesystem store backed by `tokio::fs`.

use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncReadExt;

use super::{SubjectStore, with_deadline};
use crate::error::ReadError;

/// [`SubjectStore`] over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl SubjectStore for FsStore {
    async fn list_entries(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Names that are not valid UTF-8 cannot be addressed by a subject
            // name, so they are not listed either.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn is_container(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_dir())
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_text(
        &self,
        path: &Path,
        max_bytes: u64,
        timeout: Duration,
    ) -> Result<String, ReadError> {
        with_deadline(timeout, read_bounded(path, max_bytes)).await
    }
}

/// Read a file, enforcing `max_bytes` twice: once from metadata before any
/// content is read, and again on the bytes actually read (`take`), so a file
/// growing between the two steps cannot exceed the cap.
async fn read_bounded(path: &Path, max_bytes: u64) -> Result<String, ReadError> {
    let file = tokio::fs::File::open(path).await?;

    let size = file.metadata().await?.len();
    if size > max_bytes {
        return Err(ReadError::TooLarge { size, max_bytes });
    }

    let mut buffer = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut buffer)
        .await?;

    let read = u64::try_from(buffer.len()).unwrap_or(u64::MAX);
    if read > max_bytes {
        return Err(ReadError::TooLarge {
            size: read,
            max_bytes,
        });
    }

    String::from_utf8(buffer).map_err(|_| ReadError::InvalidEncoding)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LONG: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_list_entries_includes_files_and_dirs() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("alice")).unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let mut names = FsStore.list_entries(tmp.path()).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["alice", "notes.txt"]);
    }

    #[tokio::test]
    async fn test_list_entries_missing_dir_errors() {
        let tmp = TempDir::new().unwrap();
        let err = FsStore
            .list_entries(&tmp.path().join("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_is_container_and_exists() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("alice");
        let file = tmp.path().join("notes.txt");
        fs::create_dir(&dir).unwrap();
        fs::write(&file, "x").unwrap();

        assert!(FsStore.is_container(&dir).await);
        assert!(!FsStore.is_container(&file).await);
        assert!(!FsStore.is_container(&tmp.path().join("nope")).await);

        assert!(FsStore.exists(&dir).await);
        assert!(FsStore.exists(&file).await);
        assert!(!FsStore.exists(&tmp.path().join("nope")).await);
    }

    #[tokio::test]
    async fn test_read_text_ok() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("snp.txt");
        fs::write(&file, "rsid\tchromosome\n").unwrap();

        let text = FsStore.read_text(&file, 1024, LONG).await.unwrap();
        assert_eq!(text, "rsid\tchromosome\n");
    }

    #[tokio::test]
    async fn test_read_text_exact_limit_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("snp.txt");
        fs::write(&file, "12345").unwrap();

        assert_eq!(FsStore.read_text(&file, 5, LONG).await.unwrap(), "12345");
    }

    #[tokio::test]
    async fn test_read_text_too_large() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("snp.txt");
        fs::write(&file, "123456").unwrap();

        let err = FsStore.read_text(&file, 5, LONG).await.unwrap_err();
        assert!(matches!(
            err,
            ReadError::TooLarge {
                size: 6,
                max_bytes: 5
            }
        ));
    }

    #[tokio::test]
    async fn test_read_text_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = FsStore
            .read_text(&tmp.path().join("nope.txt"), 1024, LONG)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::NotFound));
    }

    #[tokio::test]
    async fn test_read_text_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("snp.txt");
        fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();

        let err = FsStore.read_text(&file, 1024, LONG).await.unwrap_err();
        assert!(matches!(err, ReadError::InvalidEncoding));
    }
}
