//! Filesystem convenience helpers.
//!
//! Thin async wrappers over `tokio::fs` that return `safeprune_errors::Error`
//! with the offending path attached.

use safeprune_errors::{Error, PlatformError};
use std::path::Path;
use tokio::fs;

/// Result type for filesystem operations
pub type Result<T> = std::result::Result<T, Error>;

/// Check if a path exists
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Check if a path exists and is a regular file
pub async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_file())
}

/// Check if a path exists and is a directory
pub async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

/// Whether a directory exists and holds at least one entry
pub async fn dir_non_empty(path: &Path) -> bool {
    match fs::read_dir(path).await {
        Ok(mut entries) => matches!(entries.next_entry().await, Ok(Some(_))),
        Err(_) => false,
    }
}

/// Create a directory and all of its parents
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

/// Copy a file, creating the destination's parent directories first.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns an error if the parent cannot be created or the copy fails.
pub async fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).await?;
        }
    }

    fs::copy(src, dst).await.map_err(|e| {
        PlatformError::FilesystemOperationFailed {
            operation: "copy".to_string(),
            message: format!("{} -> {}: {e}", src.display(), dst.display()),
        }
        .into()
    })
}

/// Write bytes to a file, creating parent directories first
///
/// # Errors
///
/// Returns an error if the parent cannot be created or the write fails.
pub async fn write(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).await?;
        }
    }
    fs::write(path, contents)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

/// Remove a single file
///
/// # Errors
///
/// Returns an error if the removal fails.
pub async fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))
}

/// Remove a file, treating "already gone" as success
///
/// # Errors
///
/// Returns an error for any failure other than `NotFound`.
pub async fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io_with_path(&e, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_creates_parents() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("a.txt");
        tokio::fs::write(&src, b"hello").await.unwrap();
        let dst = temp.path().join("nested/deeper/a.txt");

        let bytes = copy_file(&src, &dst).await.unwrap();
        assert_eq!(bytes, 5);
        assert_eq!(tokio::fs::read(&dst).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_copy_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let err = copy_file(&temp.path().join("nope"), &temp.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::FilesystemOperationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_dir_non_empty() {
        let temp = tempfile::tempdir().unwrap();
        assert!(!dir_non_empty(temp.path()).await);
        assert!(!dir_non_empty(&temp.path().join("missing")).await);
        tokio::fs::write(temp.path().join("x"), b"").await.unwrap();
        assert!(dir_non_empty(temp.path()).await);
    }

    #[tokio::test]
    async fn test_remove_file_if_exists_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("gone");
        remove_file_if_exists(&path).await.unwrap();
        tokio::fs::write(&path, b"x").await.unwrap();
        remove_file_if_exists(&path).await.unwrap();
        assert!(!exists(&path).await);
    }
}
