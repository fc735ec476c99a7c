//! Disk storage for uploaded event images.
//!
//! Files land in a single directory under a generated name,
//! `"{uuid}-{original basename}"`, so uploads never collide and a client
//! cannot choose the path.

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload stream failed: {0}")]
    Stream(String),
}

pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Stream `chunks` to a new file and return its generated name.
    ///
    /// A partially written file is removed if the stream fails.
    pub async fn save<S, E>(&self, original_name: &str, chunks: S) -> Result<String, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        self.ensure_dir().await?;
        let filename = stored_filename(original_name);
        let path = self.dir.join(&filename);

        match write_stream(&path, chunks).await {
            Ok(bytes) => {
                tracing::info!("Stored upload {} ({} bytes)", filename, bytes);
                Ok(filename)
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove partial upload {}: {}", filename, rm);
                }
                Err(e)
            }
        }
    }

    /// Remove a stored file. Missing files are not an error.
    pub async fn remove(&self, filename: &str) -> Result<(), UploadError> {
        let Some(name) = Path::new(filename).file_name() else {
            return Ok(());
        };
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// `remove`, logging instead of failing. Used on cleanup paths.
    pub async fn discard(&self, filename: Option<String>) {
        if let Some(name) = filename {
            if let Err(e) = self.remove(&name).await {
                tracing::warn!("Failed to discard upload {}: {}", name, e);
            }
        }
    }
}

async fn write_stream<S, E>(path: &Path, chunks: S) -> Result<u64, UploadError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Generated storage name for an upload: a fresh UUID plus the sanitized
/// basename of what the client sent.
pub fn stored_filename(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    let sanitized = if sanitized.is_empty() {
        "upload"
    } else {
        sanitized
    };
    format!("{}-{}", Uuid::new_v4(), sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn test_stored_filename_keeps_basename() {
        let name = stored_filename("poster.png");
        assert!(name.ends_with("-poster.png"));
        assert_eq!(name.len(), 36 + 1 + "poster.png".len());
    }

    #[test]
    fn test_stored_filename_strips_paths() {
        assert!(stored_filename("../../etc/passwd").ends_with("-passwd"));
        assert!(stored_filename("C:\\Users\\me\\cat.jpg").ends_with("-cat.jpg"));
        assert!(stored_filename("my photo (1).jpg").ends_with("-my_photo__1_.jpg"));
        assert!(stored_filename("").ends_with("-upload"));
        assert!(stored_filename("..").ends_with("-upload"));
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let chunks = stream::iter(vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]);
        let name = store.save("greeting.txt", chunks).await.unwrap();

        let path = store.dir().join(&name);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello world");

        store.remove(&name).await.unwrap();
        assert!(!path.exists());
        // Second remove is a no-op
        store.remove(&name).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err("connection reset"),
        ]);
        let err = store.save("broken.bin", chunks).await.unwrap_err();
        assert!(matches!(err, UploadError::Stream(_)));

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }
}
