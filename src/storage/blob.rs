//! Blob uploads over `object_store`

use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A bucket that accepts file uploads
#[derive(Debug, Clone)]
pub struct BlobStore {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Bucket name (or local root for the filesystem backend)
    bucket: String,
    /// URI scheme for logging and returned locations
    scheme: String,
}

impl BlobStore {
    /// Google Cloud Storage bucket; credentials come from the `GOOGLE_*` environment
    pub fn gcs(bucket: &str) -> Result<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            scheme: "gs".to_string(),
        })
    }

    /// Local directory standing in for a bucket
    pub fn local(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| {
            Error::config(format!(
                "Failed to create directory {}: {e}",
                root.display()
            ))
        })?;

        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: root.display().to_string(),
            scheme: "file".to_string(),
        })
    }

    /// Wrap an existing store (e.g. in-memory for tests)
    pub fn from_store(store: Arc<dyn ObjectStore>, bucket: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
            scheme: "gs".to_string(),
        }
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Full URI for a key
    pub fn uri_for(&self, key: &str) -> String {
        format!(
            "{}://{}/{}",
            self.scheme,
            self.bucket.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }

    /// Upload a local file to `destination_key`, returning its URI
    pub async fn upload(
        &self,
        local_path: impl AsRef<Path>,
        destination_key: &str,
    ) -> Result<String> {
        let local_path = local_path.as_ref();
        if !local_path.exists() {
            return Err(Error::file_not_found(local_path));
        }

        let data = tokio::fs::read(local_path).await?;
        let size = data.len();
        self.put(destination_key, Bytes::from(data)).await?;

        let uri = self.uri_for(destination_key);
        info!("Uploaded {} ({size} bytes) to {uri}", local_path.display());
        Ok(uri)
    }

    /// Write bytes to a key
    pub async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let path = ObjectPath::from(key.trim_start_matches('/'));

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        Ok(())
    }

    /// Read an object back (used by tests and diagnostics)
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let path = ObjectPath::from(key.trim_start_matches('/'));
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))?;

        result
            .bytes()
            .await
            .map_err(|e| Error::storage(format!("Failed to read {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_upload_to_memory_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, b"{\"data\":{}}").unwrap();

        let store = BlobStore::from_store(Arc::new(InMemory::new()), "reports-bucket");
        let uri = store
            .upload(&file, "raw/2024-03-15_earnings.json")
            .await
            .unwrap();

        assert_eq!(uri, "gs://reports-bucket/raw/2024-03-15_earnings.json");
        let stored = store.get("raw/2024-03-15_earnings.json").await.unwrap();
        assert_eq!(stored.as_ref(), b"{\"data\":{}}");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let store = BlobStore::from_store(Arc::new(InMemory::new()), "reports-bucket");
        let err = store
            .upload("/nonexistent/file.parquet", "staging/file.parquet")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_local_store_layout() {
        let bucket_dir = tempfile::tempdir().unwrap();
        let src_dir = tempfile::tempdir().unwrap();
        let file = src_dir.path().join("data.parquet");
        std::fs::write(&file, b"PAR1").unwrap();

        let store = BlobStore::local(bucket_dir.path()).unwrap();
        let uri = store.upload(&file, "staging/data.parquet").await.unwrap();

        assert!(uri.starts_with("file://"));
        assert!(bucket_dir.path().join("staging/data.parquet").exists());
    }
}
