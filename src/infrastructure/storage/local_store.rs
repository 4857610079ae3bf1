use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Staging directory on the local filesystem.
pub struct LocalStagingStore {
    inner: Arc<LocalFileSystem>,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path).map_err(StagingStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| StagingStoreError::InvalidPath(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
        })
    }
}

fn store_path(path: &StoragePath) -> Result<StorePath, StagingStoreError> {
    StorePath::parse(path.as_str()).map_err(|e| StagingStoreError::InvalidPath(e.to_string()))
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        let location = store_path(path)?;
        let mut upload = self
            .inner
            .put_multipart(&location)
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(StagingStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(StagingStoreError::UploadFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| StagingStoreError::UploadFailed(e.to_string()))?;

        tracing::debug!(path = %path, bytes = total_bytes, "Staged upload");

        Ok(total_bytes)
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        let location = store_path(path)?;
        match self.inner.delete(&location).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { path, .. }) => {
                Err(StagingStoreError::NotFound(path))
            }
            Err(e) => Err(StagingStoreError::DeleteFailed(e.to_string())),
        }
    }

    fn local_path(&self, path: &StoragePath) -> Result<PathBuf, StagingStoreError> {
        let location = store_path(path)?;
        self.inner
            .path_to_filesystem(&location)
            .map_err(|e| StagingStoreError::InvalidPath(e.to_string()))
    }
}
