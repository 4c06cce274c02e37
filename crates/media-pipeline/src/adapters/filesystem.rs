//! Local-disk [`ObjectStore`]. Keys are storage paths
//! (`media/{id}/{name}`) joined onto a configured root; the directory
//! structure on disk mirrors the key exactly, so `root.join(key)` is a
//! real path for debugging or mounting into a CDN origin.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{MediaError, MediaResult};
use crate::ports::outbound::ObjectStore;

pub struct FilesystemObjectStore {
    root: PathBuf,
}

impl FilesystemObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> MediaResult<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| MediaError::Storage(e.to_string()))?;
        }
        let mut file = tokio::fs::File::create(&path).await.map_err(|e| MediaError::Storage(e.to_string()))?;
        file.write_all(bytes).await.map_err(|e| MediaError::Storage(e.to_string()))?;
        Ok(())
    }
}
