//! Access to book files on the device.

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Reads book files by their stored path.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Whether a file exists at this path.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Whole file content.
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;
}

/// Local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

#[async_trait]
impl FileSource for LocalFiles {
    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(Path::new(path)).await?)
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(Path::new(path)).await?)
    }
}
