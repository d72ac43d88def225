use super::errors::ConnectorError;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Whether the OS reports `path` as a directory we may write into.
    async fn is_writable(&self, path: &Path) -> bool;

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), ConnectorError>;

    async fn read(&self, path: &Path) -> Result<Vec<u8>, ConnectorError>;

    async fn delete(&self, path: &Path) -> Result<(), ConnectorError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn is_writable(&self, path: &Path) -> bool {
        match tokio::fs::metadata(path).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(err) => {
                tracing::debug!("Cannot stat {}: {:?}", path.display(), err);
                false
            }
        }
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), ConnectorError> {
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, ConnectorError> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn delete(&self, path: &Path) -> Result<(), ConnectorError> {
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}

pub mod mock {
    use super::*;

    /// Filesystem that claims to be writable but fails every write, like a full disk.
    pub struct FullDisk;

    #[async_trait]
    impl Filesystem for FullDisk {
        async fn is_writable(&self, _path: &Path) -> bool {
            true
        }

        async fn write(&self, _path: &Path, _contents: &[u8]) -> Result<(), ConnectorError> {
            Err(ConnectorError::Io("No space left on device".to_string()))
        }

        async fn read(&self, path: &Path) -> Result<Vec<u8>, ConnectorError> {
            Err(ConnectorError::NotFound(path.display().to_string()))
        }

        async fn delete(&self, _path: &Path) -> Result<(), ConnectorError> {
            Ok(())
        }
    }
}
