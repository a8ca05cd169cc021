//! Avatar payloads on the local filesystem.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::DbError;

/// Directory-rooted blob store addressed by relative paths.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if needed.
    pub async fn init(&self) -> Result<(), DbError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tracing::debug!(root = %self.root.display(), "File store ready");
        Ok(())
    }

    /// `true` when the root exists and is a directory.
    pub async fn is_accessible(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Write `bytes` to `relative`, replacing any existing file.
    ///
    /// Goes through a temporary sibling and a rename, so readers never see a
    /// partial file.
    pub async fn write(&self, relative: &str, bytes: &[u8]) -> Result<(), DbError> {
        let target = self.resolve(relative)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = target.with_extension("part");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &target).await?;
        Ok(())
    }

    /// Read the file at `relative`. `Ok(None)` when it does not exist.
    pub async fn read(&self, relative: &str) -> Result<Option<Vec<u8>>, DbError> {
        let target = self.resolve(relative)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the file at `relative`. Returns `false` if it was already gone.
    pub async fn remove(&self, relative: &str) -> Result<bool, DbError> {
        let target = self.resolve(relative)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Join `relative` onto the root, refusing anything that could escape it.
    fn resolve(&self, relative: &str) -> Result<PathBuf, DbError> {
        let path = Path::new(relative);
        let is_plain = !relative.is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(DbError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(path))
    }
}
