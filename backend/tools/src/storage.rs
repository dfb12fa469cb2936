use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use vidwatch_core::VideoStorage;

/// Videos stored as plain files under a root directory.
pub struct LocalFolderStorage {
    root: PathBuf,
}

impl LocalFolderStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl VideoStorage for LocalFolderStorage {
    /// Every regular file below the root, as `/`-separated relative paths, sorted.
    async fn list_paths(&self) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .with_context(|| format!("Failed to list video folder: {}", dir.display()))?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                        let parts: Vec<String> = relative
                            .components()
                            .map(|c| c.as_os_str().to_string_lossy().into_owned())
                            .collect();
                        paths.push(parts.join("/"));
                    }
                }
            }
        }

        paths.sort();
        debug!(root = %self.root.display(), count = paths.len(), "Listed videos");
        Ok(paths)
    }

    async fn download(&self, path: &str) -> Result<Bytes> {
        let relative = path.trim_start_matches(['/', '\\']);
        if relative.split(['/', '\\']).any(|part| part == "..") {
            anyhow::bail!("Security violation: Path cannot contain '..'");
        }

        let full = self.root.join(relative);
        let data = fs::read(&full)
            .await
            .with_context(|| format!("Failed to read video: {}", full.display()))?;
        Ok(Bytes::from(data))
    }
}
