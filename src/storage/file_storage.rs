use crate::{error::Result, storage::Storage};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation
///
/// Each key is stored as `<root>/.kanso/<key>.json`.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const KANSO_DIR: &'static str = ".kanso";

    /// Creates a new FileStorage instance for the given data root
    pub fn new(data_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: data_root.as_ref().join(Self::KANSO_DIR),
        }
    }

    fn key_file(&self, key: &str) -> PathBuf {
        self.root_path.join(format!("{}.json", key))
    }

    async fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.key_file(key);

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(contents))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_directory_exists().await?;

        fs::write(self.key_file(key), value).await?;
        Ok(())
    }
}
