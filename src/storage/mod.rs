use crate::error::Result;
use async_trait::async_trait;

pub mod file_storage;

/// Key-value storage for serialized board snapshots
///
/// The store persists its whole state as one serialized record under a single
/// key; backends only need get/set over text.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
