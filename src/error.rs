use thiserror::Error;

pub type Result<T> = std::result::Result<T, KansoError>;

/// Errors surfaced by the persistence boundary.
///
/// Unknown board/column/task ids are not errors: store operations treat them
/// as silent no-ops and report through `Option`/`bool` returns instead.
#[derive(Debug, Error)]
pub enum KansoError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
