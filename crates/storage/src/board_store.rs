//! Storage trait for board snapshots.

use async_trait::async_trait;
use eventdesk_core::{Board, ValidationError};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored board violates an invariant
    #[error("invalid board: {0}")]
    Validation(#[from] ValidationError),
}

/// Where the caller keeps its tasks and roster.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Load and validate the board.
    async fn load(&self) -> Result<Board>;

    /// Validate and persist the board.
    async fn save(&self, board: &Board) -> Result<()>;
}
