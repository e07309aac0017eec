use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("transcript store error: {0}")]
    Store(String),

    #[error("transcript store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("storage error: {0}")]
    Storage(#[from] benefits_storage::error::StorageError),

    #[error(transparent)]
    Core(#[from] benefits_core::error::CoreError),
}
