use crate::domain::room::SettleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Invariant violation in room {room_id}: {source}")]
    InvariantViolation {
        room_id: String,
        #[source]
        source: SettleError,
    },
    #[error("Room {room_id} still contended after {attempts} attempts")]
    Contention { room_id: String, attempts: u32 },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl QuizError {
    /// Whether the host may retry the invocation that produced this error.
    ///
    /// Infrastructure failures and exhausted retry budgets are transient;
    /// invariant violations and bad input are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::IoError(_) | Self::Contention { .. } => true,
            #[cfg(feature = "storage-rocksdb")]
            Self::StorageError(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
