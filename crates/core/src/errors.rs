use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::{RecordRef, StoreError};

/// Coarse classification of a [`SyncError`].
///
/// Callers branch on this discriminant, never on the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Unauthorized,
    Invalid,
    Unavailable,
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Slot not found: {0}")]
    SlotNotFound(Uuid),

    #[error("Slot already claimed: {0}")]
    SlotAlreadyClaimed(Uuid),

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("Booking already cancelled: {0}")]
    AlreadyCancelled(Uuid),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Invalid(String),

    #[error("Store unavailable: {0}")]
    Unavailable(#[from] eyre::Report),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::SlotNotFound(_) | SyncError::BookingNotFound(_) | SyncError::NotFound(_) => {
                ErrorKind::NotFound
            }
            SyncError::SlotAlreadyClaimed(_)
            | SyncError::AlreadyCancelled(_)
            | SyncError::Conflict(_) => ErrorKind::Conflict,
            SyncError::Unauthorized(_) => ErrorKind::Unauthorized,
            SyncError::Invalid(_) => ErrorKind::Invalid,
            SyncError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Only infrastructure failures are worth retrying; business outcomes are final.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Unavailable
    }
}

/// Fallback translation for store failures that the caller did not resolve
/// into a more precise outcome.
impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConditionFailed(record) => {
                SyncError::Conflict(format!("precondition failed on {}", record))
            }
            StoreError::MissingRecord(RecordRef::Slot(id)) => SyncError::SlotNotFound(id),
            StoreError::MissingRecord(RecordRef::Booking(id)) => SyncError::BookingNotFound(id),
            StoreError::MissingRecord(record) => SyncError::NotFound(record.to_string()),
            StoreError::DuplicateKey(record) => {
                SyncError::Unavailable(eyre::eyre!("duplicate key for {}", record))
            }
            StoreError::Unavailable(report) => SyncError::Unavailable(report),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
