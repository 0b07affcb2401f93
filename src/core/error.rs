use thiserror::Error;

use crate::models::ProfileId;
use crate::services::StoreError;

/// Errors surfaced by core operations
///
/// All variants are terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A profile cannot like or dislike itself")]
    SelfAction,

    #[error("Profile {0} not found")]
    NotFound(ProfileId),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CoreError::NotFound(id),
            StoreError::Conflict(message) => CoreError::Validation(message),
            other => CoreError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
