use crate::storage::StorageError;
use thiserror::Error;

/// Stable numeric code reported when an activity cannot be found.
pub const ACTIVITY_NOT_FOUND_CODE: u32 = 200100;

pub const ACTIVITY_NOT_FOUND_MESSAGE: &str = "Activity not found";

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    NotFound { message: String, code: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ActivityError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn activity_not_found() -> Self {
        Self::NotFound {
            message: ACTIVITY_NOT_FOUND_MESSAGE.to_string(),
            code: ACTIVITY_NOT_FOUND_CODE,
        }
    }

    /// Stable numeric code, when the error kind carries one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::NotFound { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ActivityError>;
