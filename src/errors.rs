// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("fetch failed ({url}): {reason}")]
    Fetch { url: String, reason: String },

    #[error("unexpected status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("storage load error: {0}")]
    StorageLoad(String),

    #[error("storage save error: {0}")]
    StorageSave(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

// Manual From implementations
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StorageLoad(format!("JSON parsing error: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        AppError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn storage_load(msg: impl Into<String>) -> Self {
        AppError::StorageLoad(msg.into())
    }

    pub fn storage_save(msg: impl Into<String>) -> Self {
        AppError::StorageSave(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
