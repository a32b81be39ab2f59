use std::io;
use thiserror::Error;

/// Generic SQLite failure code, used when the engine did not report one.
pub const SQLITE_ERROR: i32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Store is unavailable")]
    Unavailable,

    #[error("Open error ({code}): {message}")]
    Open { code: i32, message: String },

    #[error("Schema error ({code}): {message}")]
    Schema { code: i32, message: String },

    #[error("Statement error ({code}): {message}")]
    Statement { code: i32, message: String },

    #[error("Transaction error ({code}): {message}")]
    Transaction { code: i32, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Engine status code carried by the error, if it came from SQLite.
    pub fn code(&self) -> Option<i32> {
        match self {
            StoreError::Open { code, .. }
            | StoreError::Schema { code, .. }
            | StoreError::Statement { code, .. }
            | StoreError::Transaction { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Human-readable engine message.
    pub fn message(&self) -> String {
        match self {
            StoreError::Open { message, .. }
            | StoreError::Schema { message, .. }
            | StoreError::Statement { message, .. }
            | StoreError::Transaction { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// The `(code, message)` pair reported to transport callers.
    pub fn status(&self) -> (i32, String) {
        (self.code().unwrap_or(SQLITE_ERROR), self.message())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}
