use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Reading or writing the persisted store failed.
    #[error("Storage error: {0}")]
    StorageIo(String),

    /// A book's file is no longer on the device.
    #[error("Book file not found: {0}")]
    FileMissing(String),

    /// A book with the same name is already in the library.
    #[error("Book already added: {0}")]
    DuplicateImport(String),

    /// No book record with this name.
    #[error("Book not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::StorageIo(format!("Invalid stored data: {}", e))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::StorageIo(e.to_string())
    }
}

/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, AppError>;
