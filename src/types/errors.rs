use std::fmt;

// === BookmarkError ===

/// Errors related to store-facing bookmark operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkError {
    /// Batch input was rejected before any mutation was attempted.
    Validation(String),
    /// Record with the given ID was not found.
    NotFound(i64),
    /// The underlying store operation failed.
    Storage(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::Validation(msg) => write!(f, "Bookmark validation failed: {}", msg),
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::Storage(msg) => write!(f, "Bookmark storage error: {}", msg),
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<rusqlite::Error> for BookmarkError {
    fn from(err: rusqlite::Error) -> Self {
        BookmarkError::Storage(err.to_string())
    }
}

// === ImportError ===

/// Errors raised while reading a bookmark export.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The export is not syntactically valid JSON.
    InvalidJson(String),
    /// A node in the export has an unsupported shape or type.
    InvalidNode(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidJson(msg) => write!(f, "Invalid bookmark JSON: {}", msg),
            ImportError::InvalidNode(msg) => write!(f, "Invalid bookmark node: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// File I/O error when reading or writing the config file.
    IoError(String),
    /// The config file could not be parsed or serialized.
    SerializationError(String),
    /// The settings key does not exist.
    InvalidKey(String),
    /// The value does not fit the setting it was assigned to.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
