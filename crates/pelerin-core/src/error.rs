//! Error types for the site library.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for every fallible site operation.
///
/// List mutations on [`crate::sections::PageSectionList`] never produce one of
/// these; only persistence, lookups by id and input validation do.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Page not found for the given ID
    #[error("Page with ID {id} not found")]
    PageNotFound { id: u64 },
    /// Builder page not found for the given ID
    #[error("Builder page with ID {id} not found")]
    BuilderPageNotFound { id: u64 },
    /// Section or component id not present in the loaded document
    #[error("Section with ID {id} not found")]
    SectionNotFound { id: String },
    /// CMS entry not found for the given key
    #[error("CMS entry '{key}' not found")]
    CmsKeyNotFound { key: String },
    /// Pilgrimage not found for the given ID
    #[error("Pilgrimage with ID {id} not found")]
    PilgrimageNotFound { id: u64 },
    /// Another page already uses the slug
    #[error("Slug '{slug}' is already used by another page")]
    SlugTaken { slug: String },
    /// The stored document changed since it was loaded
    #[error("Page {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict { id: u64, expected: u64, actual: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Image upload collaborator failures
    #[error("Upload failed: {message}")]
    Upload { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SiteError {
        SiteError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SiteError {
        SiteError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl SiteError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }

    /// Whether retrying the same save after reloading could succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SiteError::database(message).with_source(e))
    }
}

/// Result type alias for site operations
pub type Result<T> = std::result::Result<T, SiteError>;
