//! Error types for modelgen

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for modelgen operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors that can occur while loading configuration, talking to the
/// database, or generating model files. None of them are retried.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Failed to load config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(#[from] mysql_async::Error),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Failed to generate model for table {table}: {message}")]
    Generation { table: String, message: String },

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {} ({table}): {source}", path.display())]
    WriteFile {
        table: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Whether this error came from configuration loading or validation
    pub fn is_config(&self) -> bool {
        matches!(self, GenError::Config { .. } | GenError::Validation(_))
    }

    /// Whether this error came from reaching or querying the database
    pub fn is_connectivity(&self) -> bool {
        matches!(self, GenError::Connection(_) | GenError::Database(_))
    }
}
