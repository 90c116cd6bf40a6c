//! Error types for the earnings ETL
//!
//! This module defines the error hierarchy for every pipeline stage.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the earnings ETL
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token exchange failed: {message}")]
    TokenExchange { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Failed to cast column '{column}' at row {row}: {message}")]
    Cast {
        column: String,
        row: usize,
        message: String,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Storage / Warehouse Errors
    // ============================================================================
    #[error("Object storage error: {message}")]
    Storage { message: String },

    #[error("Load job '{job_id}' failed: {message}")]
    LoadJob { job_id: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a cast error for a single cell
    pub fn cast(column: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::Cast {
            column: column.into(),
            row,
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create an object storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a load job error
    pub fn load_job(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadJob {
            job_id: job_id.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::FileNotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Network or remote-service failure (fetch, upload, token exchange)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Storage { .. }
        )
    }

    /// Malformed input data (bad JSON, missing keys, failed casts)
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Error::JsonParse(_) | Error::Schema { .. } | Error::Cast { .. }
        )
    }
}

/// Result type alias for the earnings ETL
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
///
/// The error keeps its variant, so callers can still match on its kind.
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().prefixed(&message.into()))
    }
}

impl Error {
    /// Prefix the message of this error with `prefix`, keeping its variant
    ///
    /// Wrapped library errors without a message of their own are returned unchanged.
    pub fn prefixed(self, prefix: &str) -> Self {
        let with = |message: String| format!("{prefix}: {message}");
        match self {
            Error::Config { message } => Error::Config {
                message: with(message),
            },
            Error::InvalidConfigValue { field, message } => Error::InvalidConfigValue {
                field,
                message: with(message),
            },
            Error::Auth { message } => Error::Auth {
                message: with(message),
            },
            Error::TokenExchange { message } => Error::TokenExchange {
                message: with(message),
            },
            Error::HttpStatus { status, body } => Error::HttpStatus {
                status,
                body: with(body),
            },
            Error::Schema { message } => Error::Schema {
                message: with(message),
            },
            Error::Output { message } => Error::Output {
                message: with(message),
            },
            Error::Storage { message } => Error::Storage {
                message: with(message),
            },
            Error::LoadJob { job_id, message } => Error::LoadJob {
                job_id,
                message: with(message),
            },
            Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), with(e.to_string()))),
            Error::Other(message) => Error::Other(with(message)),
            other => other,
        }
    }
}
