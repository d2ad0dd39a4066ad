//! Typed error handling for linkvault
//!
//! Every failure the service can produce is one of a handful of categories,
//! each with its own HTTP status and machine-readable code.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a submitted link is missing a required field
//! - [`LinkError`]: the addressed link does not exist
//! - [`RequestError`]: the request itself is unusable (bad body, no credential)
//! - [`ConfigError`]: the server is misconfigured (no credential configured)
//! - [`StorageError`]: the backing document could not be read or written
//!
//! Configuration and storage errors carry paths and sources for the logs, but
//! their HTTP body is deliberately generic.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for linkvault
#[derive(Debug, Error)]
pub enum VaultError {
    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Link lookup errors
    #[error(transparent)]
    Link(#[from] LinkError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backing document errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub error: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl VaultError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VaultError::Validation(_) => StatusCode::BAD_REQUEST,
            VaultError::Link(e) => e.status_code(),
            VaultError::Request(e) => e.status_code(),
            VaultError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VaultError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            VaultError::Validation(_) => "VALIDATION_ERROR",
            VaultError::Link(e) => e.error_code(),
            VaultError::Request(e) => e.error_code(),
            VaultError::Config(_) => "CONFIG_ERROR",
            VaultError::Storage(_) => "STORAGE_ERROR",
            VaultError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is the server's fault rather than the client's
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Convert to an error response
    ///
    /// Server-side failures get a fixed message so that file paths and
    /// credential state never reach the client.
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            VaultError::Config(_) => "Server configuration error".to_string(),
            VaultError::Storage(_) | VaultError::Internal(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            error,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            VaultError::Link(LinkError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            VaultError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("Missing required fields: {}", field_list(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// A record inside a bulk import failed validation
    #[error("Invalid record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn config_file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

fn field_list(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| FieldValidationError {
                field: field.to_string(),
                message: errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is required".to_string()),
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// Errors related to link lookups
#[derive(Debug, Error)]
pub enum LinkError {
    /// No link carries this id
    #[error("Link with id '{id}' not found")]
    NotFound { id: String },
}

impl LinkError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LinkError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LinkError::NotFound { .. } => "LINK_NOT_FOUND",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Invalid request body
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Credential missing or wrong
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No access token configured; protected operations cannot be authorized
    #[error("No access token configured (set ACCESS_TOKEN or access_token in the config file)")]
    MissingCredential,

    /// The configured access token cannot be carried in a cookie
    #[error("Access token must consist of visible ASCII characters other than '\"', ',', ';' and '\\'")]
    InvalidCredential,

    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", config_file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the backing document
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document exists but could not be read
    #[error("Failed to read link document '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not a valid link collection
    #[error("Failed to parse link document '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The new document could not be written
    #[error("Failed to write link document '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be serialized
    #[error("Failed to serialize link collection: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A lock protecting the collection was poisoned
    #[error("Link store lock poisoned: {0}")]
    Poisoned(String),
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for linkvault operations
pub type VaultResult<T> = Result<T, VaultError>;
