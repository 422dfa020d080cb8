//! Error types for dashboard operations
//!
//! Errors are classified by recoverability:
//! - Retryable: Network issues, timeouts, backend failures
//! - NonRetryable: Bad fixture data, degenerate chart inputs, unknown ids
//! - RequiresUserAction: Missing credentials, broken configuration

use std::fmt;

use thiserror::Error;

/// Which level of the region → entity → project hierarchy a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Region,
    BusinessEntity,
    Project,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Region => "Region",
            EntityKind::BusinessEntity => "Business entity",
            EntityKind::Project => "Project",
        };
        f.write_str(label)
    }
}

/// Error types for dashboard operations
#[derive(Debug, Error)]
pub enum DashboardError {
    // Caller misuse of the chart geometry
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Invalid portfolio data: {0}")]
    InvalidData(String),

    #[error("Failed to parse {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Preference storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // Retryable errors
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Server error {0}")]
    ServerError(u16),

    // Requires user action
    #[error("Not authorized. Log in again")]
    Unauthorized,

    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

impl DashboardError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        DashboardError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DashboardError::NetworkError(_)
                | DashboardError::Timeout(_)
                | DashboardError::ServerError(_)
        )
    }

    /// Returns true if this error requires user action to resolve
    pub fn requires_user_action(&self) -> bool {
        matches!(
            self,
            DashboardError::Unauthorized | DashboardError::ConfigurationError(_)
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::DegenerateGeometry(_) => {
                "Chart inputs must have a positive radius and a non-zero total."
            }
            DashboardError::NotFound { .. } => "Go back and pick an item from the list.",
            DashboardError::InvalidData(_) => "Fix the portfolio data file and reload.",
            DashboardError::ParseError(_) => "Check the file format is correct.",
            DashboardError::IoError(_) => "Check file permissions and disk space.",
            DashboardError::StorageError(_) => {
                "Remove ~/.portview/storage.json to reset saved preferences."
            }
            DashboardError::ConfigurationError(_) => {
                "Check your configuration in ~/.portview/config.json"
            }
            DashboardError::NetworkError(_) => "Check your internet connection and try again.",
            DashboardError::Timeout(_) => "The request took too long. Try again.",
            DashboardError::ServerError(_) => "The server had a problem. Try again later.",
            DashboardError::Unauthorized => "Log in again to refresh your session.",
            DashboardError::HttpStatus { .. } => "Check the request and try again.",
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::IoError(err.to_string())
    }
}

/// Serializable error representation for JSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl From<&DashboardError> for ErrorPayload {
    fn from(err: &DashboardError) -> Self {
        let error_type = if err.requires_user_action() {
            ErrorType::RequiresUserAction
        } else if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        ErrorPayload {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
