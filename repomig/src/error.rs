//! Error types for repomig
//!
//! Two layers:
//! - [`MigrationError`]: failures of repository I/O and document parsing,
//!   propagated with `?` to the operation boundary.
//! - [`ApiError`]: HTTP-facing errors rendered by axum.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Migration core error
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A repository call returned a client/server error status or never completed
    #[error("Transport error for {url}{}: {message}", dsid_note(.dsid))]
    Transport {
        url: String,
        status: Option<u16>,
        dsid: Option<String>,
        message: String,
    },

    /// A document was malformed or lacked a required element
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// HTTP client could not be constructed
    #[error("Client setup error: {0}")]
    ClientSetup(String),
}

fn dsid_note(dsid: &Option<String>) -> String {
    match dsid {
        Some(dsid) => format!(" (datastream {dsid})"),
        None => String::new(),
    }
}

impl MigrationError {
    /// Non-success HTTP status
    pub fn status(url: impl Into<String>, status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("status {status}")
        } else {
            format!("status {status}: {body}")
        };
        MigrationError::Transport {
            url: url.into(),
            status: Some(status),
            dsid: None,
            message,
        }
    }

    /// Request never produced a response
    pub fn network(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        MigrationError::Transport {
            url: url.into(),
            status: None,
            dsid: None,
            message: err.to_string(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        MigrationError::Parse {
            message: message.into(),
        }
    }

    /// Attach the datastream being processed to a transport error
    pub fn with_dsid(self, dsid: &str) -> Self {
        match self {
            MigrationError::Transport {
                url,
                status,
                dsid: None,
                message,
            } => MigrationError::Transport {
                url,
                status,
                dsid: Some(dsid.to_string()),
                message,
            },
            other => other,
        }
    }

    /// URL of the failing request, if this is a transport error
    pub fn url(&self) -> Option<&str> {
        match self {
            MigrationError::Transport { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MigrationError::Transport { status: Some(404), .. })
    }
}

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// API error type
///
/// Every failure of the migration endpoint has the same shape; the cause
/// is logged and kept in `AppState::last_error`, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Migration of a pid failed or the pid was unusable (400)
    #[error("Failed to migrate {0}")]
    MigrationFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::MigrationFailed(_) => (StatusCode::BAD_REQUEST, "MIGRATION_FAILED"),
        };
        let message = self.to_string();

        let body = Json(json!({
            "message": message,
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;
