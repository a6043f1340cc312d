//! # Error Handling
//!
//! Every fallible operation in the engine returns [`DatatableError`]. Errors are
//! raised synchronously and never recovered from internally: a failed call yields
//! no [`ProcessedResult`](crate::providers::ProcessedResult).
//!
//! Configuration mistakes (empty or duplicate column names, bad builder input) are
//! caught at build time, query mistakes (unknown columns, malformed protocol
//! parameters) when a request is parsed or prepared.
//!
//! ## HTTP adapters
//!
//! `DatatableError` implements axum's `IntoResponse`, so a handler can return it
//! directly. Server-side faults are logged through `tracing` and rendered with a
//! generic message; client faults are rendered as-is.
//!
//! ```rust,ignore
//! async fn users(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, DatatableError> {
//!     let engine = VersionEngine::for_request(RequestParams::from(params));
//!     let mut service = DatatableService::new(provider(), columns()?, engine)?;
//!     Ok(Json(service.handle_request()?))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while configuring or running a datatable query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatatableError {
    /// Invalid column or query configuration (empty/duplicate names, bad builder input)
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the offending setting
        message: String,
    },

    /// A query references a column that is not part of the column configuration
    #[error("unknown column '{column}'")]
    UnknownColumn {
        /// Name of the missing column
        column: String,
    },

    /// An operation was invoked out of order, e.g. `process()` before preparation
    #[error("invalid state: {message}")]
    InvalidState {
        /// What was attempted
        message: String,
    },

    /// The version engine was queried without an active protocol version
    #[error("no datatable version is configured for this request")]
    NoActiveVersion,

    /// The raw request could not be parsed by the active protocol version
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Which parameter was malformed and why
        message: String,
    },
}

/// Result type for datatable operations.
pub type Result<T> = std::result::Result<T, DatatableError>;

impl DatatableError {
    // ============================================================================
    // Constructors
    // ============================================================================

    /// Create a configuration error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(DatatableError::configuration("column name must not be empty"));
    /// ```
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown column error
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(DatatableError::invalid_request("parameter 'start' must be a number"));
    /// ```
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    // ============================================================================
    // HTTP mapping
    // ============================================================================

    /// HTTP status code an adapter should answer with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownColumn { .. } | Self::NoActiveVersion | Self::InvalidRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Configuration { .. } | Self::InvalidState { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the fault lies with the server rather than the client request
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message safe to send to the client
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration { .. } | Self::InvalidState { .. } => {
                "The datatable could not be processed".to_string()
            }
            Self::NoActiveVersion => "Unsupported datatable request".to_string(),
            _ => self.to_string(),
        }
    }

    /// Log error details (server errors at error level, client errors at debug)
    fn log_internal(&self) {
        if self.is_server_error() {
            tracing::error!(error = %self, "Datatable processing failed");
        } else {
            tracing::debug!(
                error = %self,
                status = %self.status_code(),
                "Rejected datatable request"
            );
        }
    }
}

/// Error body sent to clients
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for DatatableError {
    fn into_response(self) -> Response {
        self.log_internal();

        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<serde::de::value::Error> for DatatableError {
    fn from(err: serde::de::value::Error) -> Self {
        Self::invalid_request(err.to_string())
    }
}

impl From<serde_json::Error> for DatatableError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_state(format!("failed to serialize response: {err}"))
    }
}
