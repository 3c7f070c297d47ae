//! Error types surfaced to API clients

use crate::error_bag::ErrorBag;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::Location;
use thiserror::Error;

/// Result type alias for request handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure raised by request handling code
///
/// Each variant corresponds to one row of the classification table; the
/// classifier turns it into a status code, taxonomy label and error code
/// without inspecting anything but the variant.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller could not be authenticated
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Caller is authenticated but lacks permission
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Input failed validation
    #[error("{message}")]
    Validation { message: String, errors: ErrorBag },

    /// Caller exceeded a rate limit
    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    /// No route matches the request path
    #[error("route not found: {path}")]
    RouteNotFound { path: String },

    /// Generic missing resource
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// A model lookup returned no rows
    #[error("no query results for model {model}")]
    ModelNotFound { model: String, ids: Vec<String> },

    /// Route exists but not for this method
    #[error("method {method} not allowed")]
    MethodNotAllowed { method: String, allowed: Vec<String> },

    /// Malformed request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with current state
    #[error("conflict: {0}")]
    Conflict(String),

    /// Dependency or service temporarily down
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Storage or query failure; carries the raw driver text
    #[error("database error: {0}")]
    Database(String),

    /// HTTP failure with an explicit status code
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Anything else
    #[error(transparent)]
    Unhandled(Unhandled),
}

impl ApiError {
    /// Validation failure with the default message
    pub fn validation(errors: ErrorBag) -> Self {
        ApiError::Validation {
            message: String::new(),
            errors,
        }
    }

    /// Validation failure with a custom message
    pub fn validation_with_message(message: impl Into<String>, errors: ErrorBag) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors,
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn model_not_found(model: impl Into<String>) -> Self {
        ApiError::ModelNotFound {
            model: model.into(),
            ids: Vec::new(),
        }
    }

    /// Wrap an arbitrary error, recording where it was wrapped
    #[track_caller]
    pub fn unhandled<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Unhandled(Unhandled::new(
            std::any::type_name::<E>(),
            error.to_string(),
            Some(Box::new(error)),
        ))
    }

    /// Unclassified failure described only by a message
    #[track_caller]
    pub fn unhandled_message(message: impl Into<String>) -> Self {
        ApiError::Unhandled(Unhandled::new("ApiError::Unhandled", message.into(), None))
    }

    /// Name used for this error in debug output
    pub fn type_name(&self) -> &'static str {
        match self {
            ApiError::Authentication(_) => "ApiError::Authentication",
            ApiError::AccessDenied(_) => "ApiError::AccessDenied",
            ApiError::Validation { .. } => "ApiError::Validation",
            ApiError::RateLimited { .. } => "ApiError::RateLimited",
            ApiError::RouteNotFound { .. } => "ApiError::RouteNotFound",
            ApiError::ResourceNotFound(_) => "ApiError::ResourceNotFound",
            ApiError::ModelNotFound { .. } => "ApiError::ModelNotFound",
            ApiError::MethodNotAllowed { .. } => "ApiError::MethodNotAllowed",
            ApiError::BadRequest(_) => "ApiError::BadRequest",
            ApiError::Conflict(_) => "ApiError::Conflict",
            ApiError::ServiceUnavailable(_) => "ApiError::ServiceUnavailable",
            ApiError::Database(_) => "ApiError::Database",
            ApiError::Http { .. } => "ApiError::Http",
            ApiError::Unhandled(inner) => inner.type_name(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    #[track_caller]
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<ApiError>() {
            Ok(api_error) => api_error,
            Err(error) => ApiError::Unhandled(Unhandled::new(
                "anyhow::Error",
                error.to_string(),
                Some(error.into()),
            )),
        }
    }
}

/// An error that matched no classification rule
#[derive(Debug)]
pub struct Unhandled {
    type_name: &'static str,
    message: String,
    location: &'static Location<'static>,
    backtrace: Backtrace,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Unhandled {
    #[track_caller]
    fn new(
        type_name: &'static str,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            type_name,
            message,
            location: Location::caller(),
            backtrace: Backtrace::capture(),
            source,
        }
    }

    /// Type name of the wrapped error
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location where the error was wrapped
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Backtrace frames, empty unless `RUST_BACKTRACE` enabled capture
    pub fn trace(&self) -> Vec<String> {
        if self.backtrace.status() != BacktraceStatus::Captured {
            return Vec::new();
        }
        self.backtrace
            .to_string()
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl std::fmt::Display for Unhandled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Unhandled {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
