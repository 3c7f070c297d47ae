//! # apiresponse
//!
//! Uniform JSON response envelopes and exception handling for HTTP APIs.
//!
//! Every response, successful or not, has the same shape:
//!
//! ```json
//! {
//!   "success": false,
//!   "status": "fail",
//!   "code": 422,
//!   "message": "Validation failed",
//!   "errors": { "email": ["The email field is required."] },
//!   "error_type": "validation",
//!   "error_code": "ERR_VALIDATION_FAILED",
//!   "locale": "en"
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use apiresponse::prelude::*;
//! use axum::{Router, routing::get};
//!
//! async fn show_user() -> Result<ApiResponse, ErrorResponse> {
//!     let user = find_user().ok_or_else(|| ApiError::model_not_found("User"))?;
//!     Ok(ResponseFormatter::default().success(serde_json::to_value(user)?).build().into())
//! }
//!
//! let app = Router::new()
//!     .route("/users/me", get(show_user))
//!     .fallback(route_not_found);
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`apiresponse_core`] - Status tables, error taxonomy, configuration
//! - [`apiresponse_transport`] - Envelope, formatter, and JSON codec
//! - [`apiresponse_handler`] - Error classification and exception handling
//! - [`apiresponse_logging`] - Diagnostic sinks and tracing setup

mod http;

pub use http::{ApiResponse, ErrorResponse, method_not_allowed, route_not_found};

// Re-export core types
pub use apiresponse_core::{
    ApiError, ApiResult, CatalogTranslator, ConfigError, Environment, ErrorBag, ErrorCode,
    ErrorMessages, ErrorType, LocaleProvider, LogLevel, ResponseConfig, StaticLocale, StatusKind,
    Translator, status,
};

// Re-export envelope and formatter
pub use apiresponse_transport::{
    DebugInfo, EnvelopeBuilder, EnvelopeError, FormatOptions, JsonCodec, ResponseEnvelope,
    ResponseFormatter,
};

// Re-export exception handling
pub use apiresponse_handler::{Classification, ErrorOrigin, ExceptionClassifier, ExceptionHandler};

// Re-export logging setup
pub use apiresponse_logging::{
    DiagnosticSink, SinkError, SinkLayer, SinkManager, init_logging, init_logging_from_config,
};

// Re-export common dependencies that service authors need
pub use axum;
pub use serde_json;
pub use tracing;

/// Install the process-wide exception handler built from `config`
///
/// Returns `false` if a handler was already in place, including the default
/// one created by an earlier render.
pub fn install(config: ResponseConfig) -> bool {
    ExceptionHandler::install(ExceptionHandler::new(std::sync::Arc::new(config))).is_ok()
}

/// Prelude module for convenient imports.
///
/// Use `use apiresponse::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        ApiError, ApiResponse, ApiResult, ErrorBag, ErrorResponse, ExceptionHandler,
        ResponseConfig, ResponseFormatter, method_not_allowed, route_not_found,
    };
}
