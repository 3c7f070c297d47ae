//! apiresponse-handler - Error classification and exception handling
//!
//! This crate provides:
//! - [`ExceptionClassifier`] for mapping errors to status codes and taxonomy
//! - [`ExceptionHandler`] for turning errors into failure envelopes
//! - [`sanitize`] for client-safe database error messages

mod classifier;
mod database;
mod debug;
mod handler;

pub use classifier::{
    Classification, ErrorOrigin, ExceptionClassifier, GENERIC_ERROR_MESSAGE, MALFORMED_JSON_MESSAGE,
};
pub use database::{
    DATABASE_ERROR_MESSAGE, GENERIC_DATABASE_MESSAGE, match_driver_message, sanitize,
};
pub use handler::ExceptionHandler;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Classification, ExceptionClassifier, ExceptionHandler};
}
