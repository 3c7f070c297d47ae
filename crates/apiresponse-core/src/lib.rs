//! apiresponse-core - Status tables, error taxonomy, and configuration
//!
//! This crate provides the foundational types shared by the formatter and
//! the exception handler:
//! - [`StatusKind`] and the per-code message tables in [`status`]
//! - [`ErrorType`] and [`ErrorCode`] for failure taxonomy
//! - [`ApiError`] for classifiable failures
//! - [`ResponseConfig`] for user-overridable messages and operating mode
//! - [`LocaleProvider`] and [`Translator`] collaborator traits

mod config;
mod error;
mod error_bag;
mod locale;
mod message;
pub mod status;
mod taxonomy;

pub use config::{ConfigError, DEFAULT_MESSAGES, Environment, ResponseConfig};
pub use error::{ApiError, ApiResult, Unhandled};
pub use error_bag::{ErrorBag, ErrorMessages};
pub use locale::{CatalogTranslator, LocaleProvider, NoTranslations, StaticLocale, Translator};
pub use message::{MessageResolver, TRANSLATION_PREFIX};
pub use status::StatusKind;
pub use taxonomy::{ErrorCode, ErrorType};

/// Log levels for diagnostic output
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Parse a level name as found in configuration, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ApiError, ApiResult, Environment, ErrorBag, ErrorCode, ErrorMessages, ErrorType,
        LocaleProvider, LogLevel, ResponseConfig, StatusKind, Translator,
    };
}
