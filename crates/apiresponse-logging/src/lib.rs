//! apiresponse-logging - Diagnostic sinks and tracing setup
//!
//! This crate provides:
//! - [`DiagnosticSink`] trait for external error reporting
//! - [`SinkLayer`] tracing layer that forwards events to the installed sink
//! - [`init_logging`] and [`ReloadHandle`] for process-wide setup and
//!   runtime level changes

mod layer;
mod reload;
mod sink;

pub use apiresponse_core::LogLevel;
pub use layer::{SinkLayer, init_logging, init_logging_from_config};
pub use reload::{ReloadError, ReloadHandle};
pub use sink::{DEFAULT_QUEUE_CAPACITY, DiagnosticSink, SinkError, SinkManager};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{DiagnosticSink, LogLevel, SinkLayer, SinkManager, init_logging};
}
