//! Tracing layer that forwards events to the diagnostic sink

use crate::reload::{ReloadHandle, convert_level_to_filter};
use crate::sink::SinkManager;
use apiresponse_core::{LogLevel, ResponseConfig};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that forwards events to a [`SinkManager`]
///
/// The event's `message` becomes the record message; every other field is
/// collected into the JSON context together with `target` and `level`.
pub struct SinkLayer {
    manager: &'static SinkManager,
}

impl SinkLayer {
    /// Layer writing to the global sink manager
    pub fn new() -> Self {
        Self {
            manager: SinkManager::global(),
        }
    }

    pub fn with_manager(manager: &'static SinkManager) -> Self {
        Self { manager }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for SinkLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());

        if !self.manager.is_enabled(level) {
            return;
        }

        let mut visitor = ContextVisitor::default();
        event.record(&mut visitor);

        let mut context = visitor.fields;
        context.insert("target".into(), Value::from(metadata.target()));
        context.insert("level".into(), Value::from(level.to_string()));

        self.manager.record(
            level,
            &visitor.message.unwrap_or_default(),
            &Value::Object(context),
        );
    }
}

/// Collects event fields into a JSON map
#[derive(Default)]
struct ContextVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl ContextVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for ContextVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, text_value(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, text_value(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

// JSON objects logged as text are kept structured.
fn text_value(text: String) -> Value {
    if text.starts_with('{')
        && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&text)
    {
        return value;
    }
    Value::String(text)
}

/// Initialize process-wide logging
///
/// Installs a registry with a reloadable level filter, a `fmt` layer and a
/// [`SinkLayer`]. Only the first call takes effect; later calls still update
/// the level through [`ReloadHandle`].
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::reload;

    let (filter, handle) = reload::Layer::new(convert_level_to_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(SinkLayer::new());

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        ReloadHandle::global().set_handle(handle);
    } else {
        apply_level(ReloadHandle::global(), level);
    }
}

// Logging is already set up; only the level can change.
fn apply_level(handle: &ReloadHandle, level: LogLevel) {
    if let Err(e) = handle.reload_level(level) {
        tracing::warn!(
            error = %e,
            requested_level = %level,
            "failed to update log level after re-initialization"
        );
    }
}

/// Initialize logging from the `log_level` setting
///
/// Unrecognized names fall back to `info`.
pub fn init_logging_from_config(config: &ResponseConfig) {
    let level = LogLevel::parse(&config.log_level).unwrap_or(LogLevel::Info);
    init_logging(level);
}
