//! Response configuration

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Operating mode of the host application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
    Local,
    Testing,
}

impl Environment {
    /// Production hides debug details and raw error text
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Default messages shipped with the crate, keyed by snake_case status name
pub const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("success", "Request was successful"),
    ("created_success", "Resource created successfully"),
    ("bad_request", "Invalid request"),
    ("unauthorized", "Authentication required"),
    ("forbidden", "Permission denied"),
    ("not_found", "Resource not found"),
    ("internal_server_error", "An unexpected error occurred"),
    ("service_unavailable", "Service temporarily unavailable"),
    ("validation_failed", "Validation failed"),
    ("conflict", "Conflict detected"),
    ("rate_limit_exceeded", "Rate limit exceeded"),
];

/// Configuration consumed by the formatter and the exception handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Locale stamped on envelopes when no locale provider overrides it
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Default messages keyed by snake_case status name
    ///
    /// Entries supplied by the user are merged over [`DEFAULT_MESSAGES`], so a
    /// partial map only overrides the keys it names. Numeric keys (`"418"`)
    /// are honored for codes without a named key.
    #[serde(
        default = "default_messages",
        deserialize_with = "merge_with_default_messages"
    )]
    pub messages: BTreeMap<String, String>,

    /// Operating mode
    #[serde(default)]
    pub environment: Environment,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_messages() -> BTreeMap<String, String> {
    DEFAULT_MESSAGES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn merge_with_default_messages<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut messages = default_messages();
    messages.extend(overrides);
    Ok(messages)
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            messages: default_messages(),
            environment: Environment::default(),
            log_level: default_log_level(),
        }
    }
}

impl ResponseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Create configuration from a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(source)?)
    }

    /// The full message mapping
    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    /// Look up a configured message, ignoring empty overrides
    pub fn message(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Override a single message
    pub fn set_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    pub fn with_message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.set_message(key, message);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
