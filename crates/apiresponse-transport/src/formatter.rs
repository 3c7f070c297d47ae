//! Envelope assembly

use crate::envelope::{DebugInfo, FailureParts, ResponseEnvelope};
use apiresponse_core::{
    ErrorBag, ErrorCode, ErrorType, LocaleProvider, MessageResolver, ResponseConfig, StaticLocale,
    StatusKind, Translator, status,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Message used by [`ResponseFormatter::maintenance`]
pub const MAINTENANCE_MESSAGE: &str = "Service under maintenance";

/// Optional inputs to [`ResponseFormatter::format`]
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Message; absent or blank resolves to the code's default
    pub message: Option<String>,

    /// Payload, kept only on 2xx responses
    pub data: Option<Value>,

    /// Field errors, kept only on failures
    pub errors: Option<ErrorBag>,

    /// Taxonomy label; failures default to the code-derived label
    pub error_type: Option<ErrorType>,

    /// Machine error code; failures default to the code-derived token
    pub error_code: Option<ErrorCode>,

    /// Auxiliary mapping such as pagination
    pub meta: Option<Map<String, Value>>,

    /// Locale tag; defaults to the active locale
    pub locale: Option<String>,

    /// Diagnostic side channel, kept only on failures
    pub debug: Option<DebugInfo>,
}

/// Builds [`ResponseEnvelope`]s from caller values and code-derived defaults
///
/// Formatting never fails. Unknown codes produce an `"error"` envelope with
/// the message `"Unknown status code"`.
#[derive(Clone)]
pub struct ResponseFormatter {
    resolver: MessageResolver,
    locale: Arc<dyn LocaleProvider>,
}

impl ResponseFormatter {
    /// Formatter using `config` for default messages and locale
    pub fn new(config: Arc<ResponseConfig>) -> Self {
        let locale = Arc::new(StaticLocale::new(config.default_locale.clone()));
        Self {
            resolver: MessageResolver::new(config),
            locale,
        }
    }

    /// Use `translator` to localize default messages
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.resolver = self.resolver.with_translator(translator);
        self
    }

    /// Use `provider` to determine the active locale
    pub fn with_locale_provider(mut self, provider: Arc<dyn LocaleProvider>) -> Self {
        self.locale = provider;
        self
    }

    pub fn config(&self) -> &ResponseConfig {
        self.resolver.config()
    }

    /// The locale envelopes get when the caller does not pick one
    pub fn current_locale(&self) -> String {
        self.locale.current_locale()
    }

    /// Default message for `code` in `locale`
    pub fn default_message(&self, code: u16, locale: &str) -> String {
        self.resolver.resolve(code, locale)
    }

    /// Assemble an envelope for `code`
    pub fn format(&self, code: u16, options: FormatOptions) -> ResponseEnvelope {
        let locale = options
            .locale
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.locale.current_locale());
        let message = options
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.resolver.resolve(code, &locale));
        let kind = StatusKind::from_code(code);

        tracing::trace!(code, status = %kind, "formatting response envelope");

        if kind == StatusKind::Success {
            let data = if status::is_bodyless(code) {
                None
            } else {
                Some(options.data.unwrap_or(Value::Null))
            };
            return ResponseEnvelope::success_parts(code, message, data, options.meta, locale);
        }

        let failure = FailureParts {
            errors: options.errors.unwrap_or_default(),
            error_type: options
                .error_type
                .unwrap_or_else(|| ErrorType::for_status(code)),
            error_code: options
                .error_code
                .unwrap_or_else(|| ErrorCode::for_status(code)),
            debug: options.debug,
        };
        ResponseEnvelope::failure_parts(code, message, failure, options.meta, locale)
    }

    /// Start a fluent envelope for `code`
    pub fn respond(&self, code: u16) -> EnvelopeBuilder<'_> {
        EnvelopeBuilder {
            formatter: self,
            code,
            options: FormatOptions::default(),
        }
    }

    /// 200 with `data`
    pub fn success(&self, data: Value) -> EnvelopeBuilder<'_> {
        self.respond(200).data(data)
    }

    /// 201 with `data`
    pub fn created(&self, data: Value) -> EnvelopeBuilder<'_> {
        self.respond(201).data(data)
    }

    /// 202 with `data`
    pub fn accepted(&self, data: Value) -> EnvelopeBuilder<'_> {
        self.respond(202).data(data)
    }

    pub fn no_content(&self) -> EnvelopeBuilder<'_> {
        self.respond(204)
    }

    pub fn bad_request(&self) -> EnvelopeBuilder<'_> {
        self.respond(400)
    }

    pub fn unauthorized(&self) -> EnvelopeBuilder<'_> {
        self.respond(401)
    }

    pub fn forbidden(&self) -> EnvelopeBuilder<'_> {
        self.respond(403)
    }

    pub fn not_found(&self) -> EnvelopeBuilder<'_> {
        self.respond(404)
    }

    pub fn conflict(&self) -> EnvelopeBuilder<'_> {
        self.respond(409)
    }

    /// 422 with field errors
    pub fn validation(&self, errors: ErrorBag) -> EnvelopeBuilder<'_> {
        self.respond(422).errors(errors)
    }

    pub fn too_many_requests(&self) -> EnvelopeBuilder<'_> {
        self.respond(429)
    }

    pub fn server_error(&self) -> EnvelopeBuilder<'_> {
        self.respond(500)
    }

    pub fn unavailable(&self) -> EnvelopeBuilder<'_> {
        self.respond(503)
    }

    /// 503 announcing planned maintenance
    pub fn maintenance(&self) -> EnvelopeBuilder<'_> {
        self.respond(503).message(MAINTENANCE_MESSAGE)
    }
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(Arc::new(ResponseConfig::default()))
    }
}

impl std::fmt::Debug for ResponseFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseFormatter")
            .field("resolver", &self.resolver)
            .field("locale", &self.locale.current_locale())
            .finish()
    }
}

/// Fluent front end for [`ResponseFormatter::format`]
#[derive(Debug)]
#[must_use = "call build() to produce the envelope"]
pub struct EnvelopeBuilder<'a> {
    formatter: &'a ResponseFormatter,
    code: u16,
    options: FormatOptions,
}

impl EnvelopeBuilder<'_> {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.options.message = Some(message.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.options.data = Some(data);
        self
    }

    /// Set data from a serializable value
    pub fn data_from<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.options.data = Some(serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn errors(mut self, errors: ErrorBag) -> Self {
        self.options.errors = Some(errors);
        self
    }

    /// Append one message to the error bag
    pub fn error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.options
            .errors
            .get_or_insert_with(ErrorBag::new)
            .add(field, message);
        self
    }

    pub fn error_type(mut self, error_type: ErrorType) -> Self {
        self.options.error_type = Some(error_type);
        self
    }

    pub fn error_code(mut self, error_code: ErrorCode) -> Self {
        self.options.error_code = Some(error_code);
        self
    }

    pub fn meta(mut self, meta: Map<String, Value>) -> Self {
        self.options.meta = Some(meta);
        self
    }

    /// Insert a single meta entry
    pub fn meta_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options
            .meta
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.options.locale = Some(locale.into());
        self
    }

    pub fn debug(mut self, debug: DebugInfo) -> Self {
        self.options.debug = Some(debug);
        self
    }

    pub fn build(self) -> ResponseEnvelope {
        self.formatter.format(self.code, self.options)
    }
}
