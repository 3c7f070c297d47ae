//! Error-to-envelope pipeline

use crate::classifier::{Classification, ErrorOrigin, ExceptionClassifier};
use apiresponse_core::{ApiError, ResponseConfig, Translator};
use apiresponse_transport::{FormatOptions, ResponseEnvelope, ResponseFormatter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::sync::Arc;

static GLOBAL_HANDLER: OnceCell<ExceptionHandler> = OnceCell::new();

/// Turns errors into failure envelopes
///
/// Each call classifies the error exactly once, formats the classification,
/// and outside production emits one diagnostic `tracing` event.
#[derive(Debug, Clone)]
pub struct ExceptionHandler {
    formatter: ResponseFormatter,
    classifier: ExceptionClassifier,
}

impl ExceptionHandler {
    pub fn new(config: Arc<ResponseConfig>) -> Self {
        Self {
            formatter: ResponseFormatter::new(config.clone()),
            classifier: ExceptionClassifier::new(config),
        }
    }

    /// Handler built from preconfigured parts
    pub fn from_parts(formatter: ResponseFormatter, classifier: ExceptionClassifier) -> Self {
        Self {
            formatter,
            classifier,
        }
    }

    /// Localize messages of both the formatter and the classifier
    pub fn with_translator(self, translator: Arc<dyn Translator>) -> Self {
        Self {
            formatter: self.formatter.with_translator(translator.clone()),
            classifier: self.classifier.with_translator(translator),
        }
    }

    /// Get the process-wide handler, creating a default one if none was installed
    pub fn global() -> &'static ExceptionHandler {
        GLOBAL_HANDLER.get_or_init(ExceptionHandler::default)
    }

    /// Install the process-wide handler
    ///
    /// Returns the handler back if one is already in place.
    pub fn install(handler: ExceptionHandler) -> Result<(), ExceptionHandler> {
        GLOBAL_HANDLER.set(handler)
    }

    pub fn formatter(&self) -> &ResponseFormatter {
        &self.formatter
    }

    pub fn classifier(&self) -> &ExceptionClassifier {
        &self.classifier
    }

    /// Envelope for an [`ApiError`]
    pub fn handle(&self, error: &ApiError) -> ResponseEnvelope {
        self.render(self.classifier.classify(error))
    }

    /// Envelope for any error, including ones wrapping an [`ApiError`]
    #[track_caller]
    pub fn handle_error(&self, error: &(dyn Error + 'static)) -> ResponseEnvelope {
        self.render(self.classifier.classify_error(error))
    }

    /// Envelope for an error of a known type
    #[track_caller]
    pub fn handle_typed<E: Error + 'static>(&self, error: &E) -> ResponseEnvelope {
        self.render(self.classifier.classify_typed(error))
    }

    /// Envelope for an error whose origin was captured where it was raised
    pub fn handle_error_from(
        &self,
        error: &(dyn Error + 'static),
        origin: ErrorOrigin,
    ) -> ResponseEnvelope {
        self.render(self.classifier.classify_error_from(error, origin))
    }

    /// Format a classification into an envelope
    pub fn render(&self, classification: Classification) -> ResponseEnvelope {
        if !self.classifier.is_production() {
            report(&classification);
        }

        self.formatter.format(
            classification.code,
            FormatOptions {
                message: Some(classification.message),
                errors: Some(classification.errors),
                error_type: Some(classification.error_type),
                error_code: Some(classification.error_code),
                debug: classification.debug,
                ..FormatOptions::default()
            },
        )
    }
}

impl Default for ExceptionHandler {
    fn default() -> Self {
        Self::new(Arc::new(ResponseConfig::default()))
    }
}

fn report(classification: &Classification) {
    let debug_payload = classification
        .debug
        .as_ref()
        .and_then(|d| serde_json::to_string(d).ok())
        .unwrap_or_default();

    tracing::error!(
        target: "apiresponse::exception",
        error_type = %classification.error_type,
        error_code = %classification.error_code,
        code = classification.code,
        debug = %debug_payload,
        "{}",
        classification.message
    );
}
