//! Mapping of errors to status codes, taxonomy labels and messages

use crate::database;
use crate::debug;
use apiresponse_core::{
    ApiError, ErrorBag, ErrorCode, ErrorType, MessageResolver, ResponseConfig, Translator,
};
use apiresponse_transport::DebugInfo;
use std::error::Error;
use std::panic::Location;
use std::sync::Arc;

/// Message for unclassified failures in production
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message for request bodies that failed to parse as JSON
pub const MALFORMED_JSON_MESSAGE: &str = "Malformed JSON payload";

/// Result of classifying an error
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub code: u16,
    pub error_type: ErrorType,
    pub error_code: ErrorCode,
    pub message: String,
    pub errors: ErrorBag,
    /// Present only outside production
    pub debug: Option<DebugInfo>,
}

impl Classification {
    /// Classification without errors or debug details
    pub fn new(
        code: u16,
        error_type: ErrorType,
        error_code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            error_type,
            error_code,
            message: message.into(),
            errors: ErrorBag::new(),
            debug: None,
        }
    }

    pub fn with_errors(mut self, errors: ErrorBag) -> Self {
        self.errors = errors;
        self
    }
}

/// Where a foreign error entered the handler
///
/// Carried into the debug payload outside production, since a
/// `dyn Error` no longer knows its concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorOrigin {
    pub type_name: &'static str,
    pub location: &'static Location<'static>,
}

impl ErrorOrigin {
    /// Origin for an error of type `E` raised at the caller's location
    #[track_caller]
    pub fn of<E: ?Sized + 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<E>(),
            location: Location::caller(),
        }
    }
}

type RuleFn = dyn Fn(&(dyn Error + 'static)) -> Option<Classification> + Send + Sync;

/// Caller-registered classification for a foreign error type
struct Rule {
    type_name: &'static str,
    matcher: Box<RuleFn>,
}

/// Classifies errors into [`Classification`]s
///
/// [`ApiError`] values are dispatched by variant. Other errors go through an
/// ordered rule list where the first match wins:
///
/// 1. an [`ApiError`] anywhere in the source chain
/// 2. rules registered with [`ExceptionClassifier::with_rule`], in order
/// 3. `serde_json::Error` as a malformed request
/// 4. the unclassified default (500, `ERR_UNKNOWN_ERROR`)
///
/// Classification never fails.
#[derive(Clone)]
pub struct ExceptionClassifier {
    resolver: MessageResolver,
    rules: Vec<Arc<Rule>>,
}

impl ExceptionClassifier {
    pub fn new(config: Arc<ResponseConfig>) -> Self {
        Self {
            resolver: MessageResolver::new(config),
            rules: Vec::new(),
        }
    }

    /// Register a classification for errors of type `E`
    ///
    /// Rules run after the built-in [`ApiError`] dispatch and before the
    /// default, in registration order.
    pub fn with_rule<E, F>(mut self, classify: F) -> Self
    where
        E: Error + 'static,
        F: Fn(&E) -> Classification + Send + Sync + 'static,
    {
        let matcher = move |error: &(dyn Error + 'static)| error.downcast_ref::<E>().map(&classify);
        self.rules.push(Arc::new(Rule {
            type_name: std::any::type_name::<E>(),
            matcher: Box::new(matcher),
        }));
        self
    }

    /// Translate default messages through `translator`
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.resolver = self.resolver.with_translator(translator);
        self
    }

    pub fn is_production(&self) -> bool {
        self.resolver.config().is_production()
    }

    /// Classify an [`ApiError`] by variant
    pub fn classify(&self, error: &ApiError) -> Classification {
        let mut classification = self.classify_variant(error);
        if !self.is_production() {
            classification.debug = Some(debug::for_api_error(error));
        }
        classification
    }

    /// Classify any error through the ordered rule list
    ///
    /// The concrete type is unknown here; prefer [`Self::classify_typed`]
    /// when the caller has it.
    #[track_caller]
    pub fn classify_error(&self, error: &(dyn Error + 'static)) -> Classification {
        self.classify_error_from(error, ErrorOrigin::of::<dyn Error>())
    }

    /// Classify an error of a known type, recording it and the call site
    #[track_caller]
    pub fn classify_typed<E: Error + 'static>(&self, error: &E) -> Classification {
        self.classify_error_from(error, ErrorOrigin::of::<E>())
    }

    /// Classify an error whose origin was captured where it was raised
    pub fn classify_error_from(
        &self,
        error: &(dyn Error + 'static),
        origin: ErrorOrigin,
    ) -> Classification {
        if let Some(api_error) = chain(error).find_map(|e| e.downcast_ref::<ApiError>()) {
            return self.classify(api_error);
        }

        for rule in &self.rules {
            if let Some((cause, mut classification)) =
                chain(error).find_map(|e| (rule.matcher)(e).map(|c| (e, c)))
            {
                classification.debug = (!self.is_production()).then(|| {
                    debug::for_foreign_error(rule.type_name, Some(origin.location), cause)
                });
                return classification;
            }
        }

        if let Some(cause) = chain(error).find(|e| e.is::<serde_json::Error>()) {
            let mut classification = Classification::new(
                400,
                ErrorType::ClientError,
                ErrorCode::BadRequest,
                MALFORMED_JSON_MESSAGE,
            )
            .with_errors(ErrorBag::single("request", "The request body is not valid JSON."));
            classification.debug = (!self.is_production()).then(|| {
                debug::for_foreign_error(
                    std::any::type_name::<serde_json::Error>(),
                    Some(origin.location),
                    cause,
                )
            });
            return classification;
        }

        let mut classification = self.unclassified(&error.to_string());
        classification.debug = (!self.is_production())
            .then(|| debug::for_foreign_error(origin.type_name, Some(origin.location), error));
        classification
    }

    fn classify_variant(&self, error: &ApiError) -> Classification {
        match error {
            ApiError::Authentication(detail) => Classification::new(
                401,
                ErrorType::Authorization,
                ErrorCode::AuthenticationFailed,
                "Unauthenticated.",
            )
            .with_errors(ErrorBag::single(
                "authentication",
                vec![or_default(
                    detail,
                    "Authentication is required to access this resource.",
                )],
            )),

            ApiError::AccessDenied(detail) => Classification::new(
                403,
                ErrorType::Authorization,
                ErrorCode::AccessDenied,
                "You do not have access to do that.",
            )
            .with_errors(ErrorBag::single(
                "permission",
                vec![or_default(
                    detail,
                    "You do not have the required permission to access this resource.",
                )],
            )),

            ApiError::Validation { message, errors } => {
                let message = if message.trim().is_empty() {
                    self.default_message(422)
                } else {
                    message.clone()
                };
                Classification::new(
                    422,
                    ErrorType::Validation,
                    ErrorCode::ValidationFailed,
                    message,
                )
                .with_errors(errors.clone())
            }

            ApiError::RateLimited { retry_after } => {
                let detail = match retry_after {
                    Some(seconds) => {
                        format!("Rate limit exceeded. Try again in {seconds} seconds.")
                    }
                    None => "Rate limit exceeded. Please try again later.".to_string(),
                };
                Classification::new(
                    429,
                    ErrorType::ClientError,
                    ErrorCode::RateLimitExceeded,
                    "Too many requests.",
                )
                .with_errors(ErrorBag::single("rate_limit", vec![detail]))
            }

            ApiError::RouteNotFound { .. } => Classification::new(
                404,
                ErrorType::ClientError,
                ErrorCode::RouteNotFound,
                "The requested route could not be found.",
            )
            .with_errors(ErrorBag::single(
                "route",
                vec!["The route you are looking for does not exist.".to_string()],
            )),

            ApiError::ResourceNotFound(detail) => Classification::new(
                404,
                ErrorType::ClientError,
                ErrorCode::ResourceNotFound,
                "The requested resource was not found.",
            )
            .with_errors(ErrorBag::single(
                "resource",
                vec![or_default(
                    detail,
                    "The resource you are looking for could not be found.",
                )],
            )),

            ApiError::ModelNotFound { model, ids } => {
                let detail = if ids.is_empty() {
                    format!("No query results for model [{model}].")
                } else {
                    format!("No query results for model [{model}] {}.", ids.join(", "))
                };
                Classification::new(
                    404,
                    ErrorType::ClientError,
                    ErrorCode::ModelNotFound,
                    "The requested resource was not found.",
                )
                .with_errors(ErrorBag::single("resource", vec![detail]))
            }

            ApiError::MethodNotAllowed { method, allowed } => {
                let mut detail = format!("The {method} method is not supported for this route.");
                if !allowed.is_empty() {
                    detail.push_str(&format!(" Supported methods: {}.", allowed.join(", ")));
                }
                Classification::new(
                    405,
                    ErrorType::ClientError,
                    ErrorCode::MethodNotAllowed,
                    "The specified method for the request is invalid.",
                )
                .with_errors(ErrorBag::single("method", vec![detail]))
            }

            ApiError::BadRequest(detail) => with_detail(
                Classification::new(
                    400,
                    ErrorType::ClientError,
                    ErrorCode::BadRequest,
                    self.default_message(400),
                ),
                "request",
                detail,
            ),

            ApiError::Conflict(detail) => with_detail(
                Classification::new(
                    409,
                    ErrorType::ClientError,
                    ErrorCode::Conflict,
                    self.default_message(409),
                ),
                "conflict",
                detail,
            ),

            ApiError::ServiceUnavailable(detail) => with_detail(
                Classification::new(
                    503,
                    ErrorType::ServerError,
                    ErrorCode::ServiceUnavailable,
                    self.default_message(503),
                ),
                "service",
                detail,
            ),

            ApiError::Database(raw) => Classification::new(
                500,
                ErrorType::ServerError,
                ErrorCode::DatabaseQueryException,
                database::DATABASE_ERROR_MESSAGE,
            )
            .with_errors(ErrorBag::single("database", database::sanitize(raw))),

            ApiError::Http { status, message } => {
                // Only error statuses pass through; anything else would
                // format as a success envelope.
                let code = if (400..=599).contains(status) {
                    *status
                } else {
                    500
                };
                let message = if message.trim().is_empty() {
                    self.default_message(code)
                } else {
                    message.clone()
                };
                Classification::new(
                    code,
                    ErrorType::ServerError,
                    ErrorCode::UnknownHttpException,
                    message,
                )
            }

            ApiError::Unhandled(inner) => self.unclassified(inner.message()),
        }
    }

    fn unclassified(&self, raw_message: &str) -> Classification {
        let message = if self.is_production() || raw_message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            raw_message.to_string()
        };
        Classification::new(500, ErrorType::ServerError, ErrorCode::UnknownError, message)
    }

    fn default_message(&self, code: u16) -> String {
        self.resolver
            .resolve(code, &self.resolver.config().default_locale)
    }
}

impl Default for ExceptionClassifier {
    fn default() -> Self {
        Self::new(Arc::new(ResponseConfig::default()))
    }
}

impl std::fmt::Debug for ExceptionClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rules: Vec<&str> = self.rules.iter().map(|r| r.type_name).collect();
        f.debug_struct("ExceptionClassifier")
            .field("production", &self.is_production())
            .field("rules", &rules)
            .finish()
    }
}

fn chain<'a>(
    error: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> + 'a {
    std::iter::successors(Some(error), |&e| e.source())
}

fn with_detail(classification: Classification, field: &str, detail: &str) -> Classification {
    if detail.trim().is_empty() {
        return classification;
    }
    classification.with_errors(ErrorBag::single(field, vec![detail.to_string()]))
}

fn or_default(detail: &str, fallback: &str) -> String {
    if detail.trim().is_empty() {
        fallback.to_string()
    } else {
        detail.to_string()
    }
}

#[cfg(test)]
#[path = "classifier/classifier_tests.rs"]
mod classifier_tests;
