#![allow(non_snake_case)]

use super::*;
use apiresponse_core::{CatalogTranslator, Environment};
use test_case::test_case;

fn production() -> ExceptionClassifier {
    ExceptionClassifier::default()
}

fn development() -> ExceptionClassifier {
    ExceptionClassifier::new(Arc::new(
        ResponseConfig::default().with_environment(Environment::Development),
    ))
}

#[derive(Debug, thiserror::Error)]
#[error("upstream timed out after {0}ms")]
struct UpstreamTimeout(u64);

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct Wrapper(#[source] Box<dyn Error + Send + Sync>);

// ApiError dispatch

#[test_case(ApiError::Authentication(String::new()), 401, ErrorType::Authorization, ErrorCode::AuthenticationFailed; "authentication")]
#[test_case(ApiError::AccessDenied(String::new()), 403, ErrorType::Authorization, ErrorCode::AccessDenied; "access denied")]
#[test_case(ApiError::validation(ErrorBag::new()), 422, ErrorType::Validation, ErrorCode::ValidationFailed; "validation")]
#[test_case(ApiError::RateLimited { retry_after: None }, 429, ErrorType::ClientError, ErrorCode::RateLimitExceeded; "rate limited")]
#[test_case(ApiError::RouteNotFound { path: "/nope".into() }, 404, ErrorType::ClientError, ErrorCode::RouteNotFound; "route")]
#[test_case(ApiError::ResourceNotFound(String::new()), 404, ErrorType::ClientError, ErrorCode::ResourceNotFound; "resource")]
#[test_case(ApiError::model_not_found("User"), 404, ErrorType::ClientError, ErrorCode::ModelNotFound; "model")]
#[test_case(ApiError::MethodNotAllowed { method: "PATCH".into(), allowed: vec![] }, 405, ErrorType::ClientError, ErrorCode::MethodNotAllowed; "method")]
#[test_case(ApiError::BadRequest(String::new()), 400, ErrorType::ClientError, ErrorCode::BadRequest; "bad request")]
#[test_case(ApiError::Conflict(String::new()), 409, ErrorType::ClientError, ErrorCode::Conflict; "conflict")]
#[test_case(ApiError::ServiceUnavailable(String::new()), 503, ErrorType::ServerError, ErrorCode::ServiceUnavailable; "unavailable")]
#[test_case(ApiError::Database("boom".into()), 500, ErrorType::ServerError, ErrorCode::DatabaseQueryException; "database")]
#[test_case(ApiError::http(502, "bad gateway"), 502, ErrorType::ServerError, ErrorCode::UnknownHttpException; "http")]
#[test_case(ApiError::unhandled_message("kaput"), 500, ErrorType::ServerError, ErrorCode::UnknownError; "unhandled")]
fn ExceptionClassifier___classify___maps_variant_to_row(
    error: ApiError,
    code: u16,
    error_type: ErrorType,
    error_code: ErrorCode,
) {
    let classification = production().classify(&error);

    assert_eq!(classification.code, code);
    assert_eq!(classification.error_type, error_type);
    assert_eq!(classification.error_code, error_code);
    assert!(!classification.message.is_empty());
}

#[test]
fn ExceptionClassifier___classify___validation_mirrors_errors() {
    let errors = ErrorBag::new()
        .with("email", "The email field is required.")
        .with("email", "The email must be valid.")
        .with("name", "The name field is required.");

    let classification = production().classify(&ApiError::validation(errors.clone()));

    assert_eq!(classification.code, 422);
    assert_eq!(classification.message, "Validation failed");
    assert_eq!(classification.errors, errors);
}

#[test]
fn ExceptionClassifier___classify___validation_keeps_custom_message() {
    let error = ApiError::validation_with_message(
        "The given data was invalid.",
        ErrorBag::single("title", "Too short."),
    );

    let classification = production().classify(&error);

    assert_eq!(classification.message, "The given data was invalid.");
}

#[test]
fn ExceptionClassifier___classify___authentication_uses_canned_text() {
    let classification = production().classify(&ApiError::Authentication(String::new()));

    assert_eq!(classification.message, "Unauthenticated.");
    let detail: Vec<&str> = classification.errors.get("authentication").unwrap().iter().collect();
    assert_eq!(detail, vec!["Authentication is required to access this resource."]);
}

#[test]
fn ExceptionClassifier___classify___access_denied_keeps_detail() {
    let classification =
        production().classify(&ApiError::AccessDenied("Admins only.".to_string()));

    let detail: Vec<&str> = classification.errors.get("permission").unwrap().iter().collect();
    assert_eq!(detail, vec!["Admins only."]);
}

#[test]
fn ExceptionClassifier___classify___rate_limit_reports_retry_after() {
    let classification = production().classify(&ApiError::RateLimited {
        retry_after: Some(30),
    });

    let detail: Vec<&str> = classification.errors.get("rate_limit").unwrap().iter().collect();
    assert_eq!(detail, vec!["Rate limit exceeded. Try again in 30 seconds."]);
}

#[test]
fn ExceptionClassifier___classify___model_not_found_lists_ids() {
    let error = ApiError::ModelNotFound {
        model: "Post".to_string(),
        ids: vec!["7".to_string(), "9".to_string()],
    };

    let classification = production().classify(&error);

    let detail: Vec<&str> = classification.errors.get("resource").unwrap().iter().collect();
    assert_eq!(detail, vec!["No query results for model [Post] 7, 9."]);
}

#[test]
fn ExceptionClassifier___classify___method_not_allowed_lists_supported() {
    let error = ApiError::MethodNotAllowed {
        method: "DELETE".to_string(),
        allowed: vec!["GET".to_string(), "HEAD".to_string()],
    };

    let classification = production().classify(&error);

    let detail: Vec<&str> = classification.errors.get("method").unwrap().iter().collect();
    assert_eq!(
        detail,
        vec!["The DELETE method is not supported for this route. Supported methods: GET, HEAD."]
    );
}

#[test]
fn ExceptionClassifier___classify___bad_request_without_detail_has_no_errors() {
    let classification = production().classify(&ApiError::BadRequest(String::new()));

    assert_eq!(classification.message, "Invalid request");
    assert!(classification.errors.is_empty());
}

#[test]
fn ExceptionClassifier___classify___duplicate_entry_is_sanitized() {
    let classification = production().classify(&ApiError::Database(
        "Duplicate entry for key".to_string(),
    ));

    assert_eq!(classification.message, "Database Error");
    assert_eq!(classification.error_code, ErrorCode::DatabaseQueryException);
    let detail: Vec<&str> = classification.errors.get("database").unwrap().iter().collect();
    assert_eq!(detail, vec!["Duplicate entry found."]);
}

#[test]
fn ExceptionClassifier___classify___database_never_leaks_driver_text() {
    let raw = "SQLSTATE[42S02]: Table 'shop.secret_orders' doesn't exist";

    let classification = development().classify(&ApiError::Database(raw.to_string()));

    let detail: Vec<&str> = classification.errors.get("database").unwrap().iter().collect();
    assert!(detail.iter().all(|d| !d.contains("secret_orders")));
    assert!(!classification.message.contains("secret_orders"));
}

#[test]
fn ExceptionClassifier___classify___http_without_message_uses_status_default() {
    let classification = production().classify(&ApiError::http(503, ""));

    assert_eq!(classification.code, 503);
    assert_eq!(classification.message, "Service temporarily unavailable");
}

#[test_case(200; "ok")]
#[test_case(101; "switching protocols")]
#[test_case(302; "redirect")]
#[test_case(999; "unregistered")]
fn ExceptionClassifier___classify___http_non_error_status_becomes_500(status: u16) {
    let classification = production().classify(&ApiError::http(status, "boom"));

    assert_eq!(classification.code, 500);
    assert_eq!(classification.error_type, ErrorType::ServerError);
    assert_eq!(classification.error_code, ErrorCode::UnknownHttpException);
    assert_eq!(classification.message, "boom");
}

#[test]
fn ExceptionClassifier___classify___http_non_error_status_without_message_uses_500_default() {
    let classification = production().classify(&ApiError::http(204, ""));
    let server_error = production().classify(&ApiError::http(500, ""));

    assert_eq!(classification.code, 500);
    assert_eq!(classification.message, server_error.message);
}

#[test]
fn ExceptionClassifier___classify___configured_message_overrides_default() {
    let config = ResponseConfig::default().with_message("not_found", "Nothing here");
    let classifier = ExceptionClassifier::new(Arc::new(config));

    let classification = classifier.classify(&ApiError::http(404, ""));

    assert_eq!(classification.message, "Nothing here");
}

#[test]
fn ExceptionClassifier___classify___translator_overrides_config() {
    let translator = CatalogTranslator::new().with(
        "en",
        "api-response.messages.validation_failed",
        "Invalid input",
    );
    let classifier = production().with_translator(Arc::new(translator));

    let classification = classifier.classify(&ApiError::validation(ErrorBag::new()));

    assert_eq!(classification.message, "Invalid input");
}

// Production vs development

#[test]
fn ExceptionClassifier___classify___unhandled_in_production_is_generic() {
    let classification = production().classify(&ApiError::unhandled_message("db password is hunter2"));

    assert_eq!(classification.message, GENERIC_ERROR_MESSAGE);
    assert!(classification.debug.is_none());
}

#[test]
fn ExceptionClassifier___classify___unhandled_in_development_keeps_message() {
    let classification = development().classify(&ApiError::unhandled_message("cache miss storm"));

    assert_eq!(classification.message, "cache miss storm");
    let debug = classification.debug.unwrap();
    assert_eq!(debug.message, "cache miss storm");
    assert!(debug.file.is_some());
    assert!(debug.line.is_some());
}

#[test]
fn ExceptionClassifier___classify___debug_absent_in_production_for_every_variant() {
    let errors = [
        ApiError::Authentication(String::new()),
        ApiError::validation(ErrorBag::single("a", "b")),
        ApiError::Database("Duplicate entry".to_string()),
        ApiError::http(418, "teapot"),
    ];

    for error in &errors {
        assert!(production().classify(error).debug.is_none());
    }
}

#[test]
fn ExceptionClassifier___classify___debug_names_variant_in_development() {
    let classification = development().classify(&ApiError::Conflict("taken".to_string()));

    let debug = classification.debug.unwrap();
    assert_eq!(debug.exception, "ApiError::Conflict");
    assert_eq!(debug.message, "conflict: taken");
}

// Foreign errors

#[test]
fn ExceptionClassifier___classify_error___unknown_error_is_generic_500() {
    let error = std::io::Error::other("disk on fire");

    let classification = production().classify_error(&error);

    assert_eq!(classification.code, 500);
    assert_eq!(classification.error_type, ErrorType::ServerError);
    assert_eq!(classification.error_code, ErrorCode::UnknownError);
    assert_eq!(classification.message, "An unexpected error occurred");
}

#[test]
fn ExceptionClassifier___classify_error___unknown_error_in_development_keeps_text() {
    let error = std::io::Error::other("disk on fire");

    let classification = development().classify_error(&error);

    assert_eq!(classification.message, "disk on fire");
    assert!(classification.debug.is_some());
}

#[test]
fn ExceptionClassifier___classify_typed___debug_names_concrete_type_and_call_site() {
    let error = std::io::Error::other("disk on fire");

    let line = line!() + 1;
    let classification = development().classify_typed(&error);

    let debug = classification.debug.unwrap();
    assert!(debug.exception.starts_with("std::io::"), "{}", debug.exception);
    assert_eq!(debug.file.as_deref(), Some(file!()));
    assert_eq!(debug.line, Some(line));
}

#[test]
fn ExceptionClassifier___classify_typed___production_has_no_debug() {
    let classification = production().classify_typed(&std::io::Error::other("disk on fire"));

    assert!(classification.debug.is_none());
    assert_eq!(classification.message, GENERIC_ERROR_MESSAGE);
}

#[test]
fn ExceptionClassifier___classify_error___debug_records_call_site() {
    let error = std::io::Error::other("disk on fire");

    let classification = development().classify_error(&error);

    let debug = classification.debug.unwrap();
    assert_eq!(debug.file.as_deref(), Some(file!()));
    assert!(debug.line.is_some());
}

#[test]
fn ExceptionClassifier___classify_error_from___uses_captured_origin() {
    let origin = ErrorOrigin::of::<UpstreamTimeout>();

    let classification = development().classify_error_from(&UpstreamTimeout(10), origin);

    let debug = classification.debug.unwrap();
    assert_eq!(debug.exception, std::any::type_name::<UpstreamTimeout>());
    assert_eq!(debug.file.as_deref(), Some(origin.location.file()));
    assert_eq!(debug.line, Some(origin.location.line()));
}

#[test]
fn ExceptionClassifier___classify_error___finds_api_error_in_chain() {
    let error = Wrapper(Box::new(ApiError::Conflict("version mismatch".to_string())));

    let classification = production().classify_error(&error);

    assert_eq!(classification.code, 409);
    assert_eq!(classification.error_code, ErrorCode::Conflict);
}

#[test]
fn ExceptionClassifier___classify_error___malformed_json_is_bad_request() {
    let error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

    let classification = production().classify_error(&error);

    assert_eq!(classification.code, 400);
    assert_eq!(classification.error_code, ErrorCode::BadRequest);
    assert_eq!(classification.message, MALFORMED_JSON_MESSAGE);
}

#[test]
fn ExceptionClassifier___classify_error___custom_rule_applies() {
    let classifier = production().with_rule(|e: &UpstreamTimeout| {
        Classification::new(
            504,
            ErrorType::ServerError,
            ErrorCode::ServiceUnavailable,
            format!("Upstream took {}ms", e.0),
        )
    });

    let classification = classifier.classify_error(&UpstreamTimeout(2500));

    assert_eq!(classification.code, 504);
    assert_eq!(classification.message, "Upstream took 2500ms");
}

#[test]
fn ExceptionClassifier___classify_error___custom_rule_matches_nested_cause() {
    let classifier = development().with_rule(|_: &UpstreamTimeout| {
        Classification::new(504, ErrorType::ServerError, ErrorCode::ServiceUnavailable, "Slow")
    });

    let classification = classifier.classify_error(&Wrapper(Box::new(UpstreamTimeout(10))));

    assert_eq!(classification.code, 504);
    assert!(classification.debug.unwrap().exception.ends_with("UpstreamTimeout"));
}

#[test]
fn ExceptionClassifier___classify_error___first_rule_wins() {
    let classifier = production()
        .with_rule(|_: &UpstreamTimeout| {
            Classification::new(504, ErrorType::ServerError, ErrorCode::ServiceUnavailable, "first")
        })
        .with_rule(|_: &UpstreamTimeout| {
            Classification::new(500, ErrorType::ServerError, ErrorCode::UnknownError, "second")
        });

    let classification = classifier.classify_error(&UpstreamTimeout(1));

    assert_eq!(classification.message, "first");
}

#[test]
fn ExceptionClassifier___classify_error___api_error_beats_custom_rule() {
    let classifier = production().with_rule(|_: &ApiError| {
        Classification::new(418, ErrorType::ClientError, ErrorCode::BadRequest, "rule")
    });

    let classification = classifier.classify_error(&ApiError::Conflict(String::new()));

    assert_eq!(classification.code, 409);
}

#[test]
fn ExceptionClassifier___classify_error___is_deterministic() {
    let classifier = production();
    let error = ApiError::Database("Unknown column 'x'".to_string());

    let first = classifier.classify_error(&error);
    let second = classifier.classify_error(&error);

    assert_eq!(first, second);
}

#[test]
fn ExceptionClassifier___debug___lists_rule_types() {
    let classifier = production().with_rule(|_: &UpstreamTimeout| {
        Classification::new(504, ErrorType::ServerError, ErrorCode::ServiceUnavailable, "")
    });

    let rendered = format!("{classifier:?}");

    assert!(rendered.contains("UpstreamTimeout"));
}
