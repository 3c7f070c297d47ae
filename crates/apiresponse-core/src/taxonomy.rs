//! Failure taxonomy labels and machine-readable error codes

use serde::{Deserialize, Serialize};

/// Coarse category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Validation,
    Authorization,
    ClientError,
    ServerError,
}

impl ErrorType {
    /// Label implied by a bare status code
    pub fn for_status(code: u16) -> Self {
        match code {
            401 | 403 | 407 => ErrorType::Authorization,
            422 => ErrorType::Validation,
            300..=499 => ErrorType::ClientError,
            _ => ErrorType::ServerError,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Validation => "validation",
            ErrorType::Authorization => "authorization",
            ErrorType::ClientError => "client_error",
            ErrorType::ServerError => "server_error",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable token identifying a specific failure cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "ERR_AUTHENTICATION_FAILED")]
    AuthenticationFailed,
    #[serde(rename = "ERR_ACCESS_DENIED")]
    AccessDenied,
    #[serde(rename = "ERR_VALIDATION_FAILED")]
    ValidationFailed,
    #[serde(rename = "ERR_RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded,
    #[serde(rename = "ERR_ROUTE_NOT_FOUND")]
    RouteNotFound,
    #[serde(rename = "ERR_RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    #[serde(rename = "ERR_MODEL_NOT_FOUND")]
    ModelNotFound,
    #[serde(rename = "ERR_METHOD_NOT_ALLOWED")]
    MethodNotAllowed,
    #[serde(rename = "ERR_BAD_REQUEST")]
    BadRequest,
    #[serde(rename = "ERR_CONFLICT")]
    Conflict,
    #[serde(rename = "ERR_SERVICE_UNAVAILABLE")]
    ServiceUnavailable,
    #[serde(rename = "ERR_INTERNAL_SERVER_ERROR")]
    InternalServerError,
    #[serde(rename = "ERR_DATABASE_QUERY_EXCEPTION")]
    DatabaseQueryException,
    #[serde(rename = "ERR_UNKNOWN_HTTP_EXCEPTION")]
    UnknownHttpException,
    #[serde(rename = "ERR_UNKNOWN_ERROR")]
    UnknownError,
}

impl ErrorCode {
    /// Code implied by a bare status code
    pub fn for_status(code: u16) -> Self {
        match code {
            400 => ErrorCode::BadRequest,
            401 => ErrorCode::AuthenticationFailed,
            403 => ErrorCode::AccessDenied,
            404 => ErrorCode::ResourceNotFound,
            405 => ErrorCode::MethodNotAllowed,
            409 => ErrorCode::Conflict,
            422 => ErrorCode::ValidationFailed,
            429 => ErrorCode::RateLimitExceeded,
            500 => ErrorCode::InternalServerError,
            503 => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::UnknownHttpException,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthenticationFailed => "ERR_AUTHENTICATION_FAILED",
            ErrorCode::AccessDenied => "ERR_ACCESS_DENIED",
            ErrorCode::ValidationFailed => "ERR_VALIDATION_FAILED",
            ErrorCode::RateLimitExceeded => "ERR_RATE_LIMIT_EXCEEDED",
            ErrorCode::RouteNotFound => "ERR_ROUTE_NOT_FOUND",
            ErrorCode::ResourceNotFound => "ERR_RESOURCE_NOT_FOUND",
            ErrorCode::ModelNotFound => "ERR_MODEL_NOT_FOUND",
            ErrorCode::MethodNotAllowed => "ERR_METHOD_NOT_ALLOWED",
            ErrorCode::BadRequest => "ERR_BAD_REQUEST",
            ErrorCode::Conflict => "ERR_CONFLICT",
            ErrorCode::ServiceUnavailable => "ERR_SERVICE_UNAVAILABLE",
            ErrorCode::InternalServerError => "ERR_INTERNAL_SERVER_ERROR",
            ErrorCode::DatabaseQueryException => "ERR_DATABASE_QUERY_EXCEPTION",
            ErrorCode::UnknownHttpException => "ERR_UNKNOWN_HTTP_EXCEPTION",
            ErrorCode::UnknownError => "ERR_UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
