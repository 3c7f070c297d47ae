//! HTTP status code tables
//!
//! Every lookup here is a pure function over a `match` table compiled into
//! the binary, so it is safe to call from any number of threads.

use serde::{Deserialize, Serialize};

/// Message returned for codes missing from the built-in table
pub const UNKNOWN_STATUS_MESSAGE: &str = "Unknown status code";

/// Envelope status derived from a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// 2xx
    Success,
    /// 3xx and 4xx
    Fail,
    /// 5xx and anything outside the HTTP ranges
    Error,
}

impl StatusKind {
    /// Classify a status code
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => StatusKind::Success,
            300..=499 => StatusKind::Fail,
            _ => StatusKind::Error,
        }
    }

    /// Default status code for this kind
    pub fn default_code(&self) -> u16 {
        match self {
            StatusKind::Success => 200,
            StatusKind::Fail => 400,
            StatusKind::Error => 500,
        }
    }

    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Fail => "fail",
            StatusKind::Error => "error",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_success(code: u16) -> bool {
    (200..300).contains(&code)
}

pub fn is_redirect(code: u16) -> bool {
    (300..400).contains(&code)
}

pub fn is_client_error(code: u16) -> bool {
    (400..500).contains(&code)
}

pub fn is_server_error(code: u16) -> bool {
    (500..600).contains(&code)
}

/// Whether a response with this code carries no body
pub fn is_bodyless(code: u16) -> bool {
    matches!(code, 204 | 304)
}

/// Whether the code appears in the built-in message table
pub fn is_registered(code: u16) -> bool {
    builtin_message(code).is_some()
}

/// Built-in default message for a status code
///
/// Falls back to [`UNKNOWN_STATUS_MESSAGE`] for codes the table does not know.
pub fn default_message(code: u16) -> &'static str {
    builtin_message(code).unwrap_or(UNKNOWN_STATUS_MESSAGE)
}

/// Configuration key used to override the default message for `code`
///
/// Only the codes an application is likely to customize have a key; the
/// rest resolve straight to the built-in table.
pub fn message_key(code: u16) -> Option<&'static str> {
    let key = match code {
        200 => "success",
        201 => "created_success",
        400 => "bad_request",
        401 => "unauthorized",
        403 => "forbidden",
        404 => "not_found",
        409 => "conflict",
        422 => "validation_failed",
        429 => "rate_limit_exceeded",
        500 => "internal_server_error",
        503 => "service_unavailable",
        _ => return None,
    };
    Some(key)
}

fn builtin_message(code: u16) -> Option<&'static str> {
    let message = match code {
        // 1xx
        100 => "Continue",
        101 => "Switching protocols",
        102 => "Processing",
        103 => "Early hints",

        // 2xx
        200 => "Success",
        201 => "Resource created successfully",
        202 => "Request accepted",
        203 => "Non-authoritative information",
        204 => "No content",
        205 => "Reset content",
        206 => "Partial content",
        207 => "Multi-status",
        208 => "Already reported",
        226 => "IM used",

        // 3xx
        300 => "Multiple choices",
        301 => "Moved permanently",
        302 => "Found",
        303 => "See other",
        304 => "Not modified",
        305 => "Use proxy",
        307 => "Temporary redirect",
        308 => "Permanent redirect",

        // 4xx
        400 => "Bad request",
        401 => "Unauthorized",
        402 => "Payment required",
        403 => "Forbidden",
        404 => "Not found",
        405 => "Method not allowed",
        406 => "Not acceptable",
        407 => "Proxy authentication required",
        408 => "Request timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length required",
        412 => "Precondition failed",
        413 => "Request entity too large",
        414 => "Request URI too long",
        415 => "Unsupported media type",
        416 => "Requested range not satisfiable",
        417 => "Expectation failed",
        418 => "I am a teapot",
        421 => "Misdirected request",
        422 => "Validation failed",
        423 => "Locked",
        424 => "Failed dependency",
        425 => "Too early",
        426 => "Upgrade required",
        428 => "Precondition required",
        429 => "Too many requests",
        431 => "Request header fields too large",
        451 => "Unavailable for legal reasons",

        // 5xx
        500 => "Internal server error",
        501 => "Not implemented",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        505 => "HTTP version not supported",
        506 => "Variant also negotiates",
        507 => "Insufficient storage",
        508 => "Loop detected",
        510 => "Not extended",
        511 => "Network authentication required",

        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
#[path = "status/status_tests.rs"]
mod status_tests;
