//! Response envelope type

use apiresponse_core::{ErrorBag, ErrorCode, ErrorType, StatusKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

/// Diagnostic details attached to failures outside production
///
/// Kept apart from `errors` so clients never mistake it for user-facing
/// validation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Type name of the error that was classified
    pub exception: String,

    /// Raw display text of the error
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

/// Canonical JSON envelope wrapping every API response
///
/// Envelopes are only assembled by [`crate::ResponseFormatter`], which keeps
/// `success`, `status` and the failure fields consistent with `code`.
/// Decoding applies the same rules and rejects envelopes that break them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvelopeFields")]
pub struct ResponseEnvelope {
    success: bool,

    status: StatusKind,

    code: u16,

    message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<ErrorBag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_type: Option<ErrorType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Map<String, Value>>,

    locale: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    debug: Option<DebugInfo>,
}

/// Why a decoded envelope was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("status {status} does not match code {code}")]
    StatusMismatch { status: StatusKind, code: u16 },

    #[error("success flag {success} does not match status {status}")]
    SuccessMismatch { success: bool, status: StatusKind },

    #[error("success envelope carries failure field `{0}`")]
    FailureFieldOnSuccess(&'static str),

    #[error("failure envelope is missing `{0}`")]
    MissingFailureField(&'static str),

    #[error("failure envelope carries `data`")]
    DataOnFailure,
}

/// Unchecked wire form of [`ResponseEnvelope`]
#[derive(Deserialize)]
struct EnvelopeFields {
    success: bool,
    status: StatusKind,
    code: u16,
    message: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<ErrorBag>,
    #[serde(default)]
    error_type: Option<ErrorType>,
    #[serde(default)]
    error_code: Option<ErrorCode>,
    #[serde(default)]
    meta: Option<Map<String, Value>>,
    locale: String,
    #[serde(default)]
    debug: Option<DebugInfo>,
}

impl TryFrom<EnvelopeFields> for ResponseEnvelope {
    type Error = EnvelopeError;

    fn try_from(fields: EnvelopeFields) -> Result<Self, Self::Error> {
        let EnvelopeFields {
            success,
            status,
            code,
            message,
            data,
            errors,
            error_type,
            error_code,
            meta,
            locale,
            debug,
        } = fields;

        if status != StatusKind::from_code(code) {
            return Err(EnvelopeError::StatusMismatch { status, code });
        }
        if success != (status == StatusKind::Success) {
            return Err(EnvelopeError::SuccessMismatch { success, status });
        }

        if success {
            let stray = [
                ("errors", errors.is_some()),
                ("error_type", error_type.is_some()),
                ("error_code", error_code.is_some()),
                ("debug", debug.is_some()),
            ];
            if let Some((field, _)) = stray.into_iter().find(|(_, present)| *present) {
                return Err(EnvelopeError::FailureFieldOnSuccess(field));
            }
            return Ok(Self::success_parts(code, message, data, meta, locale));
        }

        if data.is_some() {
            return Err(EnvelopeError::DataOnFailure);
        }
        let failure = FailureParts {
            errors: errors.ok_or(EnvelopeError::MissingFailureField("errors"))?,
            error_type: error_type.ok_or(EnvelopeError::MissingFailureField("error_type"))?,
            error_code: error_code.ok_or(EnvelopeError::MissingFailureField("error_code"))?,
            debug,
        };
        Ok(Self::failure_parts(code, message, failure, meta, locale))
    }
}

/// Failure fields that travel together
#[derive(Debug, Clone)]
pub(crate) struct FailureParts {
    pub errors: ErrorBag,
    pub error_type: ErrorType,
    pub error_code: ErrorCode,
    pub debug: Option<DebugInfo>,
}

impl ResponseEnvelope {
    pub(crate) fn success_parts(
        code: u16,
        message: String,
        data: Option<Value>,
        meta: Option<Map<String, Value>>,
        locale: String,
    ) -> Self {
        Self {
            success: true,
            status: StatusKind::Success,
            code,
            message,
            data,
            errors: None,
            error_type: None,
            error_code: None,
            meta,
            locale,
            debug: None,
        }
    }

    pub(crate) fn failure_parts(
        code: u16,
        message: String,
        failure: FailureParts,
        meta: Option<Map<String, Value>>,
        locale: String,
    ) -> Self {
        Self {
            success: false,
            status: StatusKind::from_code(code),
            code,
            message,
            data: None,
            errors: Some(failure.errors),
            error_type: Some(failure.error_type),
            error_code: Some(failure.error_code),
            meta,
            locale,
            debug: failure.debug,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> StatusKind {
        self.status
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Status code to put on the HTTP status line
    ///
    /// Codes outside the HTTP range are sent as 500.
    pub fn http_status(&self) -> u16 {
        if (100..=599).contains(&self.code) {
            self.code
        } else {
            500
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn errors(&self) -> Option<&ErrorBag> {
        self.errors.as_ref()
    }

    pub fn error_type(&self) -> Option<ErrorType> {
        self.error_type
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn debug(&self) -> Option<&DebugInfo> {
        self.debug.as_ref()
    }

    /// Deserialize the data payload to a typed value
    ///
    /// This method deserializes directly from the JSON value without cloning.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.data {
            Some(v) => Ok(Some(T::deserialize(v)?)),
            None => Ok(None),
        }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes
    ///
    /// Fails on malformed JSON and on envelopes whose fields contradict
    /// their `code`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}
