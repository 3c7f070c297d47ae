//! axum integration

use apiresponse_core::ApiError;
use apiresponse_handler::{ErrorOrigin, ExceptionHandler};
use apiresponse_transport::{Codec, JsonCodec, ResponseEnvelope};
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use std::error::Error;

/// An envelope as an axum response
///
/// The status line is the envelope `code`; codes that are not valid HTTP
/// statuses are sent as 500. 204 and 304 carry no body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse(pub ResponseEnvelope);

impl ApiResponse {
    pub fn envelope(&self) -> &ResponseEnvelope {
        &self.0
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        self.0
    }
}

impl From<ResponseEnvelope> for ApiResponse {
    fn from(envelope: ResponseEnvelope) -> Self {
        Self(envelope)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        render(&self.0)
    }
}

/// A handler failure, rendered through [`ExceptionHandler::global`]
///
/// Handlers return `Result<ApiResponse, ErrorResponse>` and use `?` on
/// [`ApiError`], `anyhow::Error`, `serde_json::Error` and axum JSON
/// rejections.
#[derive(Debug)]
pub struct ErrorResponse(Failure);

#[derive(Debug)]
enum Failure {
    Api(ApiError),
    Other {
        error: Box<dyn Error + Send + Sync + 'static>,
        origin: ErrorOrigin,
    },
}

impl ErrorResponse {
    /// Wrap any error; an [`ApiError`] in its source chain is still honored
    ///
    /// The type name of `E` and the caller's location feed the debug payload.
    #[track_caller]
    pub fn from_error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self(Failure::Other {
            error: Box::new(error),
            origin: ErrorOrigin::of::<E>(),
        })
    }

    /// Envelope this failure renders to under `handler`
    pub fn to_envelope(&self, handler: &ExceptionHandler) -> ResponseEnvelope {
        match &self.0 {
            Failure::Api(error) => handler.handle(error),
            Failure::Other { error, origin } => handler.handle_error_from(error.as_ref(), *origin),
        }
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(error: ApiError) -> Self {
        Self(Failure::Api(error))
    }
}

impl From<anyhow::Error> for ErrorResponse {
    #[track_caller]
    fn from(error: anyhow::Error) -> Self {
        Self(Failure::Api(ApiError::from(error)))
    }
}

impl From<serde_json::Error> for ErrorResponse {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        Self::from_error(error)
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match &rejection {
            JsonRejection::JsonSyntaxError(_) => ApiError::BadRequest(rejection.body_text()),
            JsonRejection::JsonDataError(_) => ApiError::validation_with_message(
                rejection.body_text(),
                apiresponse_core::ErrorBag::single("body", rejection.body_text()),
            ),
            _ => ApiError::http(rejection.status().as_u16(), rejection.body_text()),
        };
        Self(Failure::Api(error))
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        render(&self.to_envelope(ExceptionHandler::global()))
    }
}

/// Fallback for requests that match no route
pub async fn route_not_found(uri: Uri) -> ErrorResponse {
    ApiError::RouteNotFound {
        path: uri.path().to_string(),
    }
    .into()
}

/// Fallback for routes that exist but not for the request method
pub async fn method_not_allowed(method: Method) -> ErrorResponse {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        allowed: Vec::new(),
    }
    .into()
}

fn render(envelope: &ResponseEnvelope) -> Response {
    let rendered = match JsonCodec::new().render(envelope) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(code = envelope.code(), error = %e, "failed to encode response envelope");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let status =
        StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, rendered.body).into_response();
    let headers = response.headers_mut();
    match rendered.content_type {
        Some(content_type) => {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        None => {
            headers.remove(header::CONTENT_TYPE);
        }
    }
    response
}
