//! Codec trait and JSON implementation

use crate::envelope::ResponseEnvelope;
use apiresponse_core::status;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during encoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Serialization(err.to_string())
    }
}

/// Trait for turning envelopes into response bodies
pub trait Codec: Send + Sync {
    /// Encode a value to bytes
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &'static str;

    /// Produce the status line and body for an envelope
    ///
    /// Bodyless statuses (204, 304) get an empty body and no content type.
    fn render(&self, envelope: &ResponseEnvelope) -> Result<RenderedResponse, CodecError> {
        let status = envelope.http_status();
        if status::is_bodyless(status) {
            return Ok(RenderedResponse {
                status,
                content_type: None,
                body: Vec::new(),
            });
        }
        Ok(RenderedResponse {
            status,
            content_type: Some(self.content_type()),
            body: self.encode(envelope)?,
        })
    }
}

/// An envelope ready for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

/// JSON codec implementation using serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(Into::into)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
