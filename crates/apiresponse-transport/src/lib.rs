//! apiresponse-transport - Response envelope, formatter, and JSON codec
//!
//! This crate provides:
//! - [`ResponseEnvelope`] the canonical wire shape
//! - [`ResponseFormatter`] for assembling envelopes with code-derived defaults
//! - [`Codec`] trait and [`JsonCodec`] for turning envelopes into bodies

mod codec;
mod envelope;
mod formatter;

pub use codec::{Codec, CodecError, JsonCodec, RenderedResponse};
pub use envelope::{DebugInfo, EnvelopeError, ResponseEnvelope};
pub use formatter::{EnvelopeBuilder, FormatOptions, MAINTENANCE_MESSAGE, ResponseFormatter};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Codec, CodecError, DebugInfo, EnvelopeBuilder, FormatOptions, JsonCodec,
        ResponseEnvelope, ResponseFormatter,
    };
}
