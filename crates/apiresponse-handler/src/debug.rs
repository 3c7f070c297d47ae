//! Debug side channel construction

use apiresponse_core::ApiError;
use apiresponse_transport::DebugInfo;
use std::error::Error;
use std::panic::Location;

/// Debug details for a classified [`ApiError`]
pub(crate) fn for_api_error(error: &ApiError) -> DebugInfo {
    match error {
        ApiError::Unhandled(inner) => DebugInfo {
            exception: inner.type_name().to_string(),
            message: inner.message().to_string(),
            file: Some(inner.location().file().to_string()),
            line: Some(inner.location().line()),
            trace: with_causes(inner.trace(), error),
        },
        _ => DebugInfo {
            exception: error.type_name().to_string(),
            message: error.to_string(),
            file: None,
            line: None,
            trace: with_causes(Vec::new(), error),
        },
    }
}

/// Debug details for an error matched by a rule other than [`ApiError`]
pub(crate) fn for_foreign_error(
    type_name: &str,
    location: Option<&Location<'_>>,
    error: &(dyn Error + 'static),
) -> DebugInfo {
    DebugInfo {
        exception: type_name.to_string(),
        message: error.to_string(),
        file: location.map(|l| l.file().to_string()),
        line: location.map(Location::line),
        trace: with_causes(Vec::new(), error),
    }
}

// Source chain entries follow the backtrace frames.
fn with_causes(mut trace: Vec<String>, error: &(dyn Error + 'static)) -> Vec<String> {
    let mut cause = error.source();
    while let Some(err) = cause {
        trace.push(format!("caused by: {err}"));
        cause = err.source();
    }
    trace
}
