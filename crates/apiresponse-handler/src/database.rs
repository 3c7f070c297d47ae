//! Sanitization of raw database driver messages
//!
//! Driver text routinely contains table names, column names and user data,
//! so it is never sent to clients. Instead the text is matched against a
//! small table of well-known fragments. Matching is best effort: drivers word
//! their errors differently, and anything unrecognized gets the generic text.

/// Top-level message for every database failure
pub const DATABASE_ERROR_MESSAGE: &str = "Database Error";

/// Detail used when no pattern matches
pub const GENERIC_DATABASE_MESSAGE: &str = "A database error occurred.";

/// Fragments (lowercase) and the message they map to, checked in order
const PATTERNS: &[(&[&str], &str)] = &[
    (
        &["duplicate entry", "duplicate key", "unique constraint"],
        "Duplicate entry found.",
    ),
    (
        &["foreign key constraint"],
        "Related record constraint violated.",
    ),
    (
        &["data too long", "value too long"],
        "One or more values exceed the allowed length.",
    ),
    (
        &["unknown column", "no such column"],
        "Invalid field referenced.",
    ),
    (
        &["doesn't exist", "no such table", "does not exist"],
        "Requested table does not exist.",
    ),
    (
        &["connection refused", "could not connect"],
        "Unable to connect to the database.",
    ),
];

/// Map raw driver text to a client-safe message, if a pattern matches
pub fn match_driver_message(raw: &str) -> Option<&'static str> {
    let haystack = raw.to_ascii_lowercase();
    PATTERNS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| haystack.contains(n)))
        .map(|(_, message)| *message)
}

/// Client-safe message for raw driver text
pub fn sanitize(raw: &str) -> &'static str {
    match_driver_message(raw).unwrap_or(GENERIC_DATABASE_MESSAGE)
}
