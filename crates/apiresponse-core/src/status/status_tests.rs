#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case(200, StatusKind::Success)]
#[test_case(204, StatusKind::Success)]
#[test_case(299, StatusKind::Success)]
#[test_case(301, StatusKind::Fail)]
#[test_case(404, StatusKind::Fail)]
#[test_case(499, StatusKind::Fail)]
#[test_case(500, StatusKind::Error)]
#[test_case(599, StatusKind::Error)]
#[test_case(100, StatusKind::Error)]
#[test_case(1000, StatusKind::Error)]
fn StatusKind___from_code___classifies_range(code: u16, expected: StatusKind) {
    assert_eq!(StatusKind::from_code(code), expected);
}

#[test_case(StatusKind::Success, 200)]
#[test_case(StatusKind::Fail, 400)]
#[test_case(StatusKind::Error, 500)]
fn StatusKind___default_code___returns_canonical_code(kind: StatusKind, expected: u16) {
    assert_eq!(kind.default_code(), expected);
}

#[test]
fn StatusKind___serialize___uses_lowercase_names() {
    let json = serde_json::to_string(&StatusKind::Fail).unwrap();

    assert_eq!(json, r#""fail""#);
}

#[test]
fn StatusKind___display___matches_wire_name() {
    assert_eq!(StatusKind::Error.to_string(), "error");
}

#[test]
fn predicates___range_boundaries___are_half_open() {
    assert!(is_success(200));
    assert!(!is_success(300));
    assert!(is_redirect(399));
    assert!(!is_redirect(400));
    assert!(is_client_error(400));
    assert!(!is_client_error(500));
    assert!(is_server_error(599));
    assert!(!is_server_error(600));
}

#[test_case(204, true)]
#[test_case(304, true)]
#[test_case(200, false)]
#[test_case(404, false)]
fn is_bodyless___code___matches_no_content_codes(code: u16, expected: bool) {
    assert_eq!(is_bodyless(code), expected);
}

#[test_case(200, "Success")]
#[test_case(422, "Validation failed")]
#[test_case(503, "Service unavailable")]
#[test_case(418, "I am a teapot")]
fn default_message___registered_code___returns_table_entry(code: u16, expected: &str) {
    assert_eq!(default_message(code), expected);
}

#[test_case(299)]
#[test_case(600)]
#[test_case(1000)]
fn default_message___unregistered_code___returns_unknown(code: u16) {
    assert_eq!(default_message(code), UNKNOWN_STATUS_MESSAGE);
    assert!(!is_registered(code));
}

#[test]
fn default_message___every_code_in_range___is_never_empty() {
    for code in 0..=u16::MAX {
        assert!(!default_message(code).is_empty(), "empty message for {code}");
    }
}

#[test_case(200, Some("success"))]
#[test_case(201, Some("created_success"))]
#[test_case(422, Some("validation_failed"))]
#[test_case(429, Some("rate_limit_exceeded"))]
#[test_case(202, None)]
#[test_case(502, None)]
fn message_key___code___maps_to_config_key(code: u16, expected: Option<&str>) {
    assert_eq!(message_key(code), expected);
}
