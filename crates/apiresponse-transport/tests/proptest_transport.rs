//! Property-based tests for envelope formatting
//!
//! Checks that status, success flag and field presence always follow the
//! status code, whatever the caller passes in.

use apiresponse_core::{ErrorBag, ErrorCode, ErrorType, StatusKind};
use apiresponse_transport::{FormatOptions, JsonCodec, ResponseEnvelope, ResponseFormatter};
use proptest::prelude::*;

// Strategy: Generate valid JSON values (simple types for test speed)
fn arb_json_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i32>().prop_map(|i| serde_json::Value::Number(i.into())),
        ".*".prop_map(serde_json::Value::String),
    ]
}

fn arb_errors() -> impl Strategy<Value = Option<ErrorBag>> {
    proptest::option::of(
        proptest::collection::vec(("[a-z_]{1,12}", ".{0,40}"), 0..4)
            .prop_map(|pairs| pairs.into_iter().collect::<ErrorBag>()),
    )
}

fn arb_options() -> impl Strategy<Value = FormatOptions> {
    (
        proptest::option::of(".{0,40}"),
        proptest::option::of(arb_json_value()),
        arb_errors(),
        any::<bool>(),
    )
        .prop_map(|(message, data, errors, tagged)| FormatOptions {
            message,
            data,
            errors,
            error_type: tagged.then_some(ErrorType::Validation),
            error_code: tagged.then_some(ErrorCode::ValidationFailed),
            ..Default::default()
        })
}

proptest! {
    /// Property: 2xx envelopes are successes without failure fields
    #[test]
    fn proptest_success_codes_never_carry_errors(
        code in 200u16..=299,
        options in arb_options()
    ) {
        let envelope = ResponseFormatter::default().format(code, options);

        prop_assert!(envelope.is_success());
        prop_assert_eq!(envelope.status(), StatusKind::Success);
        prop_assert!(envelope.errors().is_none());
        prop_assert!(envelope.error_type().is_none());
        prop_assert!(envelope.error_code().is_none());
    }

    /// Property: 3xx-5xx envelopes never carry data and always carry the failure group
    #[test]
    fn proptest_failure_codes_never_carry_data(
        code in 300u16..=599,
        options in arb_options()
    ) {
        let envelope = ResponseFormatter::default().format(code, options);

        prop_assert!(!envelope.is_success());
        prop_assert!(envelope.data().is_none());
        prop_assert!(envelope.errors().is_some());
        prop_assert!(envelope.error_type().is_some());
        prop_assert!(envelope.error_code().is_some());
    }

    /// Property: success flag, status and code range agree for any code
    #[test]
    fn proptest_success_flag_matches_status_and_code(code in any::<u16>()) {
        let envelope = ResponseFormatter::default().format(code, FormatOptions::default());

        let in_range = (200..300).contains(&code);
        prop_assert_eq!(envelope.is_success(), in_range);
        prop_assert_eq!(envelope.status() == StatusKind::Success, in_range);
        prop_assert!(!envelope.message().is_empty());
    }

    /// Property: formatter output always passes decode validation
    #[test]
    fn proptest_envelope_serialization_roundtrip(
        code in any::<u16>(),
        options in arb_options()
    ) {
        let envelope = ResponseFormatter::default().format(code, options);

        let bytes = envelope.to_bytes().expect("Serialization should succeed");
        let decoded = ResponseEnvelope::from_bytes(&bytes).expect("Deserialization should succeed");

        prop_assert_eq!(decoded.code(), envelope.code());
        prop_assert_eq!(decoded.status(), envelope.status());
        prop_assert_eq!(decoded.message(), envelope.message());
        prop_assert_eq!(decoded.errors(), envelope.errors());
        // Null payloads come back as absent fields
        if envelope.data().is_some_and(|d| !d.is_null()) {
            prop_assert_eq!(decoded.data(), envelope.data());
        }
    }

    /// Property: rendering never fails and bodyless codes stay empty
    #[test]
    fn proptest_render_respects_bodyless_codes(code in 100u16..=599) {
        use apiresponse_transport::Codec;

        let envelope = ResponseFormatter::default().format(code, FormatOptions::default());
        let rendered = JsonCodec::new().render(&envelope).expect("render should succeed");

        prop_assert_eq!(rendered.status, code);
        prop_assert_eq!(rendered.body.is_empty(), code == 204 || code == 304);
    }
}
