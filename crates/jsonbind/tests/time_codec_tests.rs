//! Date/time codec behavior: each fixed textual form round-trips, and parse
//! failures preserve the offending string.

#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use jsonbind::{
    time::{self, OffsetTime},
    DecodeError, JsonCodec,
};
use serde_json::{json, Value};

fn round_trip<V, C>(codec: &C, input: &str) -> V
where
    V: PartialEq + std::fmt::Debug,
    C: JsonCodec<V> + ?Sized,
{
    let decoded = codec.decode(&json!(input)).expect("input parses");
    let encoded = codec.encode(&decoded).expect("encode is total");
    let again = codec.decode(&encoded).expect("own output parses");
    assert_eq!(again, decoded, "value did not survive the round trip");
    decoded
}

#[test]
fn test_offset_date_time_round_trips() {
    let codec = time::offset_date_time();
    round_trip(codec.as_ref(), "2026-01-02T03:04:05+01:00");
    round_trip(codec.as_ref(), "2026-01-02T03:04:05.250Z");
}

#[test]
fn test_offset_date_time_canonicalizes_zulu_to_numeric_offset() {
    let codec = time::offset_date_time();
    let decoded = codec.decode(&json!("2026-01-02T03:04:05Z")).expect("parses");
    let encoded = codec.encode(&decoded).expect("encode is total");
    assert_eq!(encoded, Value::String("2026-01-02T03:04:05+00:00".to_string()));
}

#[test]
fn test_offset_time_round_trips() {
    let codec = time::offset_time();
    let decoded: OffsetTime = round_trip(codec.as_ref(), "10:15:30+01:00");
    assert_eq!(decoded.to_string(), "10:15:30+01:00");
    round_trip(codec.as_ref(), "23:59:59.500-04:30");
    round_trip(codec.as_ref(), "00:00:00Z");
}

#[test]
fn test_local_date_time_round_trips() {
    let codec = time::local_date_time();
    let decoded = codec.decode(&json!("2026-01-02T03:04:05")).expect("parses");
    let encoded = codec.encode(&decoded).expect("encode is total");
    assert_eq!(encoded, Value::String("2026-01-02T03:04:05".to_string()));
    round_trip(codec.as_ref(), "2026-01-02T03:04:05.25");
}

#[test]
fn test_local_date_round_trips() {
    let codec = time::local_date();
    let decoded = codec.decode(&json!("2026-01-02")).expect("parses");
    let encoded = codec.encode(&decoded).expect("encode is total");
    assert_eq!(encoded, Value::String("2026-01-02".to_string()));
}

#[test]
fn test_local_time_round_trips() {
    let codec = time::local_time();
    let decoded = codec.decode(&json!("03:04:05")).expect("parses");
    let encoded = codec.encode(&decoded).expect("encode is total");
    assert_eq!(encoded, Value::String("03:04:05".to_string()));
}

#[test]
fn test_rfc1123_parses_gmt_and_round_trips_by_value() {
    let codec = time::rfc1123_date_time();
    let decoded = codec
        .decode(&json!("Fri, 02 Jan 2026 03:04:05 GMT"))
        .expect("RFC-1123 text parses");
    let encoded = codec.encode(&decoded).expect("encode is total");
    let again = codec.decode(&encoded).expect("own output parses");
    assert_eq!(again, decoded);
}

#[test]
fn test_parse_failures_preserve_the_offending_text() {
    assert!(matches!(
        time::local_date().decode(&json!("02/01/2026")),
        Err(DecodeError::Format { ref text, .. }) if text == "02/01/2026"
    ));
    assert!(matches!(
        time::offset_time().decode(&json!("10:15:30 somewhere")),
        Err(DecodeError::Format { ref text, .. }) if text == "10:15:30 somewhere"
    ));
    assert!(matches!(
        time::rfc1123_date_time().decode(&json!("yesterday")),
        Err(DecodeError::Format { ref text, .. }) if text == "yesterday"
    ));
}

#[test]
fn test_wrong_weekday_is_rejected() {
    let codec = time::rfc1123_date_time();
    // 2026-01-02 is a Friday.
    let err = codec.decode(&json!("Mon, 02 Jan 2026 03:04:05 GMT"));
    assert!(matches!(err, Err(DecodeError::Format { .. })));
}

#[test]
fn test_non_string_inputs_are_shape_mismatches() {
    assert!(matches!(
        time::offset_date_time().decode(&json!(1_700_000_000)),
        Err(DecodeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        time::local_date().decode(&json!(null)),
        Err(DecodeError::TypeMismatch { .. })
    ));
}
