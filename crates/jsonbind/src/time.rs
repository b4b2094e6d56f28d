//! Fixed-format date/time string codecs.
//!
//! Each codec accepts and produces exactly one textual form and must
//! round-trip it. Parse failures preserve the offending string for
//! diagnostics; non-string input is a shape mismatch, unparseable text a
//! format failure.

use std::{fmt, str::FromStr, sync::Arc};

use chrono::{
    format::{parse, Parsed, StrftimeItems},
    offset::Offset,
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc,
};
use serde_json::Value;

use crate::{
    codec::{ArcCodec, JsonCodec},
    error::{DecodeError, EncodeError, JsonShape},
};

/// Format identifier: ISO-8601 offset date-time, e.g. `2026-01-02T03:04:05+01:00`.
pub const ISO_OFFSET_DATE_TIME: &str = "ISO-8601 offset date-time";
/// Format identifier: ISO-8601 offset time, e.g. `03:04:05+01:00`.
pub const ISO_OFFSET_TIME: &str = "ISO-8601 offset time";
/// Format identifier: ISO-8601 local date-time, e.g. `2026-01-02T03:04:05`.
pub const ISO_LOCAL_DATE_TIME: &str = "ISO-8601 local date-time";
/// Format identifier: ISO-8601 local date, e.g. `2026-01-02`.
pub const ISO_LOCAL_DATE: &str = "ISO-8601 local date";
/// Format identifier: ISO-8601 local time, e.g. `03:04:05`.
pub const ISO_LOCAL_TIME: &str = "ISO-8601 local time";
/// Format identifier: RFC-1123 date-time, e.g. `Fri, 02 Jan 2026 03:04:05 GMT`.
pub const RFC_1123_DATE_TIME: &str = "RFC-1123 date-time";

const LOCAL_DATE_TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const LOCAL_DATE_FMT: &str = "%Y-%m-%d";
const LOCAL_TIME_FMT: &str = "%H:%M:%S%.f";
const OFFSET_TIME_FMT: &str = "%H:%M:%S%.f%:z";

/// Codec for ISO-8601 offset date-times.
#[must_use]
pub fn offset_date_time() -> ArcCodec<DateTime<FixedOffset>> {
    Arc::new(OffsetDateTimeCodec)
}

/// Codec for ISO-8601 offset times.
#[must_use]
pub fn offset_time() -> ArcCodec<OffsetTime> {
    Arc::new(OffsetTimeCodec)
}

/// Codec for ISO-8601 local date-times.
#[must_use]
pub fn local_date_time() -> ArcCodec<NaiveDateTime> {
    Arc::new(LocalDateTimeCodec)
}

/// Codec for ISO-8601 local dates.
#[must_use]
pub fn local_date() -> ArcCodec<NaiveDate> {
    Arc::new(LocalDateCodec)
}

/// Codec for ISO-8601 local times.
#[must_use]
pub fn local_time() -> ArcCodec<NaiveTime> {
    Arc::new(LocalTimeCodec)
}

/// Codec for RFC-1123 date-times (legacy interop), parsed into an
/// offset-aware date-time.
#[must_use]
pub fn rfc1123_date_time() -> ArcCodec<DateTime<FixedOffset>> {
    Arc::new(Rfc1123Codec)
}

/// A time of day with a UTC offset.
///
/// chrono has no offset-aware time-of-day type, so this crate carries its
/// own for the ISO-8601 offset time format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTime {
    /// The local time of day.
    pub time: NaiveTime,
    /// The UTC offset the time is expressed in.
    pub offset: FixedOffset,
}

impl OffsetTime {
    /// Pair a time of day with a UTC offset.
    #[must_use]
    pub const fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time.format(LOCAL_TIME_FMT), self.offset)
    }
}

impl FromStr for OffsetTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(local) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
            let time = NaiveTime::parse_from_str(local, LOCAL_TIME_FMT)?;
            return Ok(Self::new(time, Utc.fix()));
        }
        let mut parsed = Parsed::new();
        parse(&mut parsed, s, StrftimeItems::new(OFFSET_TIME_FMT))?;
        Ok(Self::new(parsed.to_naive_time()?, parsed.to_fixed_offset()?))
    }
}

struct OffsetDateTimeCodec;

impl JsonCodec<DateTime<FixedOffset>> for OffsetDateTimeCodec {
    fn encode(&self, value: &DateTime<FixedOffset>) -> Result<Value, EncodeError> {
        Ok(Value::String(value.to_rfc3339()))
    }

    fn decode(&self, value: &Value) -> Result<DateTime<FixedOffset>, DecodeError> {
        let text = expect_text(value)?;
        DateTime::parse_from_rfc3339(text)
            .map_err(|_| DecodeError::format(text, ISO_OFFSET_DATE_TIME))
    }
}

struct OffsetTimeCodec;

impl JsonCodec<OffsetTime> for OffsetTimeCodec {
    fn encode(&self, value: &OffsetTime) -> Result<Value, EncodeError> {
        Ok(Value::String(value.to_string()))
    }

    fn decode(&self, value: &Value) -> Result<OffsetTime, DecodeError> {
        let text = expect_text(value)?;
        text.parse()
            .map_err(|_| DecodeError::format(text, ISO_OFFSET_TIME))
    }
}

struct LocalDateTimeCodec;

impl JsonCodec<NaiveDateTime> for LocalDateTimeCodec {
    fn encode(&self, value: &NaiveDateTime) -> Result<Value, EncodeError> {
        Ok(Value::String(value.format(LOCAL_DATE_TIME_FMT).to_string()))
    }

    fn decode(&self, value: &Value) -> Result<NaiveDateTime, DecodeError> {
        let text = expect_text(value)?;
        NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME_FMT)
            .map_err(|_| DecodeError::format(text, ISO_LOCAL_DATE_TIME))
    }
}

struct LocalDateCodec;

impl JsonCodec<NaiveDate> for LocalDateCodec {
    fn encode(&self, value: &NaiveDate) -> Result<Value, EncodeError> {
        Ok(Value::String(value.format(LOCAL_DATE_FMT).to_string()))
    }

    fn decode(&self, value: &Value) -> Result<NaiveDate, DecodeError> {
        let text = expect_text(value)?;
        NaiveDate::parse_from_str(text, LOCAL_DATE_FMT)
            .map_err(|_| DecodeError::format(text, ISO_LOCAL_DATE))
    }
}

struct LocalTimeCodec;

impl JsonCodec<NaiveTime> for LocalTimeCodec {
    fn encode(&self, value: &NaiveTime) -> Result<Value, EncodeError> {
        Ok(Value::String(value.format(LOCAL_TIME_FMT).to_string()))
    }

    fn decode(&self, value: &Value) -> Result<NaiveTime, DecodeError> {
        let text = expect_text(value)?;
        NaiveTime::parse_from_str(text, LOCAL_TIME_FMT)
            .map_err(|_| DecodeError::format(text, ISO_LOCAL_TIME))
    }
}

struct Rfc1123Codec;

impl JsonCodec<DateTime<FixedOffset>> for Rfc1123Codec {
    fn encode(&self, value: &DateTime<FixedOffset>) -> Result<Value, EncodeError> {
        Ok(Value::String(value.to_rfc2822()))
    }

    fn decode(&self, value: &Value) -> Result<DateTime<FixedOffset>, DecodeError> {
        let text = expect_text(value)?;
        DateTime::parse_from_rfc2822(text)
            .map_err(|_| DecodeError::format(text, RFC_1123_DATE_TIME))
    }
}

fn expect_text(value: &Value) -> Result<&str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| DecodeError::mismatch(JsonShape::String, value))
}
