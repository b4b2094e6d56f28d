//! Error types for jsonbind with categorization:
//!
//! - **Build errors**: metadata problems caught at codec construction (fatal
//!   for that codec, never silently ignored)
//! - **Decode errors**: shape or content mismatches at decode time
//!   (recoverable by the caller)
//! - **Encode errors**: programming-contract violations surfaced on a channel
//!   distinct from decode failures
//!
//! Decode errors accumulate member context as they propagate, so a deeply
//! nested failure reports the full path from root to leaf.

use serde_json::Value;
use thiserror::Error;

/// The shape of a JSON value, used in mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum JsonShape {
    /// A JSON object (string-keyed map).
    Object,
    /// A JSON array.
    Array,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// JSON null.
    Null,
}

impl JsonShape {
    /// Classify a JSON value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }
}

/// Construction-time errors.
///
/// A codec whose metadata fails these checks is never produced; the type
/// cannot be registered until the metadata is fixed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The same decode key is claimed by two different members.
    #[error("key `{key}` is claimed by both `{first}` and `{second}`")]
    KeyCollision {
        /// The effective decode key that collided.
        key: String,
        /// Member that claimed the key first (declaration order).
        first: String,
        /// Member that claimed the key second.
        second: String,
    },

    /// An enum codec was built with no variants registered.
    #[error("enum codec has no variants")]
    EmptyEnum,
}

/// Decode-time errors.
///
/// All variants are recoverable by the caller; no partial value is ever
/// returned alongside one of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The JSON value has the wrong shape for the target.
    #[error("expected {expected}, found {actual}")]
    TypeMismatch {
        /// Shape the codec required.
        expected: JsonShape,
        /// Shape the input actually had.
        actual: JsonShape,
    },

    /// A required member had no accepted key present in the input object.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Host member identifier.
        field: String,
    },

    /// An enum decode saw a string that matches no variant key.
    #[error("no such variant `{value}`")]
    NoSuchVariant {
        /// The unrecognized input string.
        value: String,
    },

    /// A nested failure, wrapped with the owning member's identity.
    #[error("field `{field}`: {source}")]
    Field {
        /// Host member identifier that owns the failing value.
        field: String,
        /// The underlying failure, with its own context preserved.
        #[source]
        source: Box<DecodeError>,
    },

    /// A textual sub-codec could not parse its input.
    #[error("cannot parse `{text}` as {expected}")]
    Format {
        /// The offending input text, preserved for diagnostics.
        text: String,
        /// Fixed identifier of the expected format.
        expected: &'static str,
    },
}

impl DecodeError {
    /// Build a [`DecodeError::TypeMismatch`] against an actual value.
    #[must_use]
    pub const fn mismatch(expected: JsonShape, actual: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            actual: JsonShape::of(actual),
        }
    }

    /// Wrap a nested failure with the owning member's identity.
    #[must_use]
    pub fn field(member: impl Into<String>, cause: Self) -> Self {
        Self::Field {
            field: member.into(),
            source: Box::new(cause),
        }
    }

    /// Build a [`DecodeError::Format`] preserving the offending text.
    #[must_use]
    pub fn format(text: impl Into<String>, expected: &'static str) -> Self {
        Self::Format {
            text: text.into(),
            expected,
        }
    }

    /// Dotted member path from the decode root to the failing leaf.
    ///
    /// Returns `None` when the error carries no member context (it occurred
    /// at the root). Sequence indices render as `[i]` and attach without a
    /// separating dot.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        match self {
            Self::Field { field, source } => Some(match source.path() {
                Some(rest) if rest.starts_with('[') => format!("{field}{rest}"),
                Some(rest) => format!("{field}.{rest}"),
                None => field.clone(),
            }),
            _ => None,
        }
    }

    /// The innermost failure, with all member context stripped.
    #[must_use]
    pub fn leaf(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.leaf(),
            other => other,
        }
    }
}

/// Encode-side programming-contract violations.
///
/// Encode is total for well-formed values; these arise only when a value
/// breaks an upstream invariant. They are deliberately a separate type so a
/// caller can never confuse them with recoverable decode conditions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EncodeError {
    /// An enum value was never registered with its codec's builder.
    #[error("value of `{type_name}` has no registered variant key")]
    UnregisteredVariant {
        /// Host type whose codec was misbuilt.
        type_name: &'static str,
    },

    /// A floating-point value has no JSON number representation.
    #[error("number {value} is not representable in JSON")]
    NonFiniteNumber {
        /// The offending value (NaN or an infinity).
        value: f64,
    },
}
