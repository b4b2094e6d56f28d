//! Primitive and combinator codecs.
//!
//! These are the leaves members compose from: JSON scalars, value-or-null,
//! sequences, string-keyed dictionaries, and a lazy wrapper for
//! self-referential object graphs.

use std::{
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};

use serde_json::{Number, Value};

use crate::{
    codec::{ArcCodec, JsonCodec},
    error::{DecodeError, EncodeError, JsonShape},
};

/// Codec for JSON strings.
#[must_use]
pub fn string() -> ArcCodec<String> {
    Arc::new(StringCodec)
}

/// Codec for JSON booleans.
#[must_use]
pub fn boolean() -> ArcCodec<bool> {
    Arc::new(BoolCodec)
}

/// Codec for signed 64-bit integers.
#[must_use]
pub fn int64() -> ArcCodec<i64> {
    Arc::new(Int64Codec)
}

/// Codec for unsigned 64-bit integers.
#[must_use]
pub fn uint64() -> ArcCodec<u64> {
    Arc::new(Uint64Codec)
}

/// Codec for 64-bit floats. Encoding NaN or an infinity is a contract
/// violation: JSON has no representation for them.
#[must_use]
pub fn float64() -> ArcCodec<f64> {
    Arc::new(Float64Codec)
}

/// Identity codec over raw JSON values.
#[must_use]
pub fn json() -> ArcCodec<Value> {
    Arc::new(JsonValueCodec)
}

/// Value-or-null wrapper: `None` to-and-from JSON null.
///
/// This is the member-codec policy that maps absence to null, as opposed to
/// the object layer's optionality, which omits the key entirely.
#[must_use]
pub fn nullable<V: 'static>(inner: ArcCodec<V>) -> ArcCodec<Option<V>> {
    Arc::new(NullableCodec { inner })
}

/// Sequence codec: `Vec<V>` to-and-from JSON array. Element failures carry the index.
#[must_use]
pub fn sequence<V: 'static>(inner: ArcCodec<V>) -> ArcCodec<Vec<V>> {
    Arc::new(SequenceCodec { inner })
}

/// Dictionary codec: `BTreeMap<String, V>` to-and-from JSON object. Entry failures
/// carry the offending key.
#[must_use]
pub fn dictionary<V: 'static>(inner: ArcCodec<V>) -> ArcCodec<BTreeMap<String, V>> {
    Arc::new(DictionaryCodec { inner })
}

/// Deferred codec for recursive compositions.
///
/// `init` runs once, on first use; until then the codec is a placeholder, so
/// a type may refer to its own codec while that codec is still being built.
#[must_use]
pub fn lazy<V, F>(init: F) -> ArcCodec<V>
where
    V: 'static,
    F: Fn() -> ArcCodec<V> + Send + Sync + 'static,
{
    Arc::new(LazyCodec {
        cell: OnceLock::new(),
        init: Box::new(init),
    })
}

struct StringCodec;

impl JsonCodec<String> for StringCodec {
    fn encode(&self, value: &String) -> Result<Value, EncodeError> {
        Ok(Value::String(value.clone()))
    }

    fn decode(&self, value: &Value) -> Result<String, DecodeError> {
        value
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| DecodeError::mismatch(JsonShape::String, value))
    }
}

struct BoolCodec;

impl JsonCodec<bool> for BoolCodec {
    fn encode(&self, value: &bool) -> Result<Value, EncodeError> {
        Ok(Value::Bool(*value))
    }

    fn decode(&self, value: &Value) -> Result<bool, DecodeError> {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::mismatch(JsonShape::Boolean, value))
    }
}

struct Int64Codec;

impl JsonCodec<i64> for Int64Codec {
    fn encode(&self, value: &i64) -> Result<Value, EncodeError> {
        Ok(Value::Number(Number::from(*value)))
    }

    fn decode(&self, value: &Value) -> Result<i64, DecodeError> {
        decode_number(value, Value::as_i64, "signed 64-bit integer")
    }
}

struct Uint64Codec;

impl JsonCodec<u64> for Uint64Codec {
    fn encode(&self, value: &u64) -> Result<Value, EncodeError> {
        Ok(Value::Number(Number::from(*value)))
    }

    fn decode(&self, value: &Value) -> Result<u64, DecodeError> {
        decode_number(value, Value::as_u64, "unsigned 64-bit integer")
    }
}

struct Float64Codec;

impl JsonCodec<f64> for Float64Codec {
    fn encode(&self, value: &f64) -> Result<Value, EncodeError> {
        Number::from_f64(*value)
            .map(Value::Number)
            .ok_or(EncodeError::NonFiniteNumber { value: *value })
    }

    fn decode(&self, value: &Value) -> Result<f64, DecodeError> {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::mismatch(JsonShape::Number, value))
    }
}

/// Shared number-decode policy: a non-number is a shape mismatch; a number
/// outside the target width is a format failure preserving the rendering.
fn decode_number<N>(
    value: &Value,
    narrow: impl Fn(&Value) -> Option<N>,
    expected: &'static str,
) -> Result<N, DecodeError> {
    match narrow(value) {
        Some(n) => Ok(n),
        None if value.is_number() => Err(DecodeError::format(value.to_string(), expected)),
        None => Err(DecodeError::mismatch(JsonShape::Number, value)),
    }
}

struct JsonValueCodec;

impl JsonCodec<Value> for JsonValueCodec {
    fn encode(&self, value: &Value) -> Result<Value, EncodeError> {
        Ok(value.clone())
    }

    fn decode(&self, value: &Value) -> Result<Value, DecodeError> {
        Ok(value.clone())
    }
}

struct NullableCodec<V> {
    inner: ArcCodec<V>,
}

impl<V: 'static> JsonCodec<Option<V>> for NullableCodec<V> {
    fn encode(&self, value: &Option<V>) -> Result<Value, EncodeError> {
        value
            .as_ref()
            .map_or(Ok(Value::Null), |inner| self.inner.encode(inner))
    }

    fn decode(&self, value: &Value) -> Result<Option<V>, DecodeError> {
        if value.is_null() {
            Ok(None)
        } else {
            self.inner.decode(value).map(Some)
        }
    }
}

struct SequenceCodec<V> {
    inner: ArcCodec<V>,
}

impl<V: 'static> JsonCodec<Vec<V>> for SequenceCodec<V> {
    fn encode(&self, value: &Vec<V>) -> Result<Value, EncodeError> {
        value
            .iter()
            .map(|element| self.inner.encode(element))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn decode(&self, value: &Value) -> Result<Vec<V>, DecodeError> {
        let elements = value
            .as_array()
            .ok_or_else(|| DecodeError::mismatch(JsonShape::Array, value))?;
        elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                self.inner
                    .decode(element)
                    .map_err(|cause| DecodeError::field(format!("[{i}]"), cause))
            })
            .collect()
    }
}

struct DictionaryCodec<V> {
    inner: ArcCodec<V>,
}

impl<V: 'static> JsonCodec<BTreeMap<String, V>> for DictionaryCodec<V> {
    fn encode(&self, value: &BTreeMap<String, V>) -> Result<Value, EncodeError> {
        let mut out = serde_json::Map::with_capacity(value.len());
        for (key, element) in value {
            out.insert(key.clone(), self.inner.encode(element)?);
        }
        Ok(Value::Object(out))
    }

    fn decode(&self, value: &Value) -> Result<BTreeMap<String, V>, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::mismatch(JsonShape::Object, value))?;
        object
            .iter()
            .map(|(key, element)| {
                self.inner
                    .decode(element)
                    .map(|decoded| (key.clone(), decoded))
                    .map_err(|cause| DecodeError::field(key.clone(), cause))
            })
            .collect()
    }
}

type LazyInit<V> = Box<dyn Fn() -> ArcCodec<V> + Send + Sync>;

struct LazyCodec<V> {
    cell: OnceLock<ArcCodec<V>>,
    init: LazyInit<V>,
}

impl<V> LazyCodec<V> {
    fn force(&self) -> &ArcCodec<V> {
        self.cell.get_or_init(|| (self.init)())
    }
}

impl<V: 'static> JsonCodec<V> for LazyCodec<V> {
    fn encode(&self, value: &V) -> Result<Value, EncodeError> {
        self.force().encode(value)
    }

    fn decode(&self, value: &Value) -> Result<V, DecodeError> {
        self.force().decode(value)
    }
}
