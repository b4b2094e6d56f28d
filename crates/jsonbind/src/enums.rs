//! Enum codecs: a closed set of named constants to-and-from JSON strings.
//!
//! Each constant is associated with exactly one key via the naming strategy;
//! enums take no overrides and no alternative keys. Case-insensitive decode
//! is implemented with a case-folded secondary index built once at
//! construction, so the decode path stays O(1) average; encode always emits
//! the canonical-case key.

use std::{any, collections::HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    codec::JsonCodec,
    error::{BuildError, DecodeError, EncodeError, JsonShape},
    naming::{derive_key, Strategy},
};

/// Whether enum decode comparison folds case.
///
/// Applies only to decoding: encode emits the canonical-case key stored at
/// construction regardless of mode.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CaseMode {
    /// Decode keys match exactly.
    #[default]
    Sensitive,
    /// Decode keys match after case folding.
    Insensitive,
}

/// Encode/decode pair for a closed set of named constants.
pub struct EnumCodec<T> {
    variants: Vec<(T, String)>,
    canonical: HashMap<String, usize>,
    folded: Option<HashMap<String, usize>>,
}

impl<T> EnumCodec<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start building an enum codec under a strategy and case mode.
    #[must_use]
    pub fn builder(strategy: Strategy, case_mode: CaseMode) -> EnumCodecBuilder<T> {
        EnumCodecBuilder {
            strategy,
            case_mode,
            variants: Vec::new(),
        }
    }

    /// The case mode this codec was built with.
    #[must_use]
    pub fn case_mode(&self) -> CaseMode {
        if self.folded.is_some() {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        }
    }

    /// The canonical key for a registered value, if any.
    #[must_use]
    pub fn key_of(&self, value: &T) -> Option<&str> {
        self.variants
            .iter()
            .find(|(variant, _)| variant == value)
            .map(|(_, key)| key.as_str())
    }
}

impl<T> JsonCodec<T> for EnumCodec<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn encode(&self, value: &T) -> Result<Value, EncodeError> {
        self.key_of(value)
            .map(|key| Value::String(key.to_string()))
            .ok_or_else(|| EncodeError::UnregisteredVariant {
                type_name: any::type_name::<T>(),
            })
    }

    fn decode(&self, value: &Value) -> Result<T, DecodeError> {
        let text = value
            .as_str()
            .ok_or_else(|| DecodeError::mismatch(JsonShape::String, value))?;
        let position = match &self.folded {
            Some(folded) => folded.get(text.to_lowercase().as_str()).copied(),
            None => self.canonical.get(text).copied(),
        };
        position
            .and_then(|i| self.variants.get(i))
            .map(|(variant, _)| variant.clone())
            .ok_or_else(|| DecodeError::NoSuchVariant {
                value: text.to_string(),
            })
    }
}

/// Builder collecting `(constant name, value)` pairs.
#[must_use]
pub struct EnumCodecBuilder<T> {
    strategy: Strategy,
    case_mode: CaseMode,
    variants: Vec<(String, T)>,
}

impl<T> EnumCodecBuilder<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Register a constant under its source-code name.
    pub fn variant(mut self, name: impl Into<String>, value: T) -> Self {
        self.variants.push((name.into(), value));
        self
    }

    /// Derive keys and build the codec.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::KeyCollision`] when two constants collapse to
    /// the same decode key (after case folding under
    /// [`CaseMode::Insensitive`]), and [`BuildError::EmptyEnum`] when no
    /// variant was registered.
    pub fn build(self) -> Result<EnumCodec<T>, BuildError> {
        if self.variants.is_empty() {
            return Err(BuildError::EmptyEnum);
        }

        let mut names: Vec<String> = Vec::with_capacity(self.variants.len());
        let mut variants = Vec::with_capacity(self.variants.len());
        let mut canonical: HashMap<String, usize> = HashMap::new();
        let mut folded: Option<HashMap<String, usize>> =
            matches!(self.case_mode, CaseMode::Insensitive).then(HashMap::new);

        for (pos, (name, value)) in self.variants.into_iter().enumerate() {
            let key = derive_key(&name, self.strategy);

            if let Some(&claimed) = canonical.get(&key) {
                return Err(collision(&key, names.get(claimed), &name));
            }
            if let Some(folded_index) = folded.as_mut() {
                let fold = key.to_lowercase();
                if let Some(&claimed) = folded_index.get(&fold) {
                    return Err(collision(&fold, names.get(claimed), &name));
                }
                folded_index.insert(fold, pos);
            }

            canonical.insert(key.clone(), pos);
            names.push(name);
            variants.push((value, key));
        }

        debug!(
            type_name = any::type_name::<T>(),
            variants = variants.len(),
            case_mode = %self.case_mode,
            "enum codec built"
        );
        Ok(EnumCodec {
            variants,
            canonical,
            folded,
        })
    }
}

fn collision(key: &str, first: Option<&String>, second: &str) -> BuildError {
    BuildError::KeyCollision {
        key: key.to_string(),
        first: first.cloned().unwrap_or_default(),
        second: second.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fixture {
        A,
        B,
        HelloWorld,
    }

    fn underscore(case_mode: CaseMode) -> Result<EnumCodec<Fixture>, BuildError> {
        EnumCodec::builder(Strategy::Underscore, case_mode)
            .variant("A", Fixture::A)
            .variant("B", Fixture::B)
            .variant("HelloWorld", Fixture::HelloWorld)
            .build()
    }

    #[test]
    fn test_encode_emits_derived_keys() -> Result<(), BuildError> {
        let codec = underscore(CaseMode::Sensitive)?;
        assert!(matches!(codec.encode(&Fixture::A), Ok(Value::String(s)) if s == "a"));
        assert!(
            matches!(codec.encode(&Fixture::HelloWorld), Ok(Value::String(s)) if s == "hello_world")
        );
        Ok(())
    }

    #[test]
    fn test_sensitive_decode_requires_exact_case() -> Result<(), BuildError> {
        let codec = underscore(CaseMode::Sensitive)?;
        assert_eq!(codec.decode(&json!("hello_world")), Ok(Fixture::HelloWorld));
        assert!(matches!(
            codec.decode(&json!("HELLO_WORLD")),
            Err(DecodeError::NoSuchVariant { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_insensitive_decode_accepts_any_case_but_encodes_canonically() -> Result<(), BuildError>
    {
        let codec = underscore(CaseMode::Insensitive)?;
        assert_eq!(codec.decode(&json!("HELLO_WORLD")), Ok(Fixture::HelloWorld));
        assert_eq!(codec.decode(&json!("Hello_World")), Ok(Fixture::HelloWorld));
        assert!(
            matches!(codec.encode(&Fixture::HelloWorld), Ok(Value::String(s)) if s == "hello_world")
        );
        Ok(())
    }

    #[test]
    fn test_decode_rejects_non_strings() -> Result<(), BuildError> {
        let codec = underscore(CaseMode::Sensitive)?;
        assert!(matches!(
            codec.decode(&json!(7)),
            Err(DecodeError::TypeMismatch {
                expected: JsonShape::String,
                actual: JsonShape::Number,
            })
        ));
        Ok(())
    }

    #[test]
    fn test_folded_collision_is_rejected_at_build() {
        let result = EnumCodec::builder(Strategy::Identity, CaseMode::Insensitive)
            .variant("Ab", 0_u8)
            .variant("AB", 1_u8)
            .build();
        assert!(matches!(
            result,
            Err(BuildError::KeyCollision { ref key, ref first, ref second })
                if key == "ab" && first == "Ab" && second == "AB"
        ));
    }

    #[test]
    fn test_empty_builder_is_rejected() {
        let result = EnumCodec::<()>::builder(Strategy::Identity, CaseMode::Sensitive).build();
        assert!(matches!(result, Err(BuildError::EmptyEnum)));
    }
}
