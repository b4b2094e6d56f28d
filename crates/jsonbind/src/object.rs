//! Object codecs: record types to-and-from JSON objects.
//!
//! An [`ObjectCodec`] is assembled from an explicit descriptor list the host
//! type populates through [`ObjectCodecBuilder`]: each member binds a JSON
//! key (derived, overridden, or aliased), a nested value codec, and a getter
//! for encoding. Decoding fills one slot per member and hands the slots to an
//! `assemble` closure that reconstructs the host value through typed
//! [`FieldHandle`]s.
//!
//! # Decode policy
//!
//! - Non-object input is a [`DecodeError::TypeMismatch`].
//! - Per member, the first *present* key in the member's declared precedence
//!   order (primary, then aliases in declaration order) wins - a
//!   deterministic tie-break when several accepted spellings appear in the
//!   same input object.
//! - A required member with no accepted key present fails with
//!   [`DecodeError::MissingField`]; an optional member defaults to absent.
//! - A nested failure is wrapped with the owning member's identity and
//!   propagated; decoding never skips a malformed field.
//! - Unrecognized keys are ignored (forward-compatible decoding).
//!
//! # Example
//!
//! ```rust
//! use jsonbind::{codecs, JsonCodec, ObjectCodec, Strategy};
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     user_name: String,
//!     login_count: i64,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bind = ObjectCodec::builder(Strategy::Underscore);
//! let user_name = bind.required("userName", codecs::string(), |u: &User| &u.user_name);
//! let login_count = bind.required("loginCount", codecs::int64(), |u: &User| &u.login_count);
//! let codec = bind.build(move |fields| {
//!     Ok(User {
//!         user_name: fields.take(&user_name)?,
//!         login_count: fields.take(&login_count)?,
//!     })
//! })?;
//!
//! let encoded = codec.encode(&User { user_name: "ada".into(), login_count: 3 })?;
//! assert_eq!(encoded, serde_json::json!({"user_name": "ada", "login_count": 3}));
//! # Ok(())
//! # }
//! ```

use std::{any, any::Any, marker::PhantomData};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    codec::{ArcCodec, JsonCodec},
    error::{BuildError, DecodeError, EncodeError, JsonShape},
    naming::Strategy,
    table::{FieldSpec, KeyTable},
};

// ═══════════════════════════════════════════════════════════════════════════
// FIELD HANDLES & SLOT VIEW
// ═══════════════════════════════════════════════════════════════════════════

/// Typed handle to one bound member, returned by the builder and consumed by
/// the `assemble` closure to take the decoded value back out.
pub struct FieldHandle<V> {
    index: usize,
    name: String,
    _marker: PhantomData<fn() -> V>,
}

impl<V> Clone for FieldHandle<V> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<V> std::fmt::Debug for FieldHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldHandle")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}

type Slot = Box<dyn Any + Send>;

/// Decoded member slots, one per binding, consumed during assembly.
///
/// Each slot may be taken exactly once, through the handle the builder
/// returned for it. Taking a slot twice, or with a handle from a different
/// builder, reports the member as missing.
pub struct FieldView {
    slots: Vec<Option<Slot>>,
}

impl FieldView {
    /// Take the decoded value for a member.
    pub fn take<V: 'static>(&mut self, field: &FieldHandle<V>) -> Result<V, DecodeError> {
        self.slots
            .get_mut(field.index)
            .and_then(Option::take)
            .and_then(|slot| slot.downcast::<V>().ok())
            .map(|boxed| *boxed)
            .ok_or_else(|| DecodeError::MissingField {
                field: field.name.clone(),
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OBJECT CODEC
// ═══════════════════════════════════════════════════════════════════════════

type EncodeFn<T> = Box<dyn Fn(&T) -> Result<Option<Value>, EncodeError> + Send + Sync>;
type DecodeFn = Box<dyn Fn(&Value) -> Result<Slot, DecodeError> + Send + Sync>;
type AbsentFn = Box<dyn Fn() -> Slot + Send + Sync>;
type AssembleFn<T> = Box<dyn Fn(&mut FieldView) -> Result<T, DecodeError> + Send + Sync>;

struct FieldBinding<T> {
    encode: EncodeFn<T>,
    decode: DecodeFn,
    /// `Some` for optional members: produces the absent default slot.
    absent: Option<AbsentFn>,
}

/// Encode/decode pair for a record type, built from member descriptors, a
/// [`KeyTable`], and per-member nested codecs.
pub struct ObjectCodec<T> {
    table: KeyTable,
    bindings: Vec<FieldBinding<T>>,
    assemble: AssembleFn<T>,
}

impl<T> ObjectCodec<T>
where
    T: Send + Sync + 'static,
{
    /// Start building a codec for `T` under a naming strategy.
    #[must_use]
    pub fn builder(strategy: Strategy) -> ObjectCodecBuilder<T> {
        ObjectCodecBuilder {
            strategy,
            specs: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// The key table this codec resolves decode keys through.
    #[must_use]
    pub fn table(&self) -> &KeyTable {
        &self.table
    }
}

impl<T> JsonCodec<T> for ObjectCodec<T>
where
    T: Send + Sync + 'static,
{
    fn encode(&self, value: &T) -> Result<Value, EncodeError> {
        let mut out = Map::with_capacity(self.bindings.len());
        // Member write order = declaration order.
        for (binding, entry) in self.bindings.iter().zip(self.table.entries()) {
            if let Some(encoded) = (binding.encode)(value)? {
                out.insert(entry.primary.clone(), encoded);
            }
        }
        Ok(Value::Object(out))
    }

    fn decode(&self, value: &Value) -> Result<T, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::mismatch(JsonShape::Object, value))?;

        let mut slots: Vec<Option<Slot>> = Vec::with_capacity(self.bindings.len());
        for (binding, entry) in self.bindings.iter().zip(self.table.entries()) {
            // First present key in declared precedence order wins.
            let present = entry.decode_keys().find_map(|key| object.get(key));
            let slot = match (present, &binding.absent) {
                (Some(member), _) => (binding.decode)(member)
                    .map_err(|cause| DecodeError::field(&*entry.member, cause))?,
                (None, Some(absent)) => absent(),
                (None, None) => {
                    return Err(DecodeError::MissingField {
                        field: entry.member.clone(),
                    })
                }
            };
            slots.push(Some(slot));
        }

        (self.assemble)(&mut FieldView { slots })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILDER
// ═══════════════════════════════════════════════════════════════════════════

/// Builder collecting member bindings for an [`ObjectCodec`].
#[must_use]
pub struct ObjectCodecBuilder<T> {
    strategy: Strategy,
    specs: Vec<FieldSpec>,
    bindings: Vec<FieldBinding<T>>,
}

impl<T> ObjectCodecBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Builder with the default [`Strategy::Identity`].
    pub fn new() -> Self {
        ObjectCodec::builder(Strategy::default())
    }

    /// Bind a required member: its key must be present on decode.
    ///
    /// The getter borrows the member out of the host value for encoding.
    pub fn required<V, G>(
        &mut self,
        name: impl Into<String>,
        codec: ArcCodec<V>,
        get: G,
    ) -> FieldHandle<V>
    where
        V: Send + 'static,
        G: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        let name = name.into();
        let index = self.specs.len();
        self.specs.push(FieldSpec::required(name.clone()));

        let encode_codec = ArcCodec::clone(&codec);
        self.bindings.push(FieldBinding {
            encode: Box::new(move |value| encode_codec.encode(get(value)).map(Some)),
            decode: Box::new(move |member| codec.decode(member).map(boxed_slot)),
            absent: None,
        });

        FieldHandle {
            index,
            name,
            _marker: PhantomData,
        }
    }

    /// Bind an optional member: an absent key decodes to `None`, and a `None`
    /// value omits the key entirely on encode (never writes null - that is a
    /// member-codec policy, see [`crate::codecs::nullable`]).
    pub fn optional<V, G>(
        &mut self,
        name: impl Into<String>,
        codec: ArcCodec<V>,
        get: G,
    ) -> FieldHandle<Option<V>>
    where
        V: Send + 'static,
        G: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
    {
        let name = name.into();
        let index = self.specs.len();
        self.specs.push(FieldSpec::optional(name.clone()));

        let encode_codec = ArcCodec::clone(&codec);
        self.bindings.push(FieldBinding {
            encode: Box::new(move |value| {
                get(value)
                    .map(|member| encode_codec.encode(member))
                    .transpose()
            }),
            decode: Box::new(move |member| codec.decode(member).map(|v| boxed_slot(Some(v)))),
            absent: Some(Box::new(|| boxed_slot(None::<V>))),
        });

        FieldHandle {
            index,
            name,
            _marker: PhantomData,
        }
    }

    /// Replace a member's derived key with an explicit one.
    pub fn override_key<V>(&mut self, field: &FieldHandle<V>, key: impl Into<String>) {
        if let Some(spec) = self.specs.get_mut(field.index) {
            spec.key_override = Some(key.into());
        }
    }

    /// Accept an additional decode key for a member.
    ///
    /// Repeatable; declaration order is the precedence order among the
    /// member's accepted keys.
    pub fn alias<V>(&mut self, field: &FieldHandle<V>, key: impl Into<String>) {
        if let Some(spec) = self.specs.get_mut(field.index) {
            spec.alternatives.push(key.into());
        }
    }

    /// Derive keys, validate the table, and build the codec.
    ///
    /// `assemble` reconstructs the host value from the decoded slots via
    /// [`FieldView::take`] on the handles this builder returned.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::KeyCollision`] when two members' accepted-key
    /// sets intersect.
    pub fn build<F>(self, assemble: F) -> Result<ObjectCodec<T>, BuildError>
    where
        F: Fn(&mut FieldView) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        let table = KeyTable::build(&self.specs, self.strategy)?;
        debug!(
            type_name = any::type_name::<T>(),
            members = table.len(),
            "object codec built"
        );
        Ok(ObjectCodec {
            table,
            bindings: self.bindings,
            assemble: Box::new(assemble),
        })
    }
}

impl<T> Default for ObjectCodecBuilder<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn boxed_slot<V: Send + 'static>(value: V) -> Slot {
    Box::new(value)
}
