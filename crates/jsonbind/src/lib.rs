//! # jsonbind
//!
//! Name-resolution and codec-derivation engine: record types and
//! enumerations to-and-from an already-parsed JSON value tree, with no hand-written
//! per-field code at the call site.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Design
//!
//! All derivation work happens once, at codec construction: identifiers run
//! through a [`Strategy`] to produce JSON keys, keys are collected into a
//! collision-checked [`table::KeyTable`], and the result is an immutable
//! codec that is safe for unsynchronized concurrent use. Construction
//! failures ([`BuildError`]) are never silently ignored; a type with broken
//! metadata has no codec.
//!
//! At run time, flow is symmetric and pure: encode walks host values into a
//! JSON tree, decode walks a JSON tree into host values, consulting the key
//! table for lookup. Decode failures ([`DecodeError`]) accumulate member
//! context as they propagate, so a nested failure reports the dotted path to
//! the failing leaf. Encode-side contract violations use a distinct channel
//! ([`EncodeError`]) and can never be mistaken for decode conditions.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

mod codec;
pub mod codecs;
mod enums;
mod error;
mod naming;
mod object;
pub mod registry;
pub mod table;
pub mod time;

pub use codec::{ArcCodec, JsonCodec};
pub use enums::{CaseMode, EnumCodec, EnumCodecBuilder};
pub use error::{BuildError, DecodeError, EncodeError, JsonShape};
pub use naming::{derive_key, Strategy};
pub use object::{FieldHandle, FieldView, ObjectCodec, ObjectCodecBuilder};
