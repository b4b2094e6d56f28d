//! The codec seam: paired encode/decode behavior for one host type.
//!
//! A codec is stateless and pure after construction. Sharing one
//! [`ArcCodec`] across arbitrarily many concurrent encode/decode callers is
//! safe: there is no interior mutability on the hot path.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{DecodeError, EncodeError};

/// Paired encode/decode behavior over an already-parsed JSON value tree.
///
/// Implementations must be pure: no I/O, no blocking, no shared mutable
/// state. `encode` is total for well-formed values; an [`EncodeError`] is a
/// programming-contract violation, not a recoverable decode condition.
pub trait JsonCodec<V>: Send + Sync {
    /// Encode a host value into a JSON value tree.
    fn encode(&self, value: &V) -> Result<Value, EncodeError>;

    /// Decode a JSON value tree into a host value.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] describing the shape or content mismatch;
    /// nested failures carry the full member path to the failing leaf.
    fn decode(&self, value: &Value) -> Result<V, DecodeError>;
}

/// A shared, immutable codec handle.
///
/// Cloning is cheap; clones observe the same construction-time tables.
pub type ArcCodec<V> = Arc<dyn JsonCodec<V>>;
