//! Key tables: the per-type mapping between members and JSON keys.
//!
//! A [`KeyTable`] is built once from member descriptors and a
//! [`Strategy`], validated for collisions at construction, and immutable for
//! the lifetime of the owning codec. Decode looks keys up through an exact
//! string index; precedence among a member's accepted keys is its declared
//! order (primary first, then alternatives).

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    error::BuildError,
    naming::{derive_key, Strategy},
};

// ═══════════════════════════════════════════════════════════════════════════
// MEMBER DESCRIPTORS
// ═══════════════════════════════════════════════════════════════════════════

/// Per-member metadata consumed by the derivation pipeline.
///
/// This is the explicit descriptor record that stands in for
/// annotation/reflection metadata: identifier, optional explicit key
/// override, ordered alternative decode keys, and an optionality flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Host member identifier.
    pub name: String,
    /// Explicit key override; when absent the key is derived from `name`.
    pub key_override: Option<String>,
    /// Additional accepted decode keys, in declaration order.
    pub alternatives: Vec<String>,
    /// Whether the member may be absent from the input object.
    pub optional: bool,
}

impl FieldSpec {
    /// Descriptor for a required member.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_override: None,
            alternatives: Vec::new(),
            optional: false,
        }
    }

    /// Descriptor for an optional member.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::required(name)
        }
    }

    /// Override the derived key with an explicit one.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key_override = Some(key.into());
        self
    }

    /// Append an accepted alternative decode key.
    #[must_use]
    pub fn with_alternative(mut self, key: impl Into<String>) -> Self {
        self.alternatives.push(key.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// KEY TABLE
// ═══════════════════════════════════════════════════════════════════════════

/// One member's resolved keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    /// Host member identifier.
    pub member: String,
    /// The key written on encode; also the highest-precedence decode key.
    pub primary: String,
    /// Further accepted decode keys, in declaration order.
    pub alternatives: Vec<String>,
    /// Whether the member may be absent on decode.
    pub optional: bool,
}

impl KeyEntry {
    /// Accepted decode keys in precedence order: primary first, then
    /// alternatives as declared.
    pub fn decode_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

/// Immutable member to-and-from key mapping for one type.
#[derive(Debug, Clone)]
pub struct KeyTable {
    entries: Vec<KeyEntry>,
    index: HashMap<String, usize>,
}

impl KeyTable {
    /// Build a table from member descriptors under a naming strategy.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::KeyCollision`] when the same decode key appears
    /// in two different members' accepted-key sets. A key repeated within a
    /// single member's own set is not a collision.
    pub fn build(specs: &[FieldSpec], strategy: Strategy) -> Result<Self, BuildError> {
        let mut entries = Vec::with_capacity(specs.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for (pos, spec) in specs.iter().enumerate() {
            let primary = spec
                .key_override
                .clone()
                .unwrap_or_else(|| derive_key(&spec.name, strategy));
            let entry = KeyEntry {
                member: spec.name.clone(),
                primary,
                alternatives: spec.alternatives.clone(),
                optional: spec.optional,
            };

            for key in entry.decode_keys() {
                match index.get(key) {
                    Some(&claimed) if claimed != pos => {
                        let first = entries
                            .get(claimed)
                            .map_or_else(String::new, |e: &KeyEntry| e.member.clone());
                        return Err(BuildError::KeyCollision {
                            key: key.to_string(),
                            first,
                            second: spec.name.clone(),
                        });
                    }
                    _ => {
                        index.insert(key.to_string(), pos);
                    }
                }
            }

            trace!(
                member = %entry.member,
                keys = %entry.decode_keys().join(", "),
                "member keys resolved"
            );
            entries.push(entry);
        }

        debug!(members = entries.len(), ?strategy, "key table built");
        Ok(Self { entries, index })
    }

    /// Exact-match decode-key lookup.
    ///
    /// Case sensitivity is a property of the caller's comparison; enum
    /// codecs layer their case-folded secondary index on top of this.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<(usize, &KeyEntry)> {
        self.index
            .get(key)
            .and_then(|&i| self.entries.get(i).map(|entry| (i, entry)))
    }

    /// All entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    /// Number of members in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_is_derived_from_strategy() -> Result<(), BuildError> {
        let specs = [FieldSpec::required("createdAt")];
        let table = KeyTable::build(&specs, Strategy::Underscore)?;
        let resolved = table.resolve("created_at");
        assert!(matches!(resolved, Some((0, entry)) if entry.member == "createdAt"));
        Ok(())
    }

    #[test]
    fn test_override_beats_derivation() -> Result<(), BuildError> {
        let specs = [FieldSpec::required("createdAt").with_key("ts")];
        let table = KeyTable::build(&specs, Strategy::Underscore)?;
        assert!(table.resolve("ts").is_some());
        assert!(table.resolve("created_at").is_none());
        Ok(())
    }

    #[test]
    fn test_alternatives_resolve_to_the_same_member() -> Result<(), BuildError> {
        let specs = [FieldSpec::required("name")
            .with_alternative("old_name")
            .with_alternative("older_name")];
        let table = KeyTable::build(&specs, Strategy::Underscore)?;
        assert!(matches!(table.resolve("old_name"), Some((0, _))));
        assert!(matches!(table.resolve("older_name"), Some((0, _))));
        Ok(())
    }

    #[test]
    fn test_decode_keys_preserve_precedence_order() {
        let entry = KeyEntry {
            member: "name".to_string(),
            primary: "name".to_string(),
            alternatives: vec!["old_name".to_string(), "older_name".to_string()],
            optional: false,
        };
        let keys: Vec<&str> = entry.decode_keys().collect();
        assert_eq!(keys, ["name", "old_name", "older_name"]);
    }

    #[test]
    fn test_cross_member_collision_is_rejected() {
        let specs = [
            FieldSpec::required("userName"),
            FieldSpec::required("user_name"),
        ];
        let err = KeyTable::build(&specs, Strategy::Underscore);
        assert!(matches!(
            err,
            Err(BuildError::KeyCollision { ref key, ref first, ref second })
                if key == "user_name" && first == "userName" && second == "user_name"
        ));
    }

    #[test]
    fn test_alternative_colliding_with_other_primary_is_rejected() {
        let specs = [
            FieldSpec::required("id"),
            FieldSpec::required("ident").with_alternative("id"),
        ];
        assert!(matches!(
            KeyTable::build(&specs, Strategy::Identity),
            Err(BuildError::KeyCollision { .. })
        ));
    }

    #[test]
    fn test_key_repeated_within_one_member_is_allowed() -> Result<(), BuildError> {
        let specs = [FieldSpec::required("name").with_alternative("name")];
        let table = KeyTable::build(&specs, Strategy::Identity)?;
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_table_builds() -> Result<(), BuildError> {
        let table = KeyTable::build(&[], Strategy::Identity)?;
        assert!(table.is_empty());
        Ok(())
    }
}
