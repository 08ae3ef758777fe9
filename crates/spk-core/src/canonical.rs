//! # Canonical Serialization: Object Id Input
//!
//! This module defines `CanonicalBytes`, the sole construction path for
//! bytes that are hashed into an object id.
//!
//! ## Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which renders the node
//! through the canonical pipeline:
//!
//! 1. **Drop the id**: the `id` header field is the output of hashing and
//!    never part of its input.
//! 2. **Drop transient members**: names starting with `__` (for example
//!    the schema version field) do not contribute to identity.
//! 3. **Reject non-finite floats**: NaN and infinities have no JSON form.
//! 4. **JCS**: serialization uses `serde_jcs` for RFC 8785 output with
//!    sorted keys and compact separators.
//!
//! Nested nodes are canonicalized with the same rules, so a parent's id
//! depends on its children's content but not on their ids.

use serde_json::{Map, Number};

use crate::base::{Base, ID_FIELD};
use crate::error::CanonicalizationError;
use crate::value::Value;

/// Prefix of members excluded from hashing.
pub const TRANSIENT_PREFIX: &str = "__";

/// Bytes produced exclusively by the canonical node pipeline.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - The `id` field and `__`-prefixed members are absent at every depth.
/// - Keys are sorted and separators compact (RFC 8785).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from an object node.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::NonFiniteFloat` if any member holds
    /// NaN or an infinity. Returns `CanonicalizationError::SerializationFailed`
    /// if JCS serialization fails.
    pub fn new(base: &Base) -> Result<Self, CanonicalizationError> {
        let value = canonical_node(base)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for hashing.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn canonical_node(base: &Base) -> Result<serde_json::Value, CanonicalizationError> {
    let mut out = Map::new();
    let header = [
        (crate::base::SPECKLE_TYPE_FIELD, Value::from(base.speckle_type())),
        (
            crate::base::APPLICATION_ID_FIELD,
            Value::from(base.application_id()),
        ),
    ];
    for (name, value) in header {
        out.insert(name.to_string(), canonical_value(name, &value)?);
    }
    for (name, value) in base.members(crate::base::MemberKind::All) {
        if name == ID_FIELD || name.starts_with(TRANSIENT_PREFIX) {
            continue;
        }
        out.insert(name.to_string(), canonical_value(name, value)?);
    }
    Ok(serde_json::Value::Object(out))
}

fn canonical_value(
    member: &str,
    value: &Value,
) -> Result<serde_json::Value, CanonicalizationError> {
    Ok(match value {
        Value::Float(f) => {
            let n = Number::from_f64(*f).ok_or_else(|| CanonicalizationError::NonFiniteFloat {
                member: member.to_string(),
                value: *f,
            })?;
            serde_json::Value::Number(n)
        }
        Value::Node(n) => canonical_node(n)?,
        Value::List(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|v| canonical_value(member, v))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(m) => {
            let mut out = Map::new();
            for (k, v) in m {
                out.insert(k.clone(), canonical_value(k, v)?);
            }
            serde_json::Value::Object(out)
        }
        primitive => primitive.to_json(),
    })
}
