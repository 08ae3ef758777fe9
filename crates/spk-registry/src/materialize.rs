//! # JSON Materialization
//!
//! Turns an already-parsed JSON tree into object nodes using the resolver.
//! Every JSON object carrying a string `speckle_type` becomes a node
//! instantiated from its resolved descriptor; other objects become maps.
//!
//! The original discriminator string is kept on the node even when it
//! resolved to a less specific type, so re-serializing does not lose the
//! producer's typing. Byte-level decoding and detached-reference lookup
//! belong to the serializer, not to this module.

use spk_core::{Base, PropertyError, PropertyMap, Value, SPECKLE_TYPE_FIELD};

use crate::resolver::DiscriminatorResolver;

/// Convert a JSON value into a node value.
///
/// # Errors
///
/// Returns a [`PropertyError`] when an object key is not a valid member
/// name or a header field has the wrong JSON type.
pub fn materialize(
    json: &serde_json::Value,
    resolver: &DiscriminatorResolver,
) -> Result<Value, PropertyError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::List(
            items
                .iter()
                .map(|item| materialize(item, resolver))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(map) => {
            match map.get(SPECKLE_TYPE_FIELD).and_then(|v| v.as_str()) {
                Some(discriminator) => Value::node(materialize_node(discriminator, map, resolver)?),
                None => {
                    let mut out = PropertyMap::new();
                    for (k, v) in map {
                        out.insert(k.clone(), materialize(v, resolver)?);
                    }
                    Value::Map(out)
                }
            }
        }
    })
}

/// Convert a JSON object that must become a node.
///
/// A missing `speckle_type` materializes as `Base`.
///
/// # Errors
///
/// Same as [`materialize`].
pub fn materialize_object(
    map: &serde_json::Map<String, serde_json::Value>,
    resolver: &DiscriminatorResolver,
) -> Result<Base, PropertyError> {
    let discriminator = map
        .get(SPECKLE_TYPE_FIELD)
        .and_then(|v| v.as_str())
        .unwrap_or(spk_core::ROOT_TYPE_NAME);
    materialize_node(discriminator, map, resolver)
}

fn materialize_node(
    discriminator: &str,
    map: &serde_json::Map<String, serde_json::Value>,
    resolver: &DiscriminatorResolver,
) -> Result<Base, PropertyError> {
    let mut base = resolver.resolve(discriminator).instantiate();
    base.set_speckle_type(discriminator);
    for (k, v) in map {
        if k == SPECKLE_TYPE_FIELD {
            continue;
        }
        base.set(k, materialize(v, resolver)?)?;
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::kit::core_kit;
    use crate::TypeRegistry;

    fn resolver() -> DiscriminatorResolver {
        let registry = TypeRegistry::new();
        registry.initialize(&[core_kit()]).unwrap();
        registry.resolver().unwrap()
    }

    #[test]
    fn known_type_gets_declared_members() {
        let json = json!({
            "speckle_type": "Speckle.Core.Models.Collection",
            "name": "Level 1",
            "elements": [],
            "note": "extra"
        });
        let value = materialize(&json, &resolver()).unwrap();
        let node = value.as_node().unwrap();
        assert!(!node.is_dynamic("name"));
        assert!(!node.is_dynamic("collectionType"));
        assert!(node.is_dynamic("note"));
    }

    #[test]
    fn unknown_type_keeps_discriminator_and_data() {
        let json = json!({
            "speckle_type": "Objects.Future.Thing",
            "id": "abc",
            "payload": {"a": [1, 2.5, null]}
        });
        let value = materialize(&json, &resolver()).unwrap();
        let node = value.as_node().unwrap();
        assert_eq!(node.speckle_type(), "Objects.Future.Thing");
        assert_eq!(node.id(), Some("abc"));
        assert_eq!(node.get("payload").map(Value::to_json), Some(json!({"a": [1, 2.5, null]})));
    }

    #[test]
    fn plain_objects_become_maps() {
        let value = materialize(&json!({"k": {"speckle_type": "Base"}}), &resolver()).unwrap();
        let map = value.as_map().unwrap();
        assert!(map["k"].as_node().is_some());
    }

    #[test]
    fn invalid_member_name_is_an_error() {
        let json = json!({"speckle_type": "Base", "a.b": 1});
        assert!(materialize(&json, &resolver()).is_err());
    }

    #[test]
    fn object_without_discriminator_materializes_as_base() {
        let json = json!({"x": 1});
        let node = materialize_object(json.as_object().unwrap(), &resolver()).unwrap();
        assert_eq!(node.speckle_type(), "Base");
        assert_eq!(node.get("x"), Some(&Value::Int(1)));
    }
}
