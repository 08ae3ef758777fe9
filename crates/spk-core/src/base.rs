//! # Object Node
//!
//! `Base` is the universal dynamically-typed unit of the object model.
//!
//! A node has three header fields (`speckle_type`, `id`, `applicationId`),
//! an ordered set of *instance* members declared by its concrete type, and
//! an ordered map of *dynamic* members holding everything else. Access is
//! uniform: [`Base::get`] and [`Base::set`] check header fields first, then
//! instance members, then the dynamic map.
//!
//! ## Invariants
//!
//! - `speckle_type` is always a string.
//! - `id` and `applicationId` are strings or `Null`.
//! - Dynamic member names pass [`validate_prop_name`].
//! - Instance members are never removed; removing one resets it to `Null`.

use std::sync::Arc;

use crate::error::PropertyError;
use crate::value::{PropertyMap, Value};
use crate::version::{ParseVersionError, SchemaVersion};

/// Canonical name of the root node type every model type derives from.
pub const ROOT_TYPE_NAME: &str = "Base";

/// Field carrying the type discriminator.
pub const SPECKLE_TYPE_FIELD: &str = "speckle_type";

/// Field carrying the content-derived object id.
pub const ID_FIELD: &str = "id";

/// Field carrying the host application's own identifier.
pub const APPLICATION_ID_FIELD: &str = "applicationId";

/// Reserved field carrying the dotted schema version of the node's data.
pub const SCHEMA_VERSION_FIELD: &str = "__schemaVersion";

/// Separator between segments of a type discriminator.
pub const DISCRIMINATOR_SEPARATOR: char = ':';

/// Prefix marking a member whose value should be stored detached.
pub const DETACH_PREFIX: char = '@';

/// Which member set an enumeration covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Members declared by the concrete type.
    Instance,
    /// Members added at runtime.
    Dynamic,
    /// Instance members followed by dynamic members.
    All,
}

impl MemberKind {
    fn includes_instance(self) -> bool {
        matches!(self, Self::Instance | Self::All)
    }

    fn includes_dynamic(self) -> bool {
        matches!(self, Self::Dynamic | Self::All)
    }
}

/// Check that `name` is usable as a dynamic member name.
///
/// # Errors
///
/// Returns a [`PropertyError`] if the name is empty, starts with `@@`, or
/// contains `.` or `/`.
pub fn validate_prop_name(name: &str) -> Result<(), PropertyError> {
    if name.is_empty() {
        return Err(PropertyError::EmptyName);
    }
    if name.starts_with("@@") {
        return Err(PropertyError::ReservedPrefix(name.to_string()));
    }
    if let Some(separator) = name.chars().find(|c| matches!(c, '.' | '/')) {
        return Err(PropertyError::InvalidCharacter {
            name: name.to_string(),
            separator,
        });
    }
    Ok(())
}

/// Whether a member name carries the detach hint.
pub fn is_detachable(name: &str) -> bool {
    name.starts_with(DETACH_PREFIX)
}

/// A dynamically-typed object node.
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    speckle_type: Value,
    id: Value,
    application_id: Value,
    instance: PropertyMap,
    dynamic: PropertyMap,
}

impl Default for Base {
    fn default() -> Self {
        Self::new(ROOT_TYPE_NAME)
    }
}

impl Drop for Base {
    // Drain uniquely owned descendants onto a heap stack so deep chains do
    // not drop recursively.
    fn drop(&mut self) {
        let mut pending: Vec<Value> = std::mem::take(&mut self.instance)
            .into_values()
            .chain(std::mem::take(&mut self.dynamic).into_values())
            .collect();
        while let Some(value) = pending.pop() {
            match value {
                Value::Node(node) => {
                    if let Ok(mut inner) = Arc::try_unwrap(node) {
                        pending.extend(std::mem::take(&mut inner.instance).into_values());
                        pending.extend(std::mem::take(&mut inner.dynamic).into_values());
                    }
                }
                Value::List(items) => pending.extend(items),
                Value::Map(map) => pending.extend(map.into_values()),
                _ => {}
            }
        }
    }
}

impl Base {
    /// Create a node with the given discriminator and no declared members.
    pub fn new(speckle_type: impl Into<String>) -> Self {
        Self {
            speckle_type: Value::String(speckle_type.into()),
            id: Value::Null,
            application_id: Value::Null,
            instance: PropertyMap::new(),
            dynamic: PropertyMap::new(),
        }
    }

    /// Create a node whose instance members are the given names, all `Null`.
    pub fn with_members<I, S>(speckle_type: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut base = Self::new(speckle_type);
        for name in members {
            base.declare_member(name);
        }
        base
    }

    /// Add an instance member slot. Existing values are kept.
    ///
    /// A dynamic member of the same name is promoted to the instance slot.
    pub fn declare_member(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.instance.contains_key(&name) {
            return;
        }
        let value = self.dynamic.shift_remove(&name).unwrap_or_default();
        self.instance.insert(name, value);
    }

    /// The full type discriminator of this node.
    pub fn speckle_type(&self) -> &str {
        self.speckle_type.as_str().unwrap_or(ROOT_TYPE_NAME)
    }

    /// The most specific segment of the discriminator.
    pub fn most_specific_type(&self) -> &str {
        let full = self.speckle_type();
        full.rsplit(DISCRIMINATOR_SEPARATOR)
            .next()
            .unwrap_or(full)
    }

    /// Replace the type discriminator.
    pub fn set_speckle_type(&mut self, speckle_type: impl Into<String>) {
        self.speckle_type = Value::String(speckle_type.into());
    }

    /// The object id, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_str()
    }

    /// Assign or clear the object id.
    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id.into();
    }

    /// The host application's identifier, if any.
    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_str()
    }

    /// Assign or clear the application id.
    pub fn set_application_id(&mut self, application_id: Option<String>) {
        self.application_id = application_id.into();
    }

    fn header(&self, name: &str) -> Option<&Value> {
        match name {
            SPECKLE_TYPE_FIELD => Some(&self.speckle_type),
            ID_FIELD => Some(&self.id),
            APPLICATION_ID_FIELD => Some(&self.application_id),
            _ => None,
        }
    }

    /// Whether `name` is one of the header fields.
    pub fn is_header(name: &str) -> bool {
        matches!(name, SPECKLE_TYPE_FIELD | ID_FIELD | APPLICATION_ID_FIELD)
    }

    /// Read a member: header fields, then instance members, then dynamic.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.header(name)
            .or_else(|| self.instance.get(name))
            .or_else(|| self.dynamic.get(name))
    }

    /// Write a member, returning the previous value.
    ///
    /// Declared members are written in place; unknown names go to the
    /// dynamic map after validation.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::HeaderType`] if a header field receives a
    /// value of the wrong type, or a name validation error for an invalid
    /// dynamic member name.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, PropertyError> {
        let value = value.into();
        match name {
            SPECKLE_TYPE_FIELD => {
                if value.as_str().is_none() {
                    return Err(PropertyError::HeaderType {
                        name: name.to_string(),
                        expected: "a string",
                    });
                }
                Ok(Some(std::mem::replace(&mut self.speckle_type, value)))
            }
            ID_FIELD | APPLICATION_ID_FIELD => {
                if !matches!(value, Value::String(_) | Value::Null) {
                    return Err(PropertyError::HeaderType {
                        name: name.to_string(),
                        expected: "a string or null",
                    });
                }
                let slot = if name == ID_FIELD {
                    &mut self.id
                } else {
                    &mut self.application_id
                };
                Ok(Some(std::mem::replace(slot, value)))
            }
            _ => {
                if let Some(slot) = self.instance.get_mut(name) {
                    return Ok(Some(std::mem::replace(slot, value)));
                }
                validate_prop_name(name)?;
                Ok(self.dynamic.insert(name.to_string(), value))
            }
        }
    }

    /// Remove a member, returning its value.
    ///
    /// Dynamic members are deleted; instance members are reset to `Null`.
    /// Header fields cannot be removed.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        if let Some(slot) = self.instance.get_mut(name) {
            return Some(std::mem::take(slot));
        }
        self.dynamic.shift_remove(name)
    }

    /// Whether the node has an instance or dynamic member named `name`.
    pub fn has_member(&self, name: &str) -> bool {
        self.instance.contains_key(name) || self.dynamic.contains_key(name)
    }

    /// Whether `name` is a dynamic (not declared) member.
    pub fn is_dynamic(&self, name: &str) -> bool {
        self.dynamic.contains_key(name)
    }

    /// Member names of the requested kind, declared members first.
    pub fn member_names(&self, kind: MemberKind) -> Vec<&str> {
        self.members(kind).into_iter().map(|(k, _)| k).collect()
    }

    /// Member entries of the requested kind, declared members first.
    pub fn members(&self, kind: MemberKind) -> Vec<(&str, &Value)> {
        let mut out = Vec::new();
        if kind.includes_instance() {
            out.extend(self.instance.iter().map(|(k, v)| (k.as_str(), v)));
        }
        if kind.includes_dynamic() {
            out.extend(self.dynamic.iter().map(|(k, v)| (k.as_str(), v)));
        }
        out
    }

    /// Number of instance plus dynamic members.
    pub fn member_count(&self) -> usize {
        self.instance.len() + self.dynamic.len()
    }

    /// The schema version recorded on this node.
    ///
    /// A missing or `Null` field means [`SchemaVersion::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseVersionError`] if the field holds something other
    /// than a dotted version string.
    pub fn schema_version(&self) -> Result<SchemaVersion, ParseVersionError> {
        match self.get(SCHEMA_VERSION_FIELD) {
            None | Some(Value::Null) => Ok(SchemaVersion::DEFAULT),
            Some(Value::String(s)) => s.parse(),
            Some(_) => Err(ParseVersionError {
                input: String::new(),
                reason: "version field must be a string",
            }),
        }
    }

    /// Record the schema version of this node's data.
    pub fn set_schema_version(&mut self, version: SchemaVersion) {
        let value = Value::String(version.to_string());
        match self.instance.get_mut(SCHEMA_VERSION_FIELD) {
            Some(slot) => *slot = value,
            None => {
                self.dynamic.insert(SCHEMA_VERSION_FIELD.to_string(), value);
            }
        }
    }

    /// Render the node as a JSON object, nested nodes inline.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert(SPECKLE_TYPE_FIELD.to_string(), self.speckle_type.to_json());
        if !self.id.is_null() {
            out.insert(ID_FIELD.to_string(), self.id.to_json());
        }
        if !self.application_id.is_null() {
            out.insert(APPLICATION_ID_FIELD.to_string(), self.application_id.to_json());
        }
        for (k, v) in self.instance.iter().chain(self.dynamic.iter()) {
            out.insert(k.clone(), v.to_json());
        }
        serde_json::Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Base {
        Base::with_members("Objects.BuiltElements.Wall", ["height", "baseLine"])
    }

    #[test]
    fn get_checks_header_then_instance_then_dynamic() {
        let mut b = wall();
        b.set("height", 3.0).unwrap();
        b.set("fireRating", "EI60").unwrap();
        assert_eq!(
            b.get("speckle_type").and_then(Value::as_str),
            Some("Objects.BuiltElements.Wall")
        );
        assert_eq!(b.get("height"), Some(&Value::Float(3.0)));
        assert_eq!(b.get("fireRating").and_then(Value::as_str), Some("EI60"));
        assert!(b.get("missing").is_none());
    }

    #[test]
    fn declared_members_are_not_dynamic() {
        let mut b = wall();
        b.set("height", 2.5).unwrap();
        assert!(!b.is_dynamic("height"));
        b.set("extra", 1).unwrap();
        assert!(b.is_dynamic("extra"));
    }

    #[test]
    fn member_names_list_declared_first() {
        let mut b = wall();
        b.set("zeta", 1).unwrap();
        b.set("alpha", 2).unwrap();
        assert_eq!(
            b.member_names(MemberKind::All),
            vec!["height", "baseLine", "zeta", "alpha"]
        );
        assert_eq!(b.member_names(MemberKind::Dynamic), vec!["zeta", "alpha"]);
        assert_eq!(b.member_names(MemberKind::Instance), vec!["height", "baseLine"]);
    }

    #[test]
    fn invalid_dynamic_names_are_rejected() {
        let mut b = Base::default();
        assert_eq!(b.set("", 1), Err(PropertyError::EmptyName));
        assert!(matches!(b.set("@@x", 1), Err(PropertyError::ReservedPrefix(_))));
        assert!(matches!(
            b.set("a.b", 1),
            Err(PropertyError::InvalidCharacter { separator: '.', .. })
        ));
        assert!(matches!(
            b.set("a/b", 1),
            Err(PropertyError::InvalidCharacter { separator: '/', .. })
        ));
        assert!(b.set("@detached", 1).is_ok());
    }

    #[test]
    fn header_fields_are_type_checked() {
        let mut b = Base::default();
        assert!(b.set("speckle_type", 5).is_err());
        assert!(b.set("id", 5).is_err());
        b.set("id", "abc").unwrap();
        assert_eq!(b.id(), Some("abc"));
        b.set("applicationId", Value::Null).unwrap();
        assert_eq!(b.application_id(), None);
    }

    #[test]
    fn removing_instance_member_resets_to_null() {
        let mut b = wall();
        b.set("height", 3).unwrap();
        assert_eq!(b.remove("height"), Some(Value::Int(3)));
        assert_eq!(b.get("height"), Some(&Value::Null));
        b.set("tmp", 1).unwrap();
        assert_eq!(b.remove("tmp"), Some(Value::Int(1)));
        assert!(!b.has_member("tmp"));
    }

    #[test]
    fn declaring_promotes_dynamic_member() {
        let mut b = Base::default();
        b.set("name", "x").unwrap();
        b.declare_member("name");
        assert!(!b.is_dynamic("name"));
        assert_eq!(b.get("name").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn most_specific_type_is_last_segment() {
        let b = Base::new("Objects.Geometry.Mesh:Objects.Other.Custom");
        assert_eq!(b.most_specific_type(), "Objects.Other.Custom");
        assert_eq!(Base::default().most_specific_type(), "Base");
    }

    #[test]
    fn schema_version_defaults_when_absent() {
        let mut b = Base::default();
        assert_eq!(b.schema_version().unwrap(), SchemaVersion::DEFAULT);
        b.set_schema_version(SchemaVersion::new(2, 1, 0));
        assert_eq!(b.schema_version().unwrap(), SchemaVersion::new(2, 1, 0));
        b.set(SCHEMA_VERSION_FIELD, 7).unwrap();
        assert!(b.schema_version().is_err());
    }

    #[test]
    fn to_json_includes_header_and_members() {
        let mut b = wall();
        b.set_application_id(Some("rvt-1".into()));
        b.set("height", 3).unwrap();
        let json = b.to_json();
        assert_eq!(json["speckle_type"], "Objects.BuiltElements.Wall");
        assert_eq!(json["applicationId"], "rvt-1");
        assert_eq!(json["height"], 3);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn detach_hint() {
        assert!(is_detachable("@displayValue"));
        assert!(!is_detachable("displayValue"));
    }

    #[test]
    fn deep_chain_drops_without_recursion() {
        let mut node = Base::new("Leaf");
        for _ in 0..200_000 {
            let mut parent = Base::new("Link");
            parent.set("next", vec![Value::from(node)]).unwrap();
            node = parent;
        }
        drop(node);
    }
}
