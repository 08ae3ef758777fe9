//! # Type Descriptors
//!
//! One immutable `TypeDescriptor` exists per concrete model type found at
//! registry build time. It records the canonical name, the Rust handle, the
//! discriminator chain and the full (inherited first) member index.

use indexmap::IndexMap;
use spk_core::{is_detachable, Base, PropertyError, Value, DISCRIMINATOR_SEPARATOR, ROOT_TYPE_NAME};

use crate::def::TypeHandle;

/// Named access to one declared member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccessor {
    name: String,
    detachable: bool,
}

impl PropertyAccessor {
    /// Accessor for `name`; detachable when it carries the `@` prefix.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let detachable = is_detachable(&name);
        Self { name, detachable }
    }

    /// Accessor for a member stored detached under its plain name.
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detachable: true,
        }
    }

    /// Member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the serializer should store the value as a separate object.
    pub fn is_detachable(&self) -> bool {
        self.detachable
    }

    /// Read this member from a node.
    pub fn read<'a>(&self, base: &'a Base) -> Option<&'a Value> {
        base.get(&self.name)
    }

    /// Write this member on a node, returning the previous value.
    ///
    /// # Errors
    ///
    /// Propagates [`Base::set`] failures.
    pub fn write(
        &self,
        base: &mut Base,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, PropertyError> {
        base.set(&self.name, value)
    }
}

/// Immutable description of a registered model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub(crate) canonical_name: String,
    pub(crate) runtime_type: TypeHandle,
    pub(crate) ancestry: Vec<String>,
    pub(crate) deprecated_names: Vec<String>,
    pub(crate) property_index: IndexMap<String, PropertyAccessor>,
}

impl TypeDescriptor {
    /// Canonical `speckle_type` of the type.
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Rust handle of the type.
    pub fn runtime_type(&self) -> TypeHandle {
        self.runtime_type
    }

    /// Canonical names from the first type below the root down to this one.
    pub fn ancestry(&self) -> &[String] {
        &self.ancestry
    }

    /// Former names this type still answers to.
    pub fn deprecated_names(&self) -> &[String] {
        &self.deprecated_names
    }

    /// Declared members, inherited members first.
    pub fn property_index(&self) -> &IndexMap<String, PropertyAccessor> {
        &self.property_index
    }

    /// Accessor for a declared member.
    pub fn property(&self, name: &str) -> Option<&PropertyAccessor> {
        self.property_index.get(name)
    }

    /// Whether this is the root node type.
    pub fn is_root(&self) -> bool {
        self.canonical_name == ROOT_TYPE_NAME
    }

    /// The discriminator written into serialized instances of this type.
    pub fn discriminator(&self) -> String {
        self.ancestry.join(&*DISCRIMINATOR_SEPARATOR.to_string())
    }

    /// A fresh node of this type with every declared member set to `Null`.
    pub fn instantiate(&self) -> Base {
        Base::with_members(self.discriminator(), self.property_index.keys().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> TypeDescriptor {
        let mut property_index = IndexMap::new();
        for accessor in [PropertyAccessor::new("vertices"), PropertyAccessor::new("@faces")] {
            property_index.insert(accessor.name().to_string(), accessor);
        }
        TypeDescriptor {
            canonical_name: "Objects.Geometry.Mesh".into(),
            runtime_type: TypeHandle::of::<u8>(),
            ancestry: vec!["Objects.Geometry.Mesh".into()],
            deprecated_names: vec![],
            property_index,
        }
    }

    #[test]
    fn instantiate_declares_members() {
        let node = mesh().instantiate();
        assert_eq!(node.speckle_type(), "Objects.Geometry.Mesh");
        assert_eq!(node.get("vertices"), Some(&Value::Null));
        assert!(!node.is_dynamic("vertices"));
    }

    #[test]
    fn discriminator_joins_ancestry() {
        let mut d = mesh();
        d.ancestry = vec!["Objects.Geometry.Mesh".into(), "Objects.Custom.FancyMesh".into()];
        assert_eq!(d.discriminator(), "Objects.Geometry.Mesh:Objects.Custom.FancyMesh");
    }

    #[test]
    fn accessor_reads_and_writes() {
        let d = mesh();
        let mut node = d.instantiate();
        let faces = d.property("@faces").unwrap();
        assert!(faces.is_detachable());
        faces.write(&mut node, Value::List(vec![3.into()])).unwrap();
        assert_eq!(faces.read(&node), Some(&Value::List(vec![Value::Int(3)])));
    }
}
