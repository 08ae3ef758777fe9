//! # Registration Manifest
//!
//! Model types are declared explicitly: each marker type implements
//! [`ObjectModel`] and returns a [`TypeDef`] describing its canonical
//! `speckle_type`, deprecated aliases, parent type and declared members.
//! Types are grouped into [`Module`]s (one per kit) and handed to
//! [`TypeRegistry::initialize`](crate::TypeRegistry::initialize).
//!
//! ```
//! use spk_core::Base;
//! use spk_registry::{Module, ObjectModel, TypeDef};
//!
//! struct Wall;
//!
//! impl ObjectModel for Wall {
//!     fn type_def() -> TypeDef {
//!         TypeDef::of::<Self>()
//!             .speckle_type("Objects.BuiltElements.Wall")
//!             .derives_from::<Base>()
//!             .member("height")
//!     }
//! }
//!
//! let module = Module::new("Objects").with::<Wall>();
//! assert_eq!(module.types().len(), 1);
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::descriptor::PropertyAccessor;

/// Runtime identity of a Rust model type.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    name: &'static str,
}

impl TypeHandle {
    /// Handle for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The Rust type name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Metadata for one model type.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub(crate) handle: TypeHandle,
    pub(crate) speckle_type: Option<String>,
    pub(crate) deprecated_names: Vec<String>,
    pub(crate) parent: Option<TypeHandle>,
    pub(crate) is_abstract: bool,
    pub(crate) members: Vec<PropertyAccessor>,
}

impl TypeDef {
    /// Start a definition for `T` with no metadata.
    pub fn of<T: 'static>() -> Self {
        Self {
            handle: TypeHandle::of::<T>(),
            speckle_type: None,
            deprecated_names: Vec::new(),
            parent: None,
            is_abstract: false,
            members: Vec::new(),
        }
    }

    /// Set the canonical type name.
    pub fn speckle_type(mut self, name: impl Into<String>) -> Self {
        self.speckle_type = Some(name.into());
        self
    }

    /// Add a former name this type still answers to.
    pub fn deprecated_name(mut self, name: impl Into<String>) -> Self {
        self.deprecated_names.push(name.into());
        self
    }

    /// Declare the direct parent type.
    pub fn derives_from<P: 'static>(mut self) -> Self {
        self.parent = Some(TypeHandle::of::<P>());
        self
    }

    /// Mark the type abstract; it can be an ancestor but is never indexed.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declare a member. An `@` prefix marks it detachable.
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.members.push(PropertyAccessor::new(name));
        self
    }

    /// Declare a member that is stored detached under its plain name.
    pub fn detached_member(mut self, name: impl Into<String>) -> Self {
        self.members.push(PropertyAccessor::detached(name));
        self
    }

    /// Runtime handle of the described type.
    pub fn handle(&self) -> TypeHandle {
        self.handle
    }

    /// Canonical name, if declared.
    pub fn name(&self) -> Option<&str> {
        self.speckle_type.as_deref()
    }

    /// Direct parent, if declared.
    pub fn parent(&self) -> Option<TypeHandle> {
        self.parent
    }

    /// Whether the type is abstract.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

/// A Rust marker type that describes a model type.
pub trait ObjectModel: 'static {
    /// The registration metadata for this type.
    fn type_def() -> TypeDef;
}

/// A named group of model types, the unit handed to the registry.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    scannable: bool,
    types: Vec<TypeDef>,
}

impl Module {
    /// An empty module whose types will be indexed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scannable: true,
            types: Vec::new(),
        }
    }

    /// A module generated at runtime; the registry skips it without error.
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self {
            scannable: false,
            ..Self::new(name)
        }
    }

    /// Add the model type `T`.
    pub fn with<T: ObjectModel>(mut self) -> Self {
        self.types.push(T::type_def());
        self
    }

    /// Add a prebuilt definition.
    pub fn with_def(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    /// Module name; modules are deduplicated by it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the registry may scan this module.
    pub fn is_scannable(&self) -> bool {
        self.scannable
    }

    /// Definitions in declaration order.
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }
}
