//! # spk-registry: Type Registry & Discriminator Resolution
//!
//! Producers and consumers of object data may be built against different,
//! independently versioned kits of model types. Serialized nodes therefore
//! carry a `speckle_type` discriminator, and this crate maps it back to a
//! concrete type.
//!
//! ## Components
//!
//! - **Manifest** (`def.rs`): `ObjectModel`, `TypeDef` and `Module` declare
//!   model types explicitly in place of runtime reflection.
//! - **Registry** (`registry.rs`): `TypeRegistry` builds an immutable
//!   `TypeIndex` once, publishes it for lock-free reads, and can be reset.
//! - **Resolver** (`resolver.rs`): `DiscriminatorResolver` walks a
//!   discriminator from its most specific segment and degrades to `Base`.
//! - **Materialization** (`materialize.rs`): builds typed nodes from parsed
//!   JSON through the resolver.
//!
//! ## Crate Policy
//!
//! - Depends only on `spk-core` internally.
//! - Resolution never fails; registry misconfiguration always does.

pub mod config;
pub mod def;
pub mod descriptor;
pub mod error;
pub mod kit;
pub mod materialize;
pub mod registry;
pub mod resolver;

pub use config::{ConfigError, RegistryConfig};
pub use def::{Module, ObjectModel, TypeDef, TypeHandle};
pub use descriptor::{PropertyAccessor, TypeDescriptor};
pub use error::RegistryError;
pub use kit::{core_kit, Collection, DataChunk, CORE_KIT};
pub use materialize::{materialize, materialize_object};
pub use registry::{TypeIndex, TypeRegistry};
pub use resolver::{deprecated_variant, DiscriminatorResolver, DEPRECATED_NAMESPACE};
