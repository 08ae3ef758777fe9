//! # spk-core: Foundational Types for the Object SDK
//!
//! This crate defines the dynamic object model every other crate in the
//! workspace operates on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One node type.** `Base` is the universal unit of data. Concrete model
//!    types are metadata (a discriminator plus declared members), not Rust
//!    structs, because producers and consumers may be built against different
//!    sets of model types.
//!
//! 2. **Uniform property access.** `Base::get`/`Base::set` check header
//!    fields, then declared members, then dynamic members.
//!
//! 3. **Shared nodes.** Nested nodes are `Arc<Base>`; a node reachable from
//!    several parents is released when the last parent drops it.
//!
//! 4. **`CanonicalBytes` newtype.** All object id computation flows through
//!    `CanonicalBytes::new()`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `spk-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod base;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod value;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use base::{
    is_detachable, validate_prop_name, Base, MemberKind, APPLICATION_ID_FIELD, DETACH_PREFIX,
    DISCRIMINATOR_SEPARATOR, ID_FIELD, ROOT_TYPE_NAME, SCHEMA_VERSION_FIELD, SPECKLE_TYPE_FIELD,
};
pub use canonical::CanonicalBytes;
pub use digest::{object_id, sha256_hex, ObjectId};
pub use error::{CanonicalizationError, PropertyError, SpkError};
pub use value::{PropertyMap, Value};
pub use version::{ParseVersionError, SchemaVersion};
