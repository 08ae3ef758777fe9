//! # spk-migrate: Schema Migration
//!
//! Stored objects record the schema version of their data. When a consumer
//! expects a newer version, registered upgraders are chained from the
//! stored version to the target, one type at a time.
//!
//! ## Components
//!
//! - **Upgraders** (`upgrader.rs`): `Upgrader` and the read-only
//!   `UpgraderRegistry` keyed by type name and from-version.
//! - **Engine** (`engine.rs`): `SchemaMigrationEngine` walks the chain and
//!   reports `Complete` or `Stalled` as a typed `MigrationOutcome`.
//!
//! ## Crate Policy
//!
//! - Depends on `spk-core` and, for resolving node types, `spk-registry`.
//! - The engine keeps no state between calls.

pub mod engine;
pub mod error;
pub mod upgrader;

pub use engine::{MigrationOutcome, MigrationState, SchemaMigrationEngine};
pub use error::{BoxError, MigrationError};
pub use upgrader::{upgrader_key, Transform, Upgrader, UpgraderRegistry};
