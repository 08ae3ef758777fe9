//! # Upgraders
//!
//! An upgrader moves one type's data from one schema version to a strictly
//! newer one. Upgraders are registered up front and looked up by
//! `(type name, from version)` during migration.

use std::collections::HashMap;
use std::fmt;

use spk_core::SchemaVersion;

use crate::error::{BoxError, MigrationError};

/// Transform applied by an upgrader.
pub type Transform<T> = Box<dyn Fn(T) -> Result<T, BoxError> + Send + Sync>;

/// The display key of an upgrader: type name followed by its from-version.
pub fn upgrader_key(type_name: &str, version: SchemaVersion) -> String {
    format!("{type_name}{version}")
}

/// One migration step for one type.
pub struct Upgrader<T> {
    type_name: String,
    from: SchemaVersion,
    to: SchemaVersion,
    transform: Transform<T>,
}

impl<T> Upgrader<T> {
    /// An upgrader taking `type_name` data from `from` to `to`.
    pub fn new(
        type_name: impl Into<String>,
        from: SchemaVersion,
        to: SchemaVersion,
        transform: impl Fn(T) -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            from,
            to,
            transform: Box::new(transform),
        }
    }

    /// An upgrader whose transform cannot fail.
    pub fn infallible(
        type_name: impl Into<String>,
        from: SchemaVersion,
        to: SchemaVersion,
        transform: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::new(type_name, from, to, move |value| Ok(transform(value)))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn from_version(&self) -> SchemaVersion {
        self.from
    }

    pub fn to_version(&self) -> SchemaVersion {
        self.to
    }

    pub fn key(&self) -> String {
        upgrader_key(&self.type_name, self.from)
    }

    /// Run the transform.
    pub fn apply(&self, value: T) -> Result<T, BoxError> {
        (self.transform)(value)
    }
}

impl<T> fmt::Debug for Upgrader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upgrader")
            .field("type_name", &self.type_name)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Upgraders indexed by type name and from-version.
///
/// Populated before migration starts and read-only afterwards.
pub struct UpgraderRegistry<T> {
    upgraders: HashMap<(String, SchemaVersion), Upgrader<T>>,
}

impl<T> Default for UpgraderRegistry<T> {
    fn default() -> Self {
        Self {
            upgraders: HashMap::new(),
        }
    }
}

impl<T> UpgraderRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an upgrader.
    ///
    /// # Errors
    ///
    /// [`MigrationError::InvalidUpgrader`] if the upgrader does not move to a
    /// strictly newer version or another upgrader already starts at the same
    /// type and version.
    pub fn register(&mut self, upgrader: Upgrader<T>) -> Result<(), MigrationError> {
        let invalid = |reason| MigrationError::InvalidUpgrader {
            type_name: upgrader.type_name.clone(),
            from: upgrader.from,
            to: upgrader.to,
            reason,
        };
        if upgrader.to <= upgrader.from {
            return Err(invalid("to-version must be newer than from-version"));
        }
        let key = (upgrader.type_name.clone(), upgrader.from);
        if self.upgraders.contains_key(&key) {
            return Err(invalid("an upgrader from this version is already registered"));
        }
        self.upgraders.insert(key, upgrader);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, upgrader: Upgrader<T>) -> Result<Self, MigrationError> {
        self.register(upgrader)?;
        Ok(self)
    }

    /// The upgrader for `type_name` data at `version`.
    pub fn get(&self, type_name: &str, version: SchemaVersion) -> Option<&Upgrader<T>> {
        self.upgraders.get(&(type_name.to_string(), version))
    }

    pub fn len(&self) -> usize {
        self.upgraders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgraders.is_empty()
    }
}

impl<T> fmt::Debug for UpgraderRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.upgraders.values().map(Upgrader::key).collect();
        keys.sort();
        f.debug_struct("UpgraderRegistry").field("upgraders", &keys).finish()
    }
}
