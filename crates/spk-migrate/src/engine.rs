//! # Schema Migration State Machine
//!
//! Chains registered upgraders from a stored schema version to the version
//! the consumer was built against.
//!
//! ## States
//!
//! PENDING → UPGRADING → COMPLETE
//!                     ↘ STALLED
//!
//! Terminal states: COMPLETE, STALLED
//!
//! A stall is an expected outcome: old data meeting a consumer that pruned
//! old migration steps. It is returned as a typed outcome so the caller can
//! tell partial data from fully migrated data. Transform failures and
//! upgraders that jump past the target are errors and stop the chain
//! immediately.

use spk_core::{Base, SchemaVersion};
use spk_registry::DiscriminatorResolver;
use tracing::{debug, warn};

use crate::error::MigrationError;
use crate::upgrader::{upgrader_key, UpgraderRegistry};

/// The phase of one migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationState {
    /// No upgrader has been looked up yet.
    Pending,
    /// At least one lookup happened and the target is not reached.
    Upgrading,
    /// The target version was reached (terminal).
    Complete,
    /// No upgrader continues the chain (terminal).
    Stalled,
}

impl MigrationState {
    /// Whether this state is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Stalled)
    }
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Upgrading => "UPGRADING",
            Self::Complete => "COMPLETE",
            Self::Stalled => "STALLED",
        };
        f.write_str(s)
    }
}

/// Result of a migration that did not fail.
#[must_use = "a stalled migration holds partially migrated data"]
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome<T> {
    /// The data after the last applied step.
    pub value: T,
    /// Terminal state reached.
    pub state: MigrationState,
    /// Version of `value`.
    pub version: SchemaVersion,
    /// Version that was requested.
    pub target: SchemaVersion,
    /// Number of upgraders applied.
    pub steps: usize,
    /// Type the chain was keyed on.
    pub type_name: String,
}

impl<T> MigrationOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.state == MigrationState::Complete
    }

    pub fn is_stalled(&self) -> bool {
        self.state == MigrationState::Stalled
    }

    /// The migrated value, or [`MigrationError::Stalled`] if the chain stopped
    /// short of the target.
    pub fn into_complete(self) -> Result<T, MigrationError> {
        match self.state {
            MigrationState::Complete => Ok(self.value),
            _ => Err(MigrationError::Stalled {
                type_name: self.type_name,
                version: self.version,
                target: self.target,
            }),
        }
    }
}

/// Applies upgrader chains from a read-only registry.
#[derive(Debug)]
pub struct SchemaMigrationEngine<T> {
    registry: UpgraderRegistry<T>,
}

impl<T> SchemaMigrationEngine<T> {
    pub fn new(registry: UpgraderRegistry<T>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &UpgraderRegistry<T> {
        &self.registry
    }

    /// Upgrade `input` of type `type_name` from `current` towards `target`.
    ///
    /// Data already at or beyond `target` is returned unchanged as complete.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::Overshoot`] if an upgrader's to-version passes
    ///   `target`. Checked before the transform runs.
    /// - [`MigrationError::TransformFailed`] if a transform fails. No
    ///   further steps are attempted.
    pub fn upgrade(
        &self,
        input: T,
        type_name: &str,
        current: SchemaVersion,
        target: SchemaVersion,
    ) -> Result<MigrationOutcome<T>, MigrationError> {
        let mut state = MigrationState::Pending;
        let mut version = current;
        let mut value = input;
        let mut steps = 0;

        while version < target {
            state = MigrationState::Upgrading;
            let Some(upgrader) = self.registry.get(type_name, version) else {
                warn!(
                    key = %upgrader_key(type_name, version),
                    %target,
                    steps,
                    "no upgrader found; migration stalled"
                );
                state = MigrationState::Stalled;
                break;
            };
            let to = upgrader.to_version();
            if to > target {
                return Err(MigrationError::Overshoot {
                    type_name: type_name.to_string(),
                    from: version,
                    to,
                    target,
                });
            }
            value = upgrader
                .apply(value)
                .map_err(|source| MigrationError::TransformFailed {
                    type_name: type_name.to_string(),
                    from: version,
                    to,
                    source,
                })?;
            debug!(type_name, from = %version, %to, "applied upgrader");
            version = to;
            steps += 1;
        }

        if state != MigrationState::Stalled {
            state = MigrationState::Complete;
        }
        Ok(MigrationOutcome {
            value,
            state,
            version,
            target,
            steps,
            type_name: type_name.to_string(),
        })
    }
}

impl SchemaMigrationEngine<Base> {
    /// Upgrade a node using its own stored schema version.
    ///
    /// The node's `speckle_type` is resolved through `resolver` first and
    /// the chain is keyed on the resolved type's canonical name, so data
    /// stored under a more specific unknown segment or a deprecated alias
    /// migrates with the consumer's type. A missing version field counts as
    /// [`SchemaVersion::DEFAULT`]. The reached version is written back into
    /// the node, also when the chain stalls.
    ///
    /// # Errors
    ///
    /// [`MigrationError::InvalidVersion`] for an unreadable version field,
    /// otherwise as [`upgrade`](Self::upgrade).
    pub fn upgrade_node(
        &self,
        node: Base,
        resolver: &DiscriminatorResolver,
        target: SchemaVersion,
    ) -> Result<MigrationOutcome<Base>, MigrationError> {
        let resolved = resolver.resolve(node.speckle_type());
        let type_name = resolved.canonical_name().to_string();
        let current = node
            .schema_version()
            .map_err(|source| MigrationError::InvalidVersion {
                type_name: type_name.clone(),
                source,
            })?;
        let mut outcome = self.upgrade(node, &type_name, current, target)?;
        if outcome.version != current {
            outcome.value.set_schema_version(outcome.version);
        }
        Ok(outcome)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::upgrader::Upgrader;
    use proptest::prelude::*;

    fn chain(len: u32) -> SchemaMigrationEngine<Vec<u32>> {
        let mut registry = UpgraderRegistry::new();
        for major in 1..=len {
            registry
                .register(Upgrader::infallible(
                    "Kit.T",
                    SchemaVersion::new(major, 0, 0),
                    SchemaVersion::new(major + 1, 0, 0),
                    move |mut v: Vec<u32>| {
                        v.push(major);
                        v
                    },
                ))
                .unwrap();
        }
        SchemaMigrationEngine::new(registry)
    }

    proptest! {
        /// Within the chain every target is reached with steps applied in order;
        /// past its end the migration stalls at the last link.
        #[test]
        fn chain_reaches_target_or_stalls_at_end(
            len in 0u32..8,
            start in 1u32..10,
            target in 1u32..12,
        ) {
            let out = chain(len)
                .upgrade(
                    Vec::new(),
                    "Kit.T",
                    SchemaVersion::new(start, 0, 0),
                    SchemaVersion::new(target, 0, 0),
                )
                .unwrap();
            if start >= target {
                prop_assert!(out.is_complete());
                prop_assert!(out.value.is_empty());
            } else if target <= len + 1 {
                prop_assert!(out.is_complete());
                prop_assert_eq!(out.value, (start..target).collect::<Vec<_>>());
            } else {
                prop_assert!(out.is_stalled());
                prop_assert_eq!(out.version.major, start.max(len + 1));
            }
        }
    }
}
