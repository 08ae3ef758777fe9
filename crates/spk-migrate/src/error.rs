//! # Migration Errors
//!
//! A missing upgrader is not an error here: it surfaces as a
//! [`MigrationState::Stalled`](crate::MigrationState::Stalled) outcome.
//! [`MigrationError::Stalled`] exists for callers that convert a stall into
//! a hard failure with
//! [`MigrationOutcome::into_complete`](crate::MigrationOutcome::into_complete).

use spk_core::{ParseVersionError, SchemaVersion, SpkError};
use thiserror::Error;

/// Error raised by a failing upgrader transform.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error raised while registering or applying upgraders.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// An upgrader was rejected at registration.
    #[error("invalid upgrader for '{type_name}' {from} -> {to}: {reason}")]
    InvalidUpgrader {
        /// Type the upgrader targets.
        type_name: String,
        /// Version the upgrader reads.
        from: SchemaVersion,
        /// Version the upgrader produces.
        to: SchemaVersion,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No upgrader continues the chain before the target.
    #[error("no upgrader for '{type_name}' at {version}; target is {target}")]
    Stalled {
        /// Type being migrated.
        type_name: String,
        /// Version the chain stopped at.
        version: SchemaVersion,
        /// Version that was requested.
        target: SchemaVersion,
    },

    /// An upgrader would move past the requested target.
    #[error("upgrader for '{type_name}' {from} -> {to} overshoots target {target}")]
    Overshoot {
        /// Type being migrated.
        type_name: String,
        /// Version the upgrader reads.
        from: SchemaVersion,
        /// Version the upgrader produces.
        to: SchemaVersion,
        /// Version that was requested.
        target: SchemaVersion,
    },

    /// An upgrader's transform failed.
    #[error("upgrader for '{type_name}' {from} -> {to} failed: {source}")]
    TransformFailed {
        /// Type being migrated.
        type_name: String,
        /// Version the upgrader reads.
        from: SchemaVersion,
        /// Version the upgrader produces.
        to: SchemaVersion,
        /// The transform's error.
        #[source]
        source: BoxError,
    },

    /// A node's stored schema version could not be read.
    #[error("node '{type_name}' has an unreadable schema version: {source}")]
    InvalidVersion {
        /// Type of the node.
        type_name: String,
        /// The parse failure.
        #[source]
        source: ParseVersionError,
    },
}

impl MigrationError {
    /// Whether this error reports a misdeclared upgrader chain.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidUpgrader { .. } | Self::Overshoot { .. })
    }
}

impl From<MigrationError> for SpkError {
    fn from(err: MigrationError) -> Self {
        match err {
            MigrationError::InvalidUpgrader { .. } | MigrationError::Overshoot { .. } => {
                SpkError::Configuration(err.to_string())
            }
            MigrationError::Stalled { .. } => SpkError::MigrationStalled(err.to_string()),
            MigrationError::TransformFailed { .. } | MigrationError::InvalidVersion { .. } => {
                SpkError::Migration(err.to_string())
            }
        }
    }
}
