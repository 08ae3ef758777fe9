//! # Registry Errors
//!
//! Every variant except [`RegistryError::NotInitialized`] is a configuration
//! error: it means a model type or the startup sequence was declared
//! incorrectly and is not retried.

use spk_core::SpkError;
use thiserror::Error;

/// Error raised while building or reading the type registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A concrete model type has no `speckle_type` metadata.
    #[error("model type '{type_name}' derives from Base but declares no speckle_type")]
    MissingTypeIdentity {
        /// Rust name of the offending type.
        type_name: String,
    },

    /// Two model types claim the same canonical name.
    #[error("speckle_type '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateTypeName {
        /// The contested canonical name.
        name: String,
        /// Rust name of the type registered first.
        first: String,
        /// Rust name of the type registered second.
        second: String,
    },

    /// A type's parent chain loops back on itself.
    #[error("inheritance cycle detected while resolving ancestry of '{type_name}'")]
    InheritanceCycle {
        /// Rust name of the type whose lineage loops.
        type_name: String,
    },

    /// A second initialization asked for a different module set.
    #[error("registry already initialized with modules {existing:?}; refusing {requested:?}")]
    ConflictingInitialization {
        /// Modules the live index was built from.
        existing: Vec<String>,
        /// Modules supplied by the rejected call.
        requested: Vec<String>,
    },

    /// The registry was read before `initialize` was called.
    #[error("type registry accessed before initialization")]
    NotInitialized,
}

impl RegistryError {
    /// Whether this error reports a misdeclared type or startup sequence.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::NotInitialized)
    }
}

impl From<RegistryError> for SpkError {
    fn from(err: RegistryError) -> Self {
        if err.is_configuration() {
            SpkError::Configuration(err.to_string())
        } else {
            SpkError::InvalidState(err.to_string())
        }
    }
}
