//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types shared by every crate in the workspace. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Configuration errors (a model type declared incorrectly) are fatal and
//!   carry the offending type name.
//! - Property errors carry the rejected property name and the rule it broke.
//! - Canonicalization errors carry the value that could not be rendered.
//! - Migration failures and stalls stay distinct from configuration and
//!   startup-ordering errors.

use thiserror::Error;

/// Top-level error type for the object SDK.
#[derive(Error, Debug)]
pub enum SpkError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A property could not be read or written.
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    /// A model type or registry was configured incorrectly.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was attempted before its prerequisites were met.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A schema migration step failed on the data it was given.
    #[error("migration failed: {0}")]
    Migration(String),

    /// A schema migration stopped short of its target version.
    #[error("migration stalled: {0}")]
    MigrationStalled(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// NaN and infinities have no JSON representation.
    #[error("non-finite float at member '{member}': {value}")]
    NonFiniteFloat {
        /// Name of the member holding the value.
        member: String,
        /// The rejected value.
        value: f64,
    },

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error raised by dynamic property access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// Property names must contain at least one character.
    #[error("property names cannot be empty")]
    EmptyName,

    /// `@@` is reserved for internal detach markers.
    #[error("property '{0}' cannot start with '@@'")]
    ReservedPrefix(String),

    /// `.` and `/` are path separators in object references.
    #[error("property '{name}' cannot contain '{separator}'")]
    InvalidCharacter {
        /// The rejected property name.
        name: String,
        /// The forbidden character found in the name.
        separator: char,
    },

    /// Header fields have fixed types.
    #[error("header field '{name}' expects {expected}")]
    HeaderType {
        /// The header field name.
        name: String,
        /// Description of the accepted value type.
        expected: &'static str,
    },
}
