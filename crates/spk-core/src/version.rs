//! # Schema Versions
//!
//! A `SchemaVersion` identifies the shape of a serialized object's data.
//! Versions are totally ordered by `(major, minor, patch)` and travel on
//! the wire as a dotted triple under [`SCHEMA_VERSION_FIELD`].
//!
//! [`SCHEMA_VERSION_FIELD`]: crate::SCHEMA_VERSION_FIELD

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An ordered `(major, minor, patch)` triple.
///
/// The derived `Ord` compares fields in declaration order, which gives the
/// usual semantic-version precedence without pre-release tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    /// Incompatible shape changes.
    pub major: u32,
    /// Backwards-compatible additions.
    pub minor: u32,
    /// Fixes that do not change the shape.
    pub patch: u32,
}

impl SchemaVersion {
    /// Version assumed for data that carries no version field.
    pub const DEFAULT: SchemaVersion = SchemaVersion::new(1, 0, 0);

    /// Construct a version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A version string that is not a dotted numeric triple.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid schema version '{input}': {reason}")]
pub struct ParseVersionError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: &'static str,
}

impl FromStr for SchemaVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseVersionError {
            input: s.to_string(),
            reason,
        };

        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u32, ParseVersionError> {
            parts
                .next()
                .ok_or_else(|| err("expected three dot-separated components"))?
                .parse::<u32>()
                .map_err(|_| err("components must be unsigned integers"))
        };
        let version = SchemaVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err("expected three dot-separated components"));
        }
        Ok(version)
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display output always parses back to the same version.
        #[test]
        fn display_parses_back(a in any::<u32>(), b in any::<u32>(), c in any::<u32>()) {
            let v = SchemaVersion::new(a, b, c);
            prop_assert_eq!(v.to_string().parse::<SchemaVersion>().unwrap(), v);
        }

        /// Ordering agrees with tuple ordering.
        #[test]
        fn ordering_matches_tuples(a in any::<(u32, u32, u32)>(), b in any::<(u32, u32, u32)>()) {
            let va = SchemaVersion::new(a.0, a.1, a.2);
            let vb = SchemaVersion::new(b.0, b.1, b.2);
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }
    }
}
