//! # Object Ids: Content-Addressed Identifiers
//!
//! An object id is the first 32 hex characters of the SHA-256 digest of a
//! node's [`CanonicalBytes`]. Two nodes with the same content have the same
//! id regardless of member insertion order or previously assigned ids.
//!
//! ## Invariant
//!
//! `ObjectId` can only be computed from `CanonicalBytes`, so every id in the
//! system is produced through the same canonicalization pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::base::Base;
use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;

/// Number of hex characters kept from the digest.
pub const OBJECT_ID_LEN: usize = 32;

/// A content-derived object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Access the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the hex string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute a full SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    Sha256::digest(data.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Compute the object id for canonical bytes.
pub fn object_id(data: &CanonicalBytes) -> ObjectId {
    let mut hex = sha256_hex(data);
    hex.truncate(OBJECT_ID_LEN);
    ObjectId(hex)
}

impl Base {
    /// Compute this node's content id without assigning it.
    ///
    /// # Errors
    ///
    /// Propagates canonicalization failures (non-finite floats).
    pub fn compute_id(&self) -> Result<ObjectId, CanonicalizationError> {
        Ok(object_id(&CanonicalBytes::new(self)?))
    }
}
