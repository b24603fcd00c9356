//! Structural fingerprints for model queries.
//!
//! The engine never parses SQL; a model's defining query is reduced to an
//! opaque token summarizing the tables/joins it touches. Two models with
//! equal fingerprints are recomputing structurally equivalent work.

use crate::newtype_string::define_newtype_string;
use sha2::{Digest, Sha256};

define_newtype_string! {
    /// Opaque structural fingerprint of a model's defining query.
    pub struct Fingerprint;
}

impl Fingerprint {
    /// Derive a fingerprint from raw query text as a SHA-256 hex digest.
    ///
    /// Convenience for manifest loaders; callers may equally supply
    /// fingerprints computed elsewhere.
    pub fn of_sql(sql: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(sql.as_bytes());
        Self::new(format!("{:x}", hasher.finalize()))
    }
}
