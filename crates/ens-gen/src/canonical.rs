//! Canonical JSON encoding and the content hashes built on it.
//!
//! Parameter spaces and permutations are ordered maps whose order decides the
//! product order and the command line, so the encoding keeps every map in its
//! own iteration order: struct fields in declaration order, `IndexMap`s in
//! insertion order, `BTreeMap`s sorted. The bytes are deterministic for a given
//! value, and values that only differ in parameter order encode differently.

use ens_core::errors::{EnsError, ErrorInfo};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Encodes `value` as compact, order-preserving JSON.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, EnsError> {
    serde_json::to_vec(value).map_err(|err| {
        EnsError::Serde(
            ErrorInfo::new("ens.json_encode", "failed to encode value").with_hint(err.to_string()),
        )
    })
}

/// Decodes a JSON payload.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, EnsError> {
    serde_json::from_slice(bytes).map_err(|err| {
        EnsError::Serde(
            ErrorInfo::new("ens.json_decode", "failed to decode json").with_hint(err.to_string()),
        )
    })
}

/// Lowercase hex SHA-256 of the canonical JSON of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, EnsError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
