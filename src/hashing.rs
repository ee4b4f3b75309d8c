//! Hashing - SHA-256 fingerprints for generation reports
//!
//! Same source, catalog and settings must produce the same input hash.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};
use std::fs;
use std::path::Path;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// SHA-256 of a file's contents
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let data = fs::read(path)?;
    Ok(sha256_hex(&data))
}

/// Sorted keys, no whitespace. `serde_json::Map` is BTreeMap-backed here, so
/// a round trip through `Value` orders every object.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&v)
}

/// Compute manifest hash over its canonical form
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// input_hash = sha256(catalog_name + catalog_version + canonical_payload + engine_version)
pub fn compute_input_hash(
    catalog_name: &str,
    catalog_version: u32,
    payload: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_payload = canonical_json(payload)?;
    let combined = format!(
        "{}:{}:{}:{}",
        catalog_name, catalog_version, canonical_payload, engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}
