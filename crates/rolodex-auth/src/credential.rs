//! One-way credential transform.
//!
//! Passwords are stored as unsalted SHA-256 hex digests: the same input
//! always yields the same digest, so verification is digest equality.

use sha2::{Digest, Sha256};

/// Hash a plaintext credential into its stored form.
pub fn hash_credential(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a plaintext credential against a stored digest.
pub fn verify_credential(plain: &str, stored_digest: &str) -> bool {
    hash_credential(plain) == stored_digest
}
