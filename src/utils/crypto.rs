//! Cryptographic utilities

use sha2::{Digest, Sha256};

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Short fingerprint of submitted source, safe to put in logs
pub fn code_fingerprint(code: &str) -> String {
    let mut digest = hash_string(code);
    digest.truncate(16);
    digest
}
