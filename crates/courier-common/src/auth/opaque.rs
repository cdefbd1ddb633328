//! Opaque token generation and hashing
//!
//! Refresh and password-reset tokens are high-entropy opaque strings.
//! The server never stores the plaintext: lookups go through the
//! SHA-256 hex digest.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in an opaque token (64 hex chars)
const TOKEN_BYTES: usize = 32;

/// Generate a new opaque token
#[must_use]
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hex digest of a token, as stored and looked up
#[must_use]
pub fn hash_opaque_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
