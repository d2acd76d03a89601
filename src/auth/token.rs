// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Secure random token from the OS RNG, for magic links and sessions.
pub fn generate_token_default() -> String {
    generate_token(&mut OsRng, DEFAULT_TOKEN_BYTES)
}

/// URL-safe base64 (no padding) of `nbytes` random bytes.
/// Also used for image ids and bucket keys, which end up in URLs.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}

/// SHA-256 of a token. Only this is stored; raw tokens never hit the DB.
pub fn hash_token(token: &str) -> [u8; 32] {
    let out = Sha256::digest(token.as_bytes());
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}
