// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const TOKEN_BYTES: usize = 32;

/// A freshly minted secret: the raw value goes to the user, only the hash is stored.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub raw: String,
    pub hash: [u8; 32],
}

pub fn issue_token() -> IssuedToken {
    issue_token_with(&mut OsRng)
}

/// URL-safe base64 without padding, so tokens can sit in query strings and cookies as-is.
pub fn issue_token_with<R: RngCore>(rng: &mut R) -> IssuedToken {
    let mut buf = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut buf);
    let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf);
    let hash = hash_token(&raw);
    IssuedToken { raw, hash }
}

pub fn hash_token(token: &str) -> [u8; 32] {
    let digest = Sha256::digest(token.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
