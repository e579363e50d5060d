use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Number of random bytes fed into the digest.
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Length of a generated token: hex-encoded SHA-256.
pub const TOKEN_LENGTH: usize = 64;

/// Generates an opaque token value from the operating system's CSPRNG.
pub fn generate_token() -> Result<String, AuthError> {
    generate_token_with(&mut OsRng)
}

/// Draws 32 bytes from `rng`, hashes them with SHA-256 and returns the lowercase hex digest.
///
/// A failing source is reported as [`AuthError::Entropy`]; there is no fallback.
pub fn generate_token_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::Entropy(e.to_string()))?;

    let digest = Sha256::digest(bytes);
    Ok(hex::encode(digest))
}

/// Checks that `value` has the shape of a generated token: 64 lowercase hex digits.
///
/// Anything else can never match a stored token and is not worth a lookup.
pub fn is_token_shaped(value: &str) -> bool {
    value.len() == TOKEN_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
