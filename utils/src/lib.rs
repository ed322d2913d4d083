use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::RngCore;

use abi::errors::{Error, Result};

pub mod sqlx_tester;

/// random salt in the PHC base64 alphabet
pub fn generate_salt() -> Result<SaltString> {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| Error::internal_with_details(e.to_string()))
}

/// argon2 hash in PHC string form; the salt travels inside the string
pub fn hash_password(password: &[u8]) -> Result<String> {
    let salt = generate_salt()?;
    let hash = Argon2::default()
        .hash_password(password, &salt)
        .map_err(|e| Error::internal_with_details(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &[u8], hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| Error::internal_with_details(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password, &parsed_hash)
        .is_ok())
}
