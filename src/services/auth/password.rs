//! Credential hash checks.
//!
//! The user service stores BCrypt (`$2a$`, `$2b$`, `$2y$`) hashes; argon2 PHC
//! strings are accepted as well.
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// `false` for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(password: &str, credential_hash: &str) -> bool {
    if is_bcrypt(credential_hash) {
        return verify_bcrypt(password, credential_hash);
    }

    let parsed = match PasswordHash::new(credential_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored credential hash is neither bcrypt nor a PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn is_bcrypt(credential_hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| credential_hash.starts_with(prefix))
}

fn verify_bcrypt(password: &str, credential_hash: &str) -> bool {
    match bcrypt::verify(password, credential_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "stored bcrypt hash is malformed");
            false
        }
    }
}

/// Hash with a caller-provided salt (B64, no padding).
pub fn hash_password(password: &str, salt_b64: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::from_b64(salt_b64)?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}
