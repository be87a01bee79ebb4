//! Faculty password hashing.
//!
//! Passwords are stored as Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`)
//! with a fresh random salt per hash. The work factor is the `argon2` crate's
//! default parameter set (19 MiB memory, 2 passes, 1 lane), the OWASP
//! minimum for Argon2id. It takes the place of a bcrypt cost factor of at
//! least 10; lowering any parameter below these defaults is not allowed.
//!
//! Verification reads the parameters back out of the stored string, so hashes
//! written under older settings keep verifying if [`hasher`] is retuned.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hash a signup or replacement password.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a signin attempt against a stored hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
