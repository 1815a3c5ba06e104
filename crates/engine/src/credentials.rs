//! Credential hashing.
//!
//! Salts are the hex SHA-256 of 256 random bytes; the stored hash is the
//! hex SHA-256 of `credential + "_" + salt`.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_SEED_BYTES: usize = 256;

pub(crate) fn new_salt() -> String {
    let mut seed = [0u8; SALT_SEED_BYTES];
    rand::thread_rng().fill_bytes(&mut seed);
    hex::encode(Sha256::digest(seed))
}

pub(crate) fn hash_with_salt(credential: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    hasher.update(b"_");
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
