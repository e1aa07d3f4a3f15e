//! Credential hashing.
//!
//! New passwords are stored as Argon2id PHC strings with a per-account random
//! salt. Rows written by the earlier fixed-salt MD5 scheme still verify, and
//! report [`Credential::needs_upgrade`] so the caller can rehash them.

use std::fmt;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use md5::{Digest, Md5};
use subtle::ConstantTimeEq;
use quill_types::models::Account;

use crate::{Result, StoreError};

const LEGACY_SALT: &str = "7jk";

/// Hash a plaintext password for storage.
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;
    Ok(hashed.to_string())
}

fn legacy_digest(password: &str) -> String {
    hex::encode(Md5::digest(format!("{password}{LEGACY_SALT}").as_bytes()))
}

fn is_phc(stored: &str) -> bool {
    stored.starts_with('$')
}

/// An account together with its stored hash. The hash can only be checked,
/// never read back out.
pub struct Credential {
    account: Account,
    hash: String,
}

impl Credential {
    pub(crate) fn new(account: Account, hash: String) -> Self {
        Self { account, hash }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn into_account(self) -> Account {
        self.account
    }

    pub fn verify(&self, password: &str) -> bool {
        if is_phc(&self.hash) {
            match PasswordHash::new(&self.hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            }
        } else {
            let digest = legacy_digest(password);
            digest.len() == self.hash.len()
                && digest.as_bytes().ct_eq(self.hash.as_bytes()).unwrap_u8() == 1
        }
    }

    /// True when the stored hash uses the legacy fixed-salt scheme.
    pub fn needs_upgrade(&self) -> bool {
        !is_phc(&self.hash)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("account", &self.account)
            .field("hash", &"<redacted>")
            .finish()
    }
}
