//! Credential hashing.
//!
//! Passwords are never stored verbatim. Each account carries a random salt
//! and an HMAC-SHA256 digest of the password keyed by that salt; submitted
//! secrets are verified with a constant-time comparison.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

/// Salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// A salted password digest, stored hex-encoded on the account record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PasswordHash {
    pub salt: String,
    pub digest: String,
}

impl PasswordHash {
    /// Hashes `password` under a freshly generated random salt.
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = compute_digest(&salt, password);
        Self {
            salt: hex::encode(salt),
            digest: hex::encode(digest),
        }
    }

    /// Verifies a submitted password in constant time.
    ///
    /// A record with an undecodable salt or digest never verifies.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(salt) = hex::decode(&self.salt) else {
            return false;
        };
        let Ok(expected) = hex::decode(&self.digest) else {
            return false;
        };
        let actual = compute_digest(&salt, password);
        constant_time_eq(&actual, &expected)
    }
}

fn compute_digest(salt: &[u8], password: &str) -> [u8; 32] {
    // HMAC accepts keys of any length
    let mut mac = Hmac::<Sha256>::new_from_slice(salt).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().into()
}

/// Constant-time byte slice comparison.
///
/// Comparison time depends only on the slice lengths, not their contents.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordHash::new("farmer123");
        assert!(hash.verify("farmer123"));
        assert!(!hash.verify("farmer124"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = PasswordHash::new("secret");
        let b = PasswordHash::new("secret");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_corrupt_record_never_verifies() {
        let mut hash = PasswordHash::new("secret");
        hash.digest = "not-hex".to_string();
        assert!(!hash.verify("secret"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
