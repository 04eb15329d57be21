//! Wallet PIN hashing.
//!
//! A wallet may carry a `pin_hash`; transfers and withdrawals from such a
//! wallet must present the matching PIN. The hash is a salted SHA-256 of
//! `user_id:pin` so identical PINs hash differently per user.
//!
//! When a `pin_hash` is set and the caller supplies no PIN the check fails
//! closed.

use sha2::{Digest, Sha256};

/// Hashes a PIN for storage on the wallet.
#[must_use]
pub fn hash_pin(user_id: &str, pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifies a candidate PIN against a stored hash.
///
/// `None` candidate never verifies: a protected wallet rejects PIN-less
/// requests instead of waving them through.
#[must_use]
pub fn verify_pin(user_id: &str, candidate: Option<&str>, stored_hash: &str) -> bool {
    match candidate {
        Some(pin) => hash_pin(user_id, pin) == stored_hash,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_pin_verifies() {
        let hash = hash_pin("alice", "1234");
        assert!(verify_pin("alice", Some("1234"), &hash));
    }

    #[test]
    fn wrong_pin_or_wrong_user_fails() {
        let hash = hash_pin("alice", "1234");
        assert!(!verify_pin("alice", Some("4321"), &hash));
        assert!(!verify_pin("bob", Some("1234"), &hash));
    }

    #[test]
    fn missing_pin_fails_closed() {
        let hash = hash_pin("alice", "1234");
        assert!(!verify_pin("alice", None, &hash));
    }
}
