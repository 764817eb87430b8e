// crates/tessera-core/src/crypto.rs

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::host::HostPublicKey;

/// A 32-byte SHA-256 digest, used for file and piece checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Symmetric key a file is encrypted under before erasure coding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncryptionKey(pub [u8; 32]);

impl EncryptionKey {
    /// Generate a fresh random key from the OS RNG.
    pub fn generate() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        EncryptionKey(key)
    }
}

/// An ed25519 keypair identifying a storage host.
pub struct Keypair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl Keypair {
    /// Generate a new random ed25519 keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Keypair {
            signing_key,
            verifying_key,
        }
    }

    /// The public half as a host directory key.
    pub fn host_key(&self) -> HostPublicKey {
        HostPublicKey(self.verifying_key.to_bytes())
    }
}

/// Compute SHA-256 hash of the given bytes.
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    Hash(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        let data = b"erasure coded piece";
        let hash = hash_bytes(data);

        // Same input should produce same hash
        assert_eq!(hash, hash_bytes(data));

        // Different input should produce different hash
        assert_ne!(hash, hash_bytes(b"different"));
    }

    #[test]
    fn test_hash_display_is_hex() {
        let hash = hash_bytes(b"");
        assert_eq!(
            hash.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_keypairs_yield_distinct_host_keys() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert_ne!(a.host_key(), b.host_key());
        assert_eq!(a.host_key().0, a.verifying_key.to_bytes());
    }

    #[test]
    fn test_encryption_keys_are_random() {
        assert_ne!(EncryptionKey::generate(), EncryptionKey::generate());
    }
}
