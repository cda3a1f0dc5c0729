// Cryptographic hashing wrappers
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256: used for transaction hashing, Merkle trees, and as the input to `double_sha256`.
pub fn hash_sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 concat: hashes `a` then `b` without allocating a temporary Vec.
pub fn hash_sha256_concat(a: &[u8], b: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(a);
    hasher.update(b);
    hasher.finalize().into()
}

/// Double SHA-256, used for block hashing and address checksums.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    hash_sha256(&hash_sha256(data))
}

/// RIPEMD160(SHA256(data)), used for address derivation.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = hash_sha256(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_length() {
        let hash = hash_sha256(b"globalcoyn");
        assert_eq!(hash.len(), 32);
    }

    #[test]
    fn test_double_sha256_differs_from_single() {
        let data = b"globalcoyn";
        assert_ne!(double_sha256(data), hash_sha256(data));
    }

    #[test]
    fn test_double_sha256_is_hash_of_hash() {
        let data = b"globalcoyn";
        assert_eq!(double_sha256(data), hash_sha256(&hash_sha256(data)));
    }

    #[test]
    fn test_hash160_length() {
        assert_eq!(hash160(b"pubkey").len(), 20);
    }
}
