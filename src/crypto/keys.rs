// Key derivation, signing, and address management
use crate::crypto::hash::{hash160, hash_sha256};
use crate::crypto::wordlist::ENGLISH;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{ecdsa, Message, Secp256k1, SecretKey as SkInner};
use sha2::Sha512;

pub const ADDRESS_HASH_BYTES: usize = 20;
const ADDRESS_VERSION: u8 = 0x00;

#[derive(Clone, Copy)]
pub struct PublicKey(pub [u8; 33]);

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl serde::Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        if bytes.len() != 33 {
            return Err(serde::de::Error::custom("invalid public key length"));
        }
        let mut arr = [0u8; 33];
        arr.copy_from_slice(&bytes);
        Ok(PublicKey(arr))
    }
}

#[derive(Clone)]
pub struct SecretKey(pub [u8; 32]);

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// Fixed 64-byte (r, s) ECDSA signature, low-s canonicalised.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", hex::encode(self.0))
    }
}

impl serde::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        if bytes.len() != 64 {
            return Err(serde::de::Error::custom("invalid signature length"));
        }
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&bytes);
        Ok(Signature(arr))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid address encoding")]
    InvalidEncoding,
    #[error("invalid address checksum")]
    InvalidChecksum,
    #[error("invalid address version byte")]
    InvalidVersion,
    #[error("invalid address length")]
    InvalidLength,
}

#[derive(Debug, thiserror::Error)]
pub enum MnemonicError {
    #[error("mnemonic must contain exactly 12 words")]
    WrongWordCount,
    #[error("unknown word in mnemonic: {0}")]
    UnknownWord(String),
    #[error("mnemonic checksum does not match its entropy")]
    BadChecksum,
}

/// Derives a secp256k1 keypair deterministically from a 64-byte account seed.
/// The seed is folded down with SHA-256 and the scalar is re-hashed until it
/// lands inside the curve order, matching how secp256k1 rejects zero/overflowing
/// scalars.
pub fn derive_keypair(seed: &[u8; 64]) -> (PublicKey, SecretKey) {
    let secp = Secp256k1::new();
    let mut candidate = hash_sha256(seed);
    let sk_inner = loop {
        match SkInner::from_slice(&candidate) {
            Ok(sk) => break sk,
            Err(_) => candidate = hash_sha256(&candidate),
        }
    };
    let pk_inner = secp256k1::PublicKey::from_secret_key(&secp, &sk_inner);
    (PublicKey(pk_inner.serialize()), SecretKey(sk_inner.secret_bytes()))
}

/// Generates a fresh random keypair, for contexts that don't need determinism.
pub fn generate_keypair() -> (PublicKey, SecretKey) {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();
    let (sk_inner, pk_inner) = secp.generate_keypair(&mut rng);
    (PublicKey(pk_inner.serialize()), SecretKey(sk_inner.secret_bytes()))
}

/// Signs a 32-byte digest, returning a fixed 64-byte low-s signature.
pub fn sign(digest: &[u8; 32], sk: &SecretKey) -> Signature {
    let secp = Secp256k1::new();
    let sk_inner = SkInner::from_slice(&sk.0).expect("secret key bytes are always valid");
    let msg = Message::from_digest(*digest);
    let sig = secp.sign_ecdsa(&msg, &sk_inner);
    Signature(sig.serialize_compact())
}

/// Verifies a signature over a 32-byte digest. Never panics on malformed input.
pub fn verify(digest: &[u8; 32], sig: &Signature, pk: &PublicKey) -> bool {
    let secp = Secp256k1::new();
    let pk_inner = match secp256k1::PublicKey::from_slice(&pk.0) {
        Ok(k) => k,
        Err(_) => return false,
    };
    let sig_inner = match ecdsa::Signature::from_compact(&sig.0) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let msg = Message::from_digest(*digest);
    secp.verify_ecdsa(&msg, &sig_inner, &pk_inner).is_ok()
}

/// Verifies a transaction signature against the claimed sender's address hash,
/// without the transaction carrying a public key: the compact (r, s) signature
/// is tried against all four ECDSA recovery ids, and accepted if any recovered
/// key hashes to `sender_hash`.
pub fn verify_tx_signature(
    digest: &[u8; 32],
    sig: &Signature,
    sender_hash: &[u8; ADDRESS_HASH_BYTES],
) -> bool {
    let secp = Secp256k1::new();
    let msg = Message::from_digest(*digest);
    for id in 0..4 {
        let Ok(recid) = RecoveryId::from_i32(id) else {
            continue;
        };
        let Ok(rsig) = RecoverableSignature::from_compact(&sig.0, recid) else {
            continue;
        };
        if let Ok(pk_inner) = secp.recover_ecdsa(&msg, &rsig) {
            if hash160(&pk_inner.serialize()) == *sender_hash {
                return true;
            }
        }
    }
    false
}

/// Hash of the public key used in the address (RIPEMD160(SHA256(pubkey))).
pub fn pubkey_hash(pk: &PublicKey) -> [u8; ADDRESS_HASH_BYTES] {
    hash160(&pk.0)
}

/// Base58Check-encodes a public-key hash with the mainnet version byte.
pub fn encode_address(hash: &[u8; ADDRESS_HASH_BYTES]) -> String {
    bs58::encode(hash)
        .with_check_version(ADDRESS_VERSION)
        .into_string()
}

/// Decodes and validates a Base58Check address, returning the public-key hash.
pub fn decode_address(s: &str) -> Result<[u8; ADDRESS_HASH_BYTES], AddressError> {
    let decoded = bs58::decode(s)
        .with_check(Some(ADDRESS_VERSION))
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidChecksum { .. } => AddressError::InvalidChecksum,
            bs58::decode::Error::InvalidVersion { .. } => AddressError::InvalidVersion,
            _ => AddressError::InvalidEncoding,
        })?;
    if decoded.len() != ADDRESS_HASH_BYTES {
        return Err(AddressError::InvalidLength);
    }
    let mut out = [0u8; ADDRESS_HASH_BYTES];
    out.copy_from_slice(&decoded);
    Ok(out)
}

/// Derives a Base58Check address string directly from a public key.
pub fn derive_address(pk: &PublicKey) -> String {
    encode_address(&pubkey_hash(pk))
}

/// Generates a new 12-word mnemonic from 128 bits of entropy plus a 4-bit checksum.
pub fn generate_mnemonic() -> String {
    let mut entropy = [0u8; 16];
    getrandom::getrandom(&mut entropy).expect("RNG failure");
    entropy_to_mnemonic(&entropy)
}

fn entropy_to_mnemonic(entropy: &[u8; 16]) -> String {
    let hash = hash_sha256(entropy);
    let checksum_bits = hash[0] >> 4; // top 4 bits

    let mut bits = Vec::with_capacity(132);
    for byte in entropy {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1);
        }
    }
    for i in (0..4).rev() {
        bits.push((checksum_bits >> i) & 1);
    }

    bits.chunks(11)
        .map(|chunk| {
            let mut index = 0usize;
            for (i, bit) in chunk.iter().enumerate() {
                if *bit == 1 {
                    index |= 1 << (10 - i);
                }
            }
            ENGLISH[index]
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validates a mnemonic's word membership and checksum.
pub fn validate_mnemonic(mnemonic: &str) -> Result<(), MnemonicError> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if words.len() != 12 {
        return Err(MnemonicError::WrongWordCount);
    }

    let mut bits = Vec::with_capacity(132);
    for word in &words {
        let index = ENGLISH
            .iter()
            .position(|w| w == word)
            .ok_or_else(|| MnemonicError::UnknownWord(word.to_string()))?;
        for i in (0..11).rev() {
            bits.push(((index >> i) & 1) as u8);
        }
    }

    let mut entropy = [0u8; 16];
    for (i, byte) in entropy.iter_mut().enumerate() {
        let mut v = 0u8;
        for b in 0..8 {
            v = (v << 1) | bits[i * 8 + b];
        }
        *byte = v;
    }

    let expected_checksum = (hash_sha256(&entropy)[0] >> 4) & 0x0F;
    let mut actual_checksum = 0u8;
    for b in 0..4 {
        actual_checksum = (actual_checksum << 1) | bits[128 + b];
    }

    if expected_checksum != actual_checksum {
        return Err(MnemonicError::BadChecksum);
    }
    Ok(())
}

/// Derives the master seed from a 12-word mnemonic via PBKDF2-HMAC-SHA512
/// (2048 iterations, salt `"mnemonic" || passphrase`).
pub fn derive_master_seed(mnemonic: &str, passphrase: &str) -> [u8; 64] {
    let salt = format!("mnemonic{}", passphrase);
    let mut seed = [0u8; 64];
    pbkdf2::<Hmac<Sha512>>(mnemonic.as_bytes(), salt.as_bytes(), 2048, &mut seed)
        .expect("PBKDF2 failed");
    seed
}

/// Derives an account-specific seed from the master seed (account 0 is primary).
pub fn derive_account_seed(master_seed: &[u8; 64], account_index: u64) -> [u8; 64] {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(b"globalcoyn account").expect("HMAC accepts any key size");
    mac.update(master_seed);
    mac.update(&account_index.to_be_bytes());
    let result = mac.finalize();
    let mut account_key = [0u8; 64];
    account_key.copy_from_slice(&result.into_bytes());
    account_key
}
