// Encrypted wallet store (`wallets.dat`): one scrypt+AES-256-GCM blob per
// address. Grounded on the teacher's `wallet/keystore.rs::EncryptedKeystore`
// file layout (`salt || nonce || ciphertext`) and its save/load-to-a-single-
// file shape; the KDF is swapped from Argon2id to scrypt per the spec's
// explicit naming of that algorithm, and the secret payload shrinks from a
// 4032-byte Dilithium3 key to a 32-byte secp256k1 scalar.
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use scrypt::Params;

use crate::crypto::keys::SecretKey;

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
// scrypt cost parameters: N = 2^15, r = 8, p = 1 — comparable work factor to
// the teacher's Argon2id m_cost=65536/t_cost=3/p_cost=4.
const SCRYPT_LOG_N: u8 = 15;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum WalletStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("wrong password or corrupted entry")]
    Decrypt,
    #[error("malformed wallet store encoding")]
    Malformed,
    #[error("key derivation failed")]
    Kdf,
}

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32], WalletStoreError> {
    let params =
        Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32).map_err(|_| WalletStoreError::Kdf)?;
    let mut key = [0u8; 32];
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut key).map_err(|_| WalletStoreError::Kdf)?;
    Ok(key)
}

pub struct EncryptedEntry {
    pub address: String,
    blob: Vec<u8>, // salt || nonce || ciphertext+tag
}

pub fn encrypt_secret_key(
    address: &str,
    sk: &SecretKey,
    password: &str,
) -> Result<EncryptedEntry, WalletStoreError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt).expect("RNG failure");
    let mut nonce_bytes = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut nonce_bytes).expect("RNG failure");

    let key_bytes = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher.encrypt(nonce, sk.0.as_ref()).map_err(|_| WalletStoreError::Decrypt)?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(EncryptedEntry { address: address.to_string(), blob })
}

pub fn decrypt_secret_key(entry: &EncryptedEntry, password: &str) -> Result<SecretKey, WalletStoreError> {
    if entry.blob.len() < SALT_LEN + NONCE_LEN {
        return Err(WalletStoreError::Malformed);
    }
    let (salt, rest) = entry.blob.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
    let key_bytes = derive_key(password, salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));
    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|_| WalletStoreError::Decrypt)?;
    if plaintext.len() != 32 {
        return Err(WalletStoreError::Malformed);
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&plaintext);
    Ok(SecretKey(arr))
}

/// `wallets.dat` layout: `n_addresses: u32` then, per entry,
/// `(address_len: u16, address, cipher_len: u32, cipher)`.
pub struct WalletStore {
    entries: Vec<EncryptedEntry>,
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletStore {
    pub fn new() -> Self {
        WalletStore { entries: Vec::new() }
    }

    pub fn insert(&mut self, entry: EncryptedEntry) {
        self.entries.retain(|e| e.address != entry.address);
        self.entries.push(entry);
    }

    pub fn addresses(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.address.clone()).collect()
    }

    pub fn find(&self, address: &str) -> Option<&EncryptedEntry> {
        self.entries.iter().find(|e| e.address == address)
    }

    pub fn save(&self, path: &Path) -> Result<(), WalletStoreError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        for e in &self.entries {
            buf.extend_from_slice(&(e.address.len() as u16).to_le_bytes());
            buf.extend_from_slice(e.address.as_bytes());
            buf.extend_from_slice(&(e.blob.len() as u32).to_le_bytes());
            buf.extend_from_slice(&e.blob);
        }
        let tmp = path.with_extension("tmp");
        {
            let mut f = File::create(&tmp)?;
            f.write_all(&buf)?;
            f.flush()?;
            f.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, WalletStoreError> {
        if !path.exists() {
            return Ok(WalletStore::new());
        }
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        let mut off = 0usize;
        let count = read_u32(&data, &mut off)?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let addr_len = read_u16(&data, &mut off)? as usize;
            let addr_bytes = data.get(off..off + addr_len).ok_or(WalletStoreError::Malformed)?;
            off += addr_len;
            let address = String::from_utf8(addr_bytes.to_vec()).map_err(|_| WalletStoreError::Malformed)?;
            let cipher_len = read_u32(&data, &mut off)? as usize;
            let blob = data.get(off..off + cipher_len).ok_or(WalletStoreError::Malformed)?.to_vec();
            off += cipher_len;
            entries.push(EncryptedEntry { address, blob });
        }
        Ok(WalletStore { entries })
    }
}

fn read_u32(data: &[u8], off: &mut usize) -> Result<u32, WalletStoreError> {
    let bytes = data.get(*off..*off + 4).ok_or(WalletStoreError::Malformed)?;
    *off += 4;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_u16(data: &[u8], off: &mut usize) -> Result<u16, WalletStoreError> {
    let bytes = data.get(*off..*off + 2).ok_or(WalletStoreError::Malformed)?;
    *off += 2;
    Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::generate_keypair;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "globalcoyn_wallet_test_{}_{}_{}",
            std::process::id(),
            name,
            std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos()
        ))
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let (_, sk) = generate_keypair();
        let entry = encrypt_secret_key("addr1", &sk, "correct horse").unwrap();
        let decrypted = decrypt_secret_key(&entry, "correct horse").unwrap();
        assert_eq!(decrypted.0, sk.0);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let (_, sk) = generate_keypair();
        let entry = encrypt_secret_key("addr1", &sk, "correct horse").unwrap();
        assert!(decrypt_secret_key(&entry, "wrong password").is_err());
    }

    #[test]
    fn test_store_save_load_roundtrip() {
        let path = tmp_path("roundtrip");
        let (_, sk) = generate_keypair();
        let entry = encrypt_secret_key("addr1", &sk, "pw").unwrap();
        let mut store = WalletStore::new();
        store.insert(entry);
        store.save(&path).unwrap();

        let loaded = WalletStore::load(&path).unwrap();
        assert_eq!(loaded.addresses(), vec!["addr1".to_string()]);
        let decrypted = decrypt_secret_key(loaded.find("addr1").unwrap(), "pw").unwrap();
        assert_eq!(decrypted.0, sk.0);
        let _ = std::fs::remove_file(&path);
    }
}
