// Transaction data model: account-based, not UTXO. A transaction moves
// `amount` base units from `sender` to `recipient`, paying `fee` to whoever
// mines it. Coinbase transactions use the sentinel sender "0" and carry no
// signature.
use crate::crypto::hash::hash_sha256;
use crate::crypto::keys::{self, SecretKey, Signature};

/// Base units per whole coin (fixed 8 fractional digits, like satoshis).
pub const UNITS_PER_COIN: u64 = 100_000_000;
pub const MAX_PAYLOAD_BYTES: usize = 256;
pub const COINBASE_SENDER: &str = "0";

const TX_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
    pub fee: u64,
    pub timestamp: u64,
    pub signature: Option<Signature>,
    pub payload: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("transaction payload exceeds the maximum length")]
    PayloadTooLarge,
    #[error("coinbase transactions may not carry a signature")]
    CoinbaseHasSignature,
    #[error("non-coinbase transaction is missing a signature")]
    MissingSignature,
    #[error("signature does not verify against the sender address")]
    BadSignature,
    #[error("sender is not a valid Base58Check address")]
    BadSenderAddress,
    #[error("recipient is not a valid Base58Check address")]
    BadRecipientAddress,
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("malformed transaction encoding")]
    Malformed,
}

impl Transaction {
    pub fn new_coinbase(recipient: String, amount: u64, timestamp: u64) -> Self {
        Transaction {
            sender: COINBASE_SENDER.to_string(),
            recipient,
            amount,
            fee: 0,
            timestamp,
            signature: None,
            payload: None,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        self.sender == COINBASE_SENDER
    }

    /// Canonical digest: H(sender || recipient || amount || fee || timestamp || payload).
    /// This is both the signing digest and the transaction's identity (`tx_hash`).
    pub fn tx_hash(&self) -> [u8; 32] {
        hash_sha256(&self.signing_bytes())
    }

    fn signing_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + self.payload.as_ref().map_or(0, Vec::len));
        write_str(&mut buf, &self.sender);
        write_str(&mut buf, &self.recipient);
        buf.extend_from_slice(&self.amount.to_le_bytes());
        buf.extend_from_slice(&self.fee.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        if let Some(payload) = &self.payload {
            buf.extend_from_slice(payload);
        }
        buf
    }

    /// Structural validity: well-formed fields, payload bound, and (for
    /// non-coinbase transactions) a signature that recovers to `sender`.
    /// Does not check balances — that's the chain manager's job.
    pub fn validate_structure(&self) -> Result<(), TransactionError> {
        if let Some(payload) = &self.payload {
            if payload.len() > MAX_PAYLOAD_BYTES {
                return Err(TransactionError::PayloadTooLarge);
            }
        }
        if self.amount == 0 {
            return Err(TransactionError::ZeroAmount);
        }

        if self.is_coinbase() {
            if self.signature.is_some() {
                return Err(TransactionError::CoinbaseHasSignature);
            }
            keys::decode_address(&self.recipient).map_err(|_| TransactionError::BadRecipientAddress)?;
            return Ok(());
        }

        keys::decode_address(&self.recipient).map_err(|_| TransactionError::BadRecipientAddress)?;
        let sender_hash =
            keys::decode_address(&self.sender).map_err(|_| TransactionError::BadSenderAddress)?;
        let sig = self.signature.as_ref().ok_or(TransactionError::MissingSignature)?;
        let digest = self.tx_hash();
        if !keys::verify_tx_signature(&digest, sig, &sender_hash) {
            return Err(TransactionError::BadSignature);
        }
        Ok(())
    }

    /// Versioned binary encoding, used both on the wire and in `chain.log` frames.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![TX_VERSION];
        write_str(&mut buf, &self.sender);
        write_str(&mut buf, &self.recipient);
        buf.extend_from_slice(&self.amount.to_le_bytes());
        buf.extend_from_slice(&self.fee.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        match &self.signature {
            Some(sig) => {
                buf.push(1);
                buf.extend_from_slice(&sig.0);
            }
            None => buf.push(0),
        }
        match &self.payload {
            Some(p) => {
                buf.push(1);
                buf.extend_from_slice(&(p.len() as u16).to_le_bytes());
                buf.extend_from_slice(p);
            }
            None => buf.push(0),
        }
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, TransactionError> {
        let mut off = 0usize;
        let version = *data.first().ok_or(TransactionError::Malformed)?;
        if version != TX_VERSION {
            return Err(TransactionError::Malformed);
        }
        off += 1;
        let sender = read_str(data, &mut off)?;
        let recipient = read_str(data, &mut off)?;
        let amount = read_u64(data, &mut off)?;
        let fee = read_u64(data, &mut off)?;
        let timestamp = read_u64(data, &mut off)?;
        let has_sig = *data.get(off).ok_or(TransactionError::Malformed)?;
        off += 1;
        let signature = if has_sig == 1 {
            let bytes = data.get(off..off + 64).ok_or(TransactionError::Malformed)?;
            off += 64;
            let mut arr = [0u8; 64];
            arr.copy_from_slice(bytes);
            Some(Signature(arr))
        } else {
            None
        };
        let has_payload = *data.get(off).ok_or(TransactionError::Malformed)?;
        off += 1;
        let payload = if has_payload == 1 {
            let len = u16::from_le_bytes(
                data.get(off..off + 2)
                    .ok_or(TransactionError::Malformed)?
                    .try_into()
                    .unwrap(),
            ) as usize;
            off += 2;
            let bytes = data.get(off..off + len).ok_or(TransactionError::Malformed)?;
            Some(bytes.to_vec())
        } else {
            None
        };
        Ok(Transaction {
            sender,
            recipient,
            amount,
            fee,
            timestamp,
            signature,
            payload,
        })
    }
}

/// Signs an unsigned transaction in place and returns it, consuming the builder.
pub fn sign_transaction(mut tx: Transaction, sk: &SecretKey) -> Transaction {
    let digest = tx.tx_hash();
    tx.signature = Some(keys::sign(&digest, sk));
    tx
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn read_str(data: &[u8], off: &mut usize) -> Result<String, TransactionError> {
    let len = u16::from_le_bytes(
        data.get(*off..*off + 2)
            .ok_or(TransactionError::Malformed)?
            .try_into()
            .unwrap(),
    ) as usize;
    *off += 2;
    let bytes = data.get(*off..*off + len).ok_or(TransactionError::Malformed)?;
    *off += len;
    String::from_utf8(bytes.to_vec()).map_err(|_| TransactionError::Malformed)
}

fn read_u64(data: &[u8], off: &mut usize) -> Result<u64, TransactionError> {
    let bytes = data.get(*off..*off + 8).ok_or(TransactionError::Malformed)?;
    *off += 8;
    Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
}
