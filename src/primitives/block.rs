// Data Structures: Block
use super::transaction::Transaction;
use crate::crypto::hash::{double_sha256, hash_sha256_concat};

const BLOCK_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    pub index: u64,
    pub previous_hash: [u8; 32],
    pub timestamp: u64,
    pub merkle_root: [u8; 32],
    pub nonce: u64,
    pub difficulty_bits: u32,
}

impl BlockHeader {
    fn preimage(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + 32 + 8 + 32 + 8 + 4);
        buf.extend_from_slice(&self.index.to_le_bytes());
        buf.extend_from_slice(&self.previous_hash);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.merkle_root);
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf.extend_from_slice(&self.difficulty_bits.to_le_bytes());
        buf
    }

    /// `hash = double_sha256(index || previous_hash || timestamp || merkle_root || nonce || difficulty_bits)`.
    pub fn hash(&self) -> [u8; 32] {
        double_sha256(&self.preimage())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("malformed block encoding")]
    Malformed,
}

impl Block {
    pub fn hash(&self) -> [u8; 32] {
        self.header.hash()
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    /// Binary Merkle tree over transaction hashes. An odd node at any level is
    /// paired with a duplicate of itself, matching the usual account-model
    /// convention for an even-depth tree regardless of transaction count.
    pub fn merkle_root(transactions: &[Transaction]) -> [u8; 32] {
        if transactions.is_empty() {
            return [0u8; 32];
        }
        let mut level: Vec<[u8; 32]> = transactions.iter().map(|t| t.tx_hash()).collect();
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let (a, b) = if pair.len() == 2 { (pair[0], pair[1]) } else { (pair[0], pair[0]) };
                next.push(hash_sha256_concat(&a, &b));
            }
            level = next;
        }
        level[0]
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![BLOCK_VERSION];
        buf.extend_from_slice(&self.header.index.to_le_bytes());
        buf.extend_from_slice(&self.header.previous_hash);
        buf.extend_from_slice(&self.header.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.header.merkle_root);
        buf.extend_from_slice(&self.header.nonce.to_le_bytes());
        buf.extend_from_slice(&self.header.difficulty_bits.to_le_bytes());
        buf.extend_from_slice(&(self.transactions.len() as u32).to_le_bytes());
        for tx in &self.transactions {
            let tx_bytes = tx.to_bytes();
            buf.extend_from_slice(&(tx_bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(&tx_bytes);
        }
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, BlockError> {
        let mut off = 0usize;
        let version = *data.first().ok_or(BlockError::Malformed)?;
        if version != BLOCK_VERSION {
            return Err(BlockError::Malformed);
        }
        off += 1;
        let index = read_u64(data, &mut off)?;
        let previous_hash = read_hash(data, &mut off)?;
        let timestamp = read_u64(data, &mut off)?;
        let merkle_root = read_hash(data, &mut off)?;
        let nonce = read_u64(data, &mut off)?;
        let difficulty_bits = u32::from_le_bytes(
            data.get(off..off + 4)
                .ok_or(BlockError::Malformed)?
                .try_into()
                .unwrap(),
        );
        off += 4;
        let tx_count = u32::from_le_bytes(
            data.get(off..off + 4)
                .ok_or(BlockError::Malformed)?
                .try_into()
                .unwrap(),
        ) as usize;
        off += 4;
        let mut transactions = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            let len = u32::from_le_bytes(
                data.get(off..off + 4)
                    .ok_or(BlockError::Malformed)?
                    .try_into()
                    .unwrap(),
            ) as usize;
            off += 4;
            let tx_bytes = data.get(off..off + len).ok_or(BlockError::Malformed)?;
            off += len;
            transactions.push(Transaction::from_bytes(tx_bytes).map_err(|_| BlockError::Malformed)?);
        }
        Ok(Block {
            header: BlockHeader {
                index,
                previous_hash,
                timestamp,
                merkle_root,
                nonce,
                difficulty_bits,
            },
            transactions,
        })
    }
}

fn read_u64(data: &[u8], off: &mut usize) -> Result<u64, BlockError> {
    let bytes = data.get(*off..*off + 8).ok_or(BlockError::Malformed)?;
    *off += 8;
    Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_hash(data: &[u8], off: &mut usize) -> Result<[u8; 32], BlockError> {
    let bytes = data.get(*off..*off + 32).ok_or(BlockError::Malformed)?;
    *off += 32;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(bytes);
    Ok(arr)
}
