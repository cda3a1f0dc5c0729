//! Pure data model: transactions, blocks, and the small set of
//! constructor/validator operations that don't need chain state.
pub mod block;
pub mod transaction;

use block::{Block, BlockHeader};
use primitive_types::U256;
use transaction::Transaction;

use crate::crypto::keys::SecretKey;

/// Address -> confirmed balance, in base units. Owned by the chain manager;
/// passed by reference (or snapshot) to the mempool and miner.
pub type BalanceMap = std::collections::HashMap<String, u64>;

pub fn new_tx(
    sender: String,
    recipient: String,
    amount: u64,
    fee: u64,
    timestamp: u64,
    payload: Option<Vec<u8>>,
) -> Transaction {
    Transaction {
        sender,
        recipient,
        amount,
        fee,
        timestamp,
        signature: None,
        payload,
    }
}

pub fn sign_tx(tx: Transaction, sk: &SecretKey) -> Transaction {
    transaction::sign_transaction(tx, sk)
}

pub fn verify_tx(tx: &Transaction) -> Result<(), transaction::TransactionError> {
    tx.validate_structure()
}

pub fn new_block(
    index: u64,
    previous_hash: [u8; 32],
    timestamp: u64,
    difficulty_bits: u32,
    transactions: Vec<Transaction>,
) -> Block {
    let merkle_root = merkle_root_of(&transactions);
    Block {
        header: BlockHeader {
            index,
            previous_hash,
            timestamp,
            merkle_root,
            nonce: 0,
            difficulty_bits,
        },
        transactions,
    }
}

pub fn merkle_root_of(transactions: &[Transaction]) -> [u8; 32] {
    Block::merkle_root(transactions)
}

pub fn block_hash_of(block: &Block) -> [u8; 32] {
    block.hash()
}

/// Decodes 32-bit compact "difficulty bits" into a 256-bit target.
/// High byte is the exponent `e`, low 24 bits are the mantissa `m`:
/// `target = m * 2^(8*(e-3))`.
pub fn target_from_bits(bits: u32) -> U256 {
    let exponent = (bits >> 24) as i64;
    let mantissa = U256::from(bits & 0x00FF_FFFF);
    let shift = 8 * (exponent - 3);
    if shift >= 0 {
        mantissa << (shift as u32)
    } else {
        mantissa >> ((-shift) as u32)
    }
}
