// Miner: builds a block template from the chain tip and mempool, then
// searches for a nonce whose double-SHA-256 hash meets the target. Grounded
// on the teacher's `miner/miner.rs::mine_block` template-rebuild-on-
// preemption loop shape; the PONC engine call is replaced by a plain
// `block_hash_of(header) <= target` check and the referral-binding
// transaction injection is dropped as out-of-spec.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use primitive_types::U256;

use crate::chain::Chain;
use crate::consensus::reward;
use crate::mempool::Mempool;
use crate::primitives::block::Block;
use crate::primitives::target_from_bits;
use crate::primitives::transaction::Transaction;

pub const MAX_TXS_PER_BLOCK: usize = 2000;
pub const MAX_BLOCK_BYTES: usize = 1_000_000;
/// Nonce space searched before the timestamp is refreshed and the search
/// restarts; the cancellation signal is checked every iteration regardless,
/// which is more responsive than the minimum of once per 2^16 nonces.
const NONCE_SPACE_BEFORE_RETIMESTAMP: u64 = 1 << 16;

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
}

/// Builds an unmined block template: tip + mempool picks + a coinbase paying
/// the block reward plus collected fees.
pub fn build_template(chain: &Chain, mempool: &Mempool, miner_address: &str) -> Block {
    let (height, tip_hash, _) = chain.tip();
    let bits = chain.expected_difficulty_bits_for_next();
    let balances = chain.balances_snapshot();
    let picked = mempool.pick(MAX_TXS_PER_BLOCK, MAX_BLOCK_BYTES, &balances);
    let fees: u64 = picked.iter().map(|tx| tx.fee).sum();
    let timestamp = now_secs().max(chain.median_time_past() + 1);

    let coinbase = Transaction::new_coinbase(miner_address.to_string(), reward::reward(height + 1) + fees, timestamp);
    let mut transactions = Vec::with_capacity(picked.len() + 1);
    transactions.push(coinbase);
    transactions.extend(picked);

    let merkle_root = Block::merkle_root(&transactions);
    Block {
        header: crate::primitives::block::BlockHeader {
            index: height + 1,
            previous_hash: tip_hash,
            timestamp,
            merkle_root,
            nonce: 0,
            difficulty_bits: bits,
        },
        transactions,
    }
}

/// Searches nonces starting from the template's current value until the
/// block hash meets its target or `stop` is set. Returns `None` if
/// cancelled before a solution was found. `min_timestamp` is the floor a
/// retimestamp may not drop below (the template's median-time-past + 1).
pub fn mine(mut template: Block, min_timestamp: u64, stop: &AtomicBool) -> Option<Block> {
    let target = target_from_bits(template.header.difficulty_bits);
    let mut since_retimestamp = 0u64;
    loop {
        if stop.load(Ordering::Relaxed) {
            return None;
        }
        if U256::from_big_endian(&template.hash()) <= target {
            return Some(template);
        }
        template.header.nonce = template.header.nonce.wrapping_add(1);
        since_retimestamp += 1;
        if since_retimestamp >= NONCE_SPACE_BEFORE_RETIMESTAMP {
            since_retimestamp = 0;
            template.header.timestamp = now_secs().max(min_timestamp);
        }
    }
}

/// Mines a single block against the current chain tip and mempool. Returns
/// the solved block, or `None` if cancelled via `stop` first.
pub fn mine_next_block(chain: &Chain, mempool: &Mempool, miner_address: &str, stop: &AtomicBool) -> Option<Block> {
    let template = build_template(chain, mempool, miner_address);
    let min_timestamp = chain.median_time_past() + 1;
    mine(template, min_timestamp, stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::genesis::create_genesis_block;
    use crate::crypto::keys::{derive_address, derive_keypair};

    #[test]
    fn test_mine_solves_genesis_difficulty() {
        let chain = Chain::new(create_genesis_block());
        let mempool = Mempool::new(crate::mempool::DEFAULT_MAX_BYTES, crate::mempool::DEFAULT_TX_TTL_SECS);
        let (pk, _) = derive_keypair(&[1u8; 64]);
        let miner = derive_address(&pk);
        let stop = AtomicBool::new(false);
        let solved = mine_next_block(&chain, &mempool, &miner, &stop).expect("mining should succeed");
        let target = target_from_bits(solved.header.difficulty_bits);
        assert!(U256::from_big_endian(&solved.hash()) <= target);
    }

    #[test]
    fn test_mine_respects_stop_signal() {
        let chain = Chain::new(create_genesis_block());
        let mempool = Mempool::new(crate::mempool::DEFAULT_MAX_BYTES, crate::mempool::DEFAULT_TX_TTL_SECS);
        let (pk, _) = derive_keypair(&[1u8; 64]);
        let miner = derive_address(&pk);
        let template = build_template(&chain, &mempool, &miner);
        let min_timestamp = chain.median_time_past() + 1;
        let stop = AtomicBool::new(true);
        assert!(mine(template, min_timestamp, &stop).is_none());
    }
}
