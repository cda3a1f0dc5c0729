// Genesis block definition.
//
// Unlike every later block, genesis carries no coinbase and no transactions
// at all: its only job is to anchor `previous_hash = [0; 32]` at height 0 so
// every other block's ancestry can be walked back to a fixed point.
use crate::primitives::block::{Block, BlockHeader};

/// Generous starting target (exponent 0x1f, near-max mantissa) so a fresh
/// network can find its first blocks quickly; difficulty climbs from here
/// via normal retargeting.
pub const GENESIS_DIFFICULTY_BITS: u32 = 0x1f00_ffff;
pub const GENESIS_TIMESTAMP: u64 = 1_800_000_000;

pub fn create_genesis_block() -> Block {
    Block {
        header: BlockHeader {
            index: 0,
            previous_hash: [0u8; 32],
            timestamp: GENESIS_TIMESTAMP,
            merkle_root: Block::merkle_root(&[]),
            nonce: 0,
            difficulty_bits: GENESIS_DIFFICULTY_BITS,
        },
        transactions: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_has_no_transactions() {
        let genesis = create_genesis_block();
        assert!(genesis.transactions.is_empty());
        assert_eq!(genesis.header.previous_hash, [0u8; 32]);
        assert_eq!(genesis.index(), 0);
    }

    #[test]
    fn test_genesis_hash_is_deterministic() {
        assert_eq!(create_genesis_block().hash(), create_genesis_block().hash());
    }
}
