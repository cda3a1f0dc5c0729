// Mempool: a fee-per-byte-ordered holding area for unconfirmed transactions,
// bounded by total byte size rather than entry count. Grounded on the
// teacher's integer-scaled `fee_per_byte_scaled` ordering and lowest-fee
// eviction, extended with a byte-size bound, a fee floor, and TTL expiry —
// none of which the teacher's mempool has an equivalent for.
use std::collections::HashMap;

use crate::primitives::transaction::Transaction;
use crate::primitives::BalanceMap;

pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_TX_TTL_SECS: u64 = 72 * 3600;

#[derive(Debug, Clone)]
pub struct MempoolEntry {
    pub tx: Transaction,
    pub received_at: u64,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MempoolError {
    #[error("transaction fails structural or signature validation")]
    InvalidTransaction,
    #[error("sender cannot cover amount + fee against confirmed balance and in-flight spends")]
    InsufficientFunds,
    #[error("fee per byte is below the pool's current floor")]
    FeeTooLow,
    #[error("transaction is already in the pool")]
    DuplicateTx,
    #[error("sender already has an in-flight transaction with this timestamp")]
    DuplicateSenderTimestamp,
}

pub enum SubmitOutcome {
    Accepted,
    Rejected(MempoolError),
}

pub struct Mempool {
    entries: HashMap<[u8; 32], MempoolEntry>,
    by_sender: HashMap<String, Vec<[u8; 32]>>,
    total_bytes: usize,
    max_bytes: usize,
    ttl_secs: u64,
}

impl Mempool {
    pub fn new(max_bytes: usize, ttl_secs: u64) -> Self {
        Mempool {
            entries: HashMap::new(),
            by_sender: HashMap::new(),
            total_bytes: 0,
            max_bytes,
            ttl_secs,
        }
    }

    fn fee_per_byte_scaled(fee: u64, size: usize) -> u64 {
        (fee * 10_000) / (size as u64).max(1)
    }

    fn current_floor(&self) -> u64 {
        self.entries
            .values()
            .map(|e| Self::fee_per_byte_scaled(e.tx.fee, e.size_bytes))
            .min()
            .unwrap_or(0)
    }

    fn sender_inflight(&self, sender: &str, exclude: Option<[u8; 32]>) -> u64 {
        self.by_sender
            .get(sender)
            .map(|hashes| {
                hashes
                    .iter()
                    .filter(|h| Some(**h) != exclude)
                    .filter_map(|h| self.entries.get(h))
                    .map(|e| e.tx.amount + e.tx.fee)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Validates and, if accepted, stores `tx`. `balances` is the chain's
    /// confirmed balance snapshot; solvency is checked against it plus
    /// whatever the sender already has pending in the pool.
    pub fn submit(&mut self, tx: Transaction, balances: &BalanceMap, now: u64) -> SubmitOutcome {
        if tx.validate_structure().is_err() {
            return SubmitOutcome::Rejected(MempoolError::InvalidTransaction);
        }
        let hash = tx.tx_hash();
        if self.entries.contains_key(&hash) {
            return SubmitOutcome::Rejected(MempoolError::DuplicateTx);
        }
        if self.by_sender.get(&tx.sender).is_some_and(|hashes| {
            hashes.iter().filter_map(|h| self.entries.get(h)).any(|e| e.tx.timestamp == tx.timestamp)
        }) {
            return SubmitOutcome::Rejected(MempoolError::DuplicateSenderTimestamp);
        }
        let size_bytes = tx.to_bytes().len();
        let confirmed = balances.get(&tx.sender).copied().unwrap_or(0);
        let inflight = self.sender_inflight(&tx.sender, None);
        if confirmed < inflight + tx.amount + tx.fee {
            return SubmitOutcome::Rejected(MempoolError::InsufficientFunds);
        }

        let fpb = Self::fee_per_byte_scaled(tx.fee, size_bytes);
        if self.total_bytes + size_bytes > self.max_bytes {
            if fpb <= self.current_floor() {
                return SubmitOutcome::Rejected(MempoolError::FeeTooLow);
            }
            self.evict_to_fit(size_bytes);
        }

        self.by_sender.entry(tx.sender.clone()).or_default().push(hash);
        self.total_bytes += size_bytes;
        self.entries.insert(hash, MempoolEntry { tx, received_at: now, size_bytes });
        SubmitOutcome::Accepted
    }

    fn evict_to_fit(&mut self, needed: usize) {
        while self.total_bytes + needed > self.max_bytes {
            let worst = self
                .entries
                .iter()
                .min_by_key(|(_, e)| Self::fee_per_byte_scaled(e.tx.fee, e.size_bytes))
                .map(|(h, _)| *h);
            match worst {
                Some(h) => self.remove_internal(&h),
                None => break,
            }
        }
    }

    fn remove_internal(&mut self, hash: &[u8; 32]) {
        if let Some(entry) = self.entries.remove(hash) {
            self.total_bytes -= entry.size_bytes;
            if let Some(v) = self.by_sender.get_mut(&entry.tx.sender) {
                v.retain(|h| h != hash);
            }
        }
    }

    /// Picks up to `max_count` transactions (bounded also by `max_bytes`),
    /// highest fee-per-byte first, skipping any that would overdraw the
    /// sender once earlier picks in this same batch are accounted for.
    pub fn pick(&self, max_count: usize, max_bytes: usize, balances: &BalanceMap) -> Vec<Transaction> {
        let mut entries: Vec<&MempoolEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            Self::fee_per_byte_scaled(b.tx.fee, b.size_bytes)
                .cmp(&Self::fee_per_byte_scaled(a.tx.fee, a.size_bytes))
                .then_with(|| a.received_at.cmp(&b.received_at))
        });

        let mut spent: HashMap<String, u64> = HashMap::new();
        let mut picked = Vec::new();
        let mut bytes_used = 0usize;
        for e in entries {
            if picked.len() >= max_count || bytes_used + e.size_bytes > max_bytes {
                continue;
            }
            let confirmed = balances.get(&e.tx.sender).copied().unwrap_or(0);
            let outflow = spent.entry(e.tx.sender.clone()).or_insert(0);
            if *outflow + e.tx.amount + e.tx.fee > confirmed {
                continue;
            }
            *outflow += e.tx.amount + e.tx.fee;
            bytes_used += e.size_bytes;
            picked.push(e.tx.clone());
        }
        picked
    }

    pub fn evict(&mut self, tx_hashes: &[[u8; 32]]) {
        for h in tx_hashes {
            self.remove_internal(h);
        }
    }

    pub fn expire(&mut self, now: u64) {
        let stale: Vec<[u8; 32]> = self
            .entries
            .iter()
            .filter(|(_, e)| now.saturating_sub(e.received_at) > self.ttl_secs)
            .map(|(h, _)| *h)
            .collect();
        for h in stale {
            self.remove_internal(&h);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, hash: &[u8; 32]) -> bool {
        self.entries.contains_key(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{derive_address, derive_keypair};
    use crate::primitives::transaction::sign_transaction;

    fn signed_tx(seed: u8, amount: u64, fee: u64) -> (Transaction, String) {
        let (pk, sk) = derive_keypair(&[seed; 64]);
        let sender = derive_address(&pk);
        let (rpk, _) = derive_keypair(&[seed.wrapping_add(1); 64]);
        let recipient = derive_address(&rpk);
        let tx = Transaction {
            sender: sender.clone(),
            recipient,
            amount,
            fee,
            timestamp: 1,
            signature: None,
            payload: None,
        };
        (sign_transaction(tx, &sk), sender)
    }

    #[test]
    fn test_accept_and_pick_highest_fee_first() {
        let mut pool = Mempool::new(DEFAULT_MAX_BYTES, DEFAULT_TX_TTL_SECS);
        let mut balances = BalanceMap::new();
        let (tx_low, sender_low) = signed_tx(1, 100, 1);
        let (tx_high, sender_high) = signed_tx(3, 100, 1000);
        balances.insert(sender_low, 1_000_000);
        balances.insert(sender_high, 1_000_000);

        assert!(matches!(pool.submit(tx_low, &balances, 0), SubmitOutcome::Accepted));
        assert!(matches!(pool.submit(tx_high.clone(), &balances, 0), SubmitOutcome::Accepted));

        let picked = pool.pick(1, usize::MAX, &balances);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].tx_hash(), tx_high.tx_hash());
    }

    #[test]
    fn test_insufficient_funds_rejected() {
        let mut pool = Mempool::new(DEFAULT_MAX_BYTES, DEFAULT_TX_TTL_SECS);
        let balances = BalanceMap::new();
        let (tx, _) = signed_tx(5, 100, 1);
        assert!(matches!(
            pool.submit(tx, &balances, 0),
            SubmitOutcome::Rejected(MempoolError::InsufficientFunds)
        ));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut pool = Mempool::new(DEFAULT_MAX_BYTES, DEFAULT_TX_TTL_SECS);
        let mut balances = BalanceMap::new();
        let (tx, sender) = signed_tx(7, 100, 1);
        balances.insert(sender, 1_000_000);
        assert!(matches!(pool.submit(tx.clone(), &balances, 0), SubmitOutcome::Accepted));
        assert!(matches!(
            pool.submit(tx, &balances, 0),
            SubmitOutcome::Rejected(MempoolError::DuplicateTx)
        ));
    }

    #[test]
    fn test_second_tx_from_same_sender_and_timestamp_rejected() {
        let mut pool = Mempool::new(DEFAULT_MAX_BYTES, DEFAULT_TX_TTL_SECS);
        let mut balances = BalanceMap::new();
        let (pk, sk) = derive_keypair(&[13u8; 64]);
        let sender = derive_address(&pk);
        let (rpk1, _) = derive_keypair(&[14u8; 64]);
        let (rpk2, _) = derive_keypair(&[15u8; 64]);
        balances.insert(sender.clone(), 1_000_000);

        let tx1 = sign_transaction(
            Transaction {
                sender: sender.clone(),
                recipient: derive_address(&rpk1),
                amount: 10,
                fee: 1,
                timestamp: 1,
                signature: None,
                payload: None,
            },
            &sk,
        );
        let tx2 = sign_transaction(
            Transaction {
                sender,
                recipient: derive_address(&rpk2),
                amount: 20,
                fee: 1,
                timestamp: 1,
                signature: None,
                payload: None,
            },
            &sk,
        );

        assert!(matches!(pool.submit(tx1, &balances, 0), SubmitOutcome::Accepted));
        assert!(matches!(
            pool.submit(tx2, &balances, 0),
            SubmitOutcome::Rejected(MempoolError::DuplicateSenderTimestamp)
        ));
    }

    #[test]
    fn test_expire_evicts_stale_entries() {
        let mut pool = Mempool::new(DEFAULT_MAX_BYTES, 100);
        let mut balances = BalanceMap::new();
        let (tx, sender) = signed_tx(9, 100, 1);
        balances.insert(sender, 1_000_000);
        pool.submit(tx, &balances, 0);
        assert_eq!(pool.len(), 1);
        pool.expire(50);
        assert_eq!(pool.len(), 1);
        pool.expire(200);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_pool_full_rejects_low_fee_when_at_capacity() {
        let mut pool = Mempool::new(1, DEFAULT_TX_TTL_SECS); // 1 byte cap forces immediate pressure
        let mut balances = BalanceMap::new();
        let (tx, sender) = signed_tx(11, 100, 1);
        balances.insert(sender, 1_000_000);
        assert!(matches!(
            pool.submit(tx, &balances, 0),
            SubmitOutcome::Rejected(MempoolError::FeeTooLow)
        ));
    }
}
