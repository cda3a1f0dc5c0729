//! Node orchestrator (C10): owns the chain, mempool, peer manager, and
//! persistence, and publishes the narrow facade used by the external API
//! layer. Grounded on the teacher's `rpc/server.rs::RpcState` — a struct
//! holding `Arc<Mutex<..>>`-wrapped singletons for exactly this purpose —
//! generalized from an HTTP handler's state object into the facade itself,
//! since the REST layer the teacher built on top of it is out of scope.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::chain::{Chain, ExtendOutcome};
use crate::config::Config;
use crate::consensus::genesis::create_genesis_block;
use crate::crypto::keys::{
    derive_address, derive_keypair, derive_master_seed, SecretKey,
};
use crate::mempool::{Mempool, SubmitOutcome};
use crate::miner;
use crate::net::peer::{DiscoverySource, PeerManager, PeerRecord};
use crate::persistence::log::ChainLog;
use crate::persistence::peer_store;
use crate::persistence::snapshot::Snapshot;
use crate::persistence::wallet_store::{decrypt_secret_key, encrypt_secret_key, WalletStore};
use crate::primitives::block::Block;
use crate::primitives::transaction::Transaction;

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("malformed transaction: {0}")]
    MalformedTx(#[from] crate::primitives::transaction::TransactionError),
    #[error("mempool rejected transaction: {0}")]
    Mempool(crate::mempool::MempoolError),
    #[error("block rejected: {0}")]
    Chain(crate::chain::ChainError),
    #[error("unknown parent; block parked pending fetch")]
    UnknownParent,
    #[error("wallet store error: {0}")]
    Wallet(#[from] crate::persistence::wallet_store::WalletStoreError),
    #[error("unknown address")]
    UnknownAddress,
    #[error("unknown block")]
    UnknownBlock,
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chain log error: {0}")]
    Log(#[from] crate::persistence::log::LogError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] crate::persistence::snapshot::SnapshotError),
}

pub struct ChainInfo {
    pub height: u64,
    pub tip_hash: [u8; 32],
    pub difficulty_bits: u32,
}

pub struct MiningStatus {
    pub active: bool,
    pub miner_address: Option<String>,
}

pub struct NetworkStatus {
    pub outbound_peers: usize,
    pub known_peers: usize,
}

pub struct WalletInfo {
    pub address: String,
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
}

/// Owns the singleton chain/mempool/peer-manager/wallet-store instances and
/// exposes the facade the external API layer drives. Each owned resource is
/// behind its own mutex, matching the "sole mutator" ownership the chain and
/// mempool workers are specified to have — the teacher achieves the same
/// discipline with a single `Arc<Mutex<..>>` per shared resource rather than
/// a literal actor/channel system, and we follow that.
pub struct Orchestrator {
    config: Config,
    chain: Arc<Mutex<Chain>>,
    mempool: Arc<Mutex<Mempool>>,
    wallets: Arc<Mutex<WalletStore>>,
    peers: Arc<PeerManager>,
    log: Arc<Mutex<ChainLog>>,
    mining_active: Arc<AtomicBool>,
    mining_stop: Arc<AtomicBool>,
    mining_address: Arc<Mutex<Option<String>>>,
    miner_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Orchestrator {
    /// Opens the data directory, loads the snapshot (if any), replays the
    /// log past it, and starts with an empty mempool and peer table seeded
    /// from the configured bootstrap list and `peers.json`.
    pub async fn open(config: Config) -> Result<Self, NodeError> {
        std::fs::create_dir_all(&config.data_dir)?;

        let snapshot = Snapshot::read(&config.snapshot_path()).unwrap_or(None);
        let logged_blocks = ChainLog::replay(&config.chain_log_path()).unwrap_or_default();

        let mut chain = Chain::new(create_genesis_block());
        let mut mempool = Mempool::new(config.mempool_max_bytes, config.mempool_tx_ttl);
        if let Some(snap) = &snapshot {
            info!("snapshot on disk at height {}; replaying full log to rebuild chain state", snap.height);
        }
        // The log never holds genesis itself (only blocks appended past it),
        // so a full replay of every logged entry reconstructs the exact same
        // chain/balance state the snapshot describes; the snapshot itself
        // exists for crash recovery of the balance map, not as a replay
        // shortcut.
        for block in logged_blocks {
            match chain.try_extend(block, &mut mempool, now_secs()) {
                ExtendOutcome::Applied => {}
                other => warn!("discarding unreplayable logged block: {}", describe(&other)),
            }
        }

        let log = ChainLog::open(&config.chain_log_path()).map_err(NodeError::Log)?;
        let wallets = WalletStore::load(&config.wallets_path())?;
        let peers = PeerManager::new(config.max_outbound, config.max_inbound);
        for bootstrap in &config.bootstrap_peers {
            if let Some((host, port)) = bootstrap.rsplit_once(':') {
                if let Ok(port) = port.parse() {
                    peers.learn(host, port, DiscoverySource::Bootstrap, now_secs()).await;
                }
            }
        }
        for rec in peer_store::load(&config.peers_path()) {
            peers.learn(&rec.host, rec.port, DiscoverySource::Pex, rec.last_seen).await;
        }

        Ok(Orchestrator {
            config,
            chain: Arc::new(Mutex::new(chain)),
            mempool: Arc::new(Mutex::new(mempool)),
            wallets: Arc::new(Mutex::new(wallets)),
            peers: Arc::new(peers),
            log: Arc::new(Mutex::new(log)),
            mining_active: Arc::new(AtomicBool::new(false)),
            mining_stop: Arc::new(AtomicBool::new(false)),
            mining_address: Arc::new(Mutex::new(None)),
            miner_handle: Mutex::new(None),
        })
    }

    // ---- mempool / chain facade -------------------------------------------------

    pub async fn submit_tx(&self, tx: Transaction) -> Result<[u8; 32], NodeError> {
        tx.validate_structure()?;
        let hash = tx.tx_hash();
        let mut mempool = self.mempool.lock().await;
        if mempool.contains(&hash) {
            return Ok(hash); // idempotent: already known
        }
        let chain = self.chain.lock().await;
        let balances = chain.balances_snapshot();
        drop(chain);
        match mempool.submit(tx, &balances, now_secs()) {
            SubmitOutcome::Accepted => Ok(hash),
            SubmitOutcome::Rejected(e) => Err(NodeError::Mempool(e)),
        }
    }

    pub async fn mempool_snapshot(&self) -> Vec<Transaction> {
        let mut mempool = self.mempool.lock().await;
        mempool.expire(now_secs());
        let chain = self.chain.lock().await;
        mempool.pick(usize::MAX, usize::MAX, &chain.balances_snapshot())
    }

    pub async fn mempool_contains(&self, hash: &[u8; 32]) -> bool {
        self.mempool.lock().await.contains(hash)
    }

    pub async fn find_mempool_tx(&self, hash: &[u8; 32]) -> Option<Transaction> {
        self.mempool_snapshot().await.into_iter().find(|tx| &tx.tx_hash() == hash)
    }

    pub async fn get_block(&self, height: Option<u64>, hash: Option<[u8; 32]>) -> Result<Block, NodeError> {
        let chain = self.chain.lock().await;
        let found = match (height, hash) {
            (Some(h), _) => chain.get_block_by_height(h).cloned(),
            (None, Some(hash)) => chain.get_block_by_hash(&hash).cloned(),
            (None, None) => None,
        };
        found.ok_or(NodeError::UnknownBlock)
    }

    pub async fn get_chain_info(&self) -> ChainInfo {
        let chain = self.chain.lock().await;
        let (height, tip_hash, difficulty_bits) = chain.tip();
        ChainInfo { height, tip_hash, difficulty_bits }
    }

    /// Submits a block received from a peer or mined locally, persisting it
    /// and writing a fresh snapshot when applied.
    pub async fn submit_block(&self, block: Block) -> Result<(), NodeError> {
        let mut chain = self.chain.lock().await;
        let mut mempool = self.mempool.lock().await;
        match chain.try_extend(block, &mut mempool, now_secs()) {
            ExtendOutcome::Applied => {
                let applied = chain.get_block_by_height(chain.height()).unwrap().clone();
                let mut log = self.log.lock().await;
                log.append(&applied).map_err(NodeError::Log)?;
                drop(log);
                let (height, tip_hash, difficulty_bits) = chain.tip();
                let snap = Snapshot { height, tip_hash, difficulty_bits, balances: chain.balances_snapshot() };
                snap.write_atomic(&self.config.snapshot_path()).map_err(NodeError::Snapshot)?;
                info!("applied block at height {height}");
                Ok(())
            }
            ExtendOutcome::Orphaned => Err(NodeError::UnknownParent),
            ExtendOutcome::Accepted => Ok(()),
            ExtendOutcome::Rejected(e) => Err(NodeError::Chain(e)),
        }
    }

    // ---- mining facade -----------------------------------------------------------

    pub async fn start_mining(&self, miner_address: String) {
        if self.mining_active.swap(true, Ordering::SeqCst) {
            return; // already running
        }
        self.mining_stop.store(false, Ordering::SeqCst);
        *self.mining_address.lock().await = Some(miner_address.clone());

        let chain = self.chain.clone();
        let mempool = self.mempool.clone();
        let log = self.log.clone();
        let snapshot_path = self.config.snapshot_path();
        let stop = self.mining_stop.clone();
        let active = self.mining_active.clone();

        let handle = tokio::spawn(async move {
            loop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let (template, min_timestamp) = {
                    let chain = chain.lock().await;
                    let mempool = mempool.lock().await;
                    (miner::build_template(&chain, &mempool, &miner_address), chain.median_time_past() + 1)
                };
                let stop_for_mine = stop.clone();
                let solved = tokio::task::spawn_blocking(move || miner::mine(template, min_timestamp, &stop_for_mine))
                    .await
                    .ok()
                    .flatten();
                let Some(block) = solved else { break };

                let mut chain_guard = chain.lock().await;
                let mut mempool_guard = mempool.lock().await;
                if let ExtendOutcome::Applied = chain_guard.try_extend(block, &mut mempool_guard, now_secs()) {
                    let applied = chain_guard.get_block_by_height(chain_guard.height()).unwrap().clone();
                    let mut log_guard = log.lock().await;
                    let _ = log_guard.append(&applied);
                    drop(log_guard);
                    let (height, tip_hash, difficulty_bits) = chain_guard.tip();
                    let snap = Snapshot { height, tip_hash, difficulty_bits, balances: chain_guard.balances_snapshot() };
                    let _ = snap.write_atomic(&snapshot_path);
                    info!("mined block at height {height}");
                }
            }
            active.store(false, Ordering::SeqCst);
        });
        *self.miner_handle.lock().await = Some(handle);
    }

    pub async fn stop_mining(&self) {
        self.mining_stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.miner_handle.lock().await.take() {
            let _ = handle.await;
        }
        *self.mining_address.lock().await = None;
    }

    pub async fn mining_status(&self) -> MiningStatus {
        MiningStatus {
            active: self.mining_active.load(Ordering::SeqCst),
            miner_address: self.mining_address.lock().await.clone(),
        }
    }

    // ---- network facade -----------------------------------------------------------

    pub async fn network_status(&self) -> NetworkStatus {
        NetworkStatus {
            outbound_peers: self.peers.outbound_count().await,
            known_peers: self.peers.snapshot().await.len(),
        }
    }

    pub async fn connect_peer(&self, host: String, port: u16) {
        self.peers.learn(&host, port, DiscoverySource::Bootstrap, now_secs()).await;
    }

    /// Shares the live peer table with the gossip connection loop, so a peer
    /// the orchestrator's facade learns of (e.g. via `connect_peer`) is the
    /// same one the dial loop sees, and vice versa.
    pub fn peer_manager(&self) -> Arc<PeerManager> {
        self.peers.clone()
    }

    pub async fn list_peers(&self) -> Vec<PeerRecord> {
        self.peers.snapshot().await
    }

    /// Persists the current peer table to `peers.json`, as a clean shutdown does.
    pub async fn save_peers(&self) -> std::io::Result<()> {
        let addrs = self.peers.as_peer_addrs().await;
        let records: Vec<peer_store::PeerRecord> = addrs
            .into_iter()
            .map(|a| peer_store::PeerRecord { host: a.host, port: a.port, last_seen: a.last_seen })
            .collect();
        peer_store::save(&self.config.peers_path(), &records)
    }

    // ---- wallet facade -----------------------------------------------------------

    /// Generates a fresh mnemonic + keypair, encrypts the secret key under
    /// `password`, and stores it. Returns the new address and mnemonic
    /// (shown once; the caller is responsible for writing it down).
    pub async fn wallet_create(&self, password: &str) -> Result<(String, String), NodeError> {
        let mnemonic = crate::crypto::keys::generate_mnemonic();
        let seed = derive_master_seed(&mnemonic, "");
        let (pk, sk) = derive_keypair(&seed);
        let address = derive_address(&pk);
        self.store_wallet(&address, &sk, password).await?;
        Ok((address, mnemonic))
    }

    pub async fn wallet_import(&self, mnemonic: &str, password: &str) -> Result<String, NodeError> {
        crate::crypto::keys::validate_mnemonic(mnemonic).map_err(|_| NodeError::UnknownAddress)?;
        let seed = derive_master_seed(mnemonic, "");
        let (pk, sk) = derive_keypair(&seed);
        let address = derive_address(&pk);
        self.store_wallet(&address, &sk, password).await?;
        Ok(address)
    }

    async fn store_wallet(&self, address: &str, sk: &SecretKey, password: &str) -> Result<(), NodeError> {
        let entry = encrypt_secret_key(address, sk, password)?;
        let mut store = self.wallets.lock().await;
        store.insert(entry);
        store.save(&self.config.wallets_path())?;
        Ok(())
    }

    pub async fn wallet_list(&self) -> Vec<WalletInfo> {
        self.wallets.lock().await.addresses().into_iter().map(|address| WalletInfo { address }).collect()
    }

    pub async fn wallet_balance(&self, address: &str) -> u64 {
        self.chain.lock().await.balance(address)
    }

    /// Decrypts the wallet's key with `password`, signs `(recipient, amount,
    /// fee, payload)` as a new transaction, and submits it to the mempool.
    pub async fn wallet_sign_and_submit(
        &self,
        address: &str,
        password: &str,
        recipient: String,
        amount: u64,
        fee: u64,
        payload: Option<Vec<u8>>,
    ) -> Result<[u8; 32], NodeError> {
        let store = self.wallets.lock().await;
        let entry = store.find(address).ok_or(NodeError::UnknownAddress)?;
        let sk = decrypt_secret_key(entry, password)?;
        drop(store);

        let tx = crate::primitives::new_tx(address.to_string(), recipient, amount, fee, now_secs(), payload);
        let tx = crate::primitives::sign_tx(tx, &sk);
        self.submit_tx(tx).await
    }

    pub async fn address_history(&self, address: &str) -> Vec<Transaction> {
        self.chain.lock().await.history(address)
    }

    /// Graceful shutdown: stop mining, persist peers, flush the log.
    pub async fn shutdown(&self) {
        self.stop_mining().await;
        let _ = self.save_peers().await;
    }
}

fn describe(outcome: &ExtendOutcome) -> &'static str {
    match outcome {
        ExtendOutcome::Applied => "applied",
        ExtendOutcome::Orphaned => "orphaned",
        ExtendOutcome::Accepted => "accepted",
        ExtendOutcome::Rejected(_) => "rejected",
    }
}
