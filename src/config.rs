//! Node configuration, loaded from `GLOBALCOYN_*` environment variables with
//! typed defaults matching the configuration table. Generalized from the
//! teacher's flat `NetworkConfig`/`KNOTCOIN_*` constants into a single
//! struct covering every option the node needs.

use crate::consensus::difficulty::{DIFFICULTY_WINDOW, TARGET_BLOCK_TIME_SECS};
use crate::consensus::reward::HALVING_INTERVAL;
use crate::mempool::{DEFAULT_MAX_BYTES, DEFAULT_TX_TTL_SECS};
use crate::net::peer::{DEFAULT_MAX_INBOUND, DEFAULT_MAX_OUTBOUND};
use crate::net::protocol::{MAGIC_MAINNET, MAGIC_TESTNET};
use crate::primitives::transaction::UNITS_PER_COIN;

pub const DEFAULT_P2P_PORT: u16 = 9000;
pub const DEFAULT_API_PORT: u16 = 9001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Dev,
}

impl Network {
    fn parse(s: &str) -> Self {
        match s {
            "testnet" => Network::Testnet,
            "dev" => Network::Dev,
            _ => Network::Mainnet,
        }
    }

    pub fn magic(&self) -> [u8; 4] {
        match self {
            Network::Mainnet => MAGIC_MAINNET,
            Network::Testnet | Network::Dev => MAGIC_TESTNET,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node_id: u32,
    pub p2p_port: u16,
    pub api_port: u16,
    pub data_dir: std::path::PathBuf,
    pub network: Network,
    pub bootstrap_peers: Vec<String>,
    pub target_block_time: u64,
    pub difficulty_window: u64,
    pub halving_interval: u64,
    pub initial_reward: u64,
    pub max_outbound: usize,
    pub max_inbound: usize,
    pub mempool_max_bytes: usize,
    pub mempool_tx_ttl: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_id: 0,
            p2p_port: DEFAULT_P2P_PORT,
            api_port: DEFAULT_API_PORT,
            data_dir: default_data_dir(),
            network: Network::Mainnet,
            bootstrap_peers: Vec::new(),
            target_block_time: TARGET_BLOCK_TIME_SECS,
            difficulty_window: DIFFICULTY_WINDOW,
            halving_interval: HALVING_INTERVAL,
            initial_reward: 50 * UNITS_PER_COIN,
            max_outbound: DEFAULT_MAX_OUTBOUND,
            max_inbound: DEFAULT_MAX_INBOUND,
            mempool_max_bytes: DEFAULT_MAX_BYTES,
            mempool_tx_ttl: DEFAULT_TX_TTL_SECS,
        }
    }
}

impl Config {
    /// Overlay `GLOBALCOYN_*` environment variables onto the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Config::default();
        if let Some(v) = env_u32("GLOBALCOYN_NODE_ID") {
            cfg.node_id = v;
            cfg.p2p_port = DEFAULT_P2P_PORT.wrapping_add(v as u16);
            cfg.api_port = DEFAULT_API_PORT.wrapping_add(v as u16);
        }
        if let Some(v) = env_u16("GLOBALCOYN_P2P_PORT") {
            cfg.p2p_port = v;
        }
        if let Some(v) = env_u16("GLOBALCOYN_API_PORT") {
            cfg.api_port = v;
        }
        if let Ok(v) = std::env::var("GLOBALCOYN_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.data_dir = std::path::PathBuf::from(v);
            }
        }
        if let Ok(v) = std::env::var("GLOBALCOYN_NETWORK") {
            cfg.network = Network::parse(&v);
        }
        if let Ok(v) = std::env::var("GLOBALCOYN_BOOTSTRAP_PEERS") {
            cfg.bootstrap_peers = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Some(v) = env_u64("GLOBALCOYN_TARGET_BLOCK_TIME") {
            cfg.target_block_time = v;
        }
        if let Some(v) = env_u64("GLOBALCOYN_DIFFICULTY_WINDOW") {
            cfg.difficulty_window = v;
        }
        if let Some(v) = env_u64("GLOBALCOYN_HALVING_INTERVAL") {
            cfg.halving_interval = v;
        }
        if let Some(v) = env_u64("GLOBALCOYN_INITIAL_REWARD") {
            cfg.initial_reward = v * UNITS_PER_COIN;
        }
        if let Some(v) = env_usize("GLOBALCOYN_MAX_OUTBOUND") {
            cfg.max_outbound = v;
        }
        if let Some(v) = env_usize("GLOBALCOYN_MAX_INBOUND") {
            cfg.max_inbound = v;
        }
        if let Some(v) = env_usize("GLOBALCOYN_MEMPOOL_MAX_BYTES") {
            cfg.mempool_max_bytes = v;
        }
        if let Some(v) = env_u64("GLOBALCOYN_MEMPOOL_TX_TTL") {
            cfg.mempool_tx_ttl = v;
        }
        cfg
    }

    pub fn chain_log_path(&self) -> std::path::PathBuf {
        self.data_dir.join("chain.log")
    }

    pub fn snapshot_path(&self) -> std::path::PathBuf {
        self.data_dir.join("chain.snapshot")
    }

    pub fn wallets_path(&self) -> std::path::PathBuf {
        self.data_dir.join("wallets.dat")
    }

    pub fn peers_path(&self) -> std::path::PathBuf {
        self.data_dir.join("peers.json")
    }
}

fn env_u16(name: &str) -> Option<u16> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

pub fn default_data_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(resolve_home_dir()).join(".globalcoyn/mainnet")
}

fn resolve_home_dir() -> String {
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return home;
        }
    }
    #[cfg(windows)]
    {
        if let Ok(home) = std::env::var("USERPROFILE") {
            if !home.trim().is_empty() {
                return home;
            }
        }
        let drive = std::env::var("HOMEDRIVE").unwrap_or_default();
        let path = std::env::var("HOMEPATH").unwrap_or_default();
        if !drive.is_empty() || !path.is_empty() {
            return format!("{drive}{path}");
        }
    }
    ".".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_spec_table() {
        let cfg = Config::default();
        assert_eq!(cfg.target_block_time, 600);
        assert_eq!(cfg.difficulty_window, 2016);
        assert_eq!(cfg.halving_interval, 210_000);
        assert_eq!(cfg.max_outbound, 8);
        assert_eq!(cfg.max_inbound, 128);
    }

    #[test]
    fn test_network_parse() {
        assert_eq!(Network::parse("testnet"), Network::Testnet);
        assert_eq!(Network::parse("dev"), Network::Dev);
        assert_eq!(Network::parse("mainnet"), Network::Mainnet);
        assert_eq!(Network::parse("garbage"), Network::Mainnet);
    }
}
