// Peer address book (`peers.json`): regenerated on clean shutdown so a
// restarted node can reconnect without a fresh bootstrap/DNS-seed pass.
// Grounded on the teacher's `rpc/server.rs::load_known_peers_from_disk`.
use std::path::Path;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PeerRecord {
    pub host: String,
    pub port: u16,
    pub last_seen: u64,
}

pub fn load(path: &Path) -> Vec<PeerRecord> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save(path: &Path, peers: &[PeerRecord]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(peers).expect("peer records always serialize");
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "globalcoyn_peers_test_{}_{}_{}",
            std::process::id(),
            name,
            std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos()
        ))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = tmp_path("roundtrip");
        let peers = vec![PeerRecord { host: "1.2.3.4".to_string(), port: 9000, last_seen: 123 }];
        save(&path, &peers).unwrap();
        assert_eq!(load(&path), peers);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let path = tmp_path("missing");
        assert!(load(&path).is_empty());
    }
}
