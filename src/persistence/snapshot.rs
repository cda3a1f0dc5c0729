// Periodic chain snapshot (`chain.snapshot`): height, tip hash, difficulty
// bits, and the full balance map, checksummed and written atomically via a
// `snapshot.tmp` -> rename so a crash mid-write never corrupts the previous
// snapshot. Grounded on the teacher's write -> fsync -> rename discipline
// for its RocksDB tip pointer, generalized to a whole-file swap.
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crc32fast::Hasher;

use crate::primitives::BalanceMap;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("checksum mismatch; snapshot is corrupt")]
    BadChecksum,
    #[error("malformed snapshot encoding")]
    Malformed,
}

pub struct Snapshot {
    pub height: u64,
    pub tip_hash: [u8; 32],
    pub difficulty_bits: u32,
    pub balances: BalanceMap,
}

impl Snapshot {
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.extend_from_slice(&self.tip_hash);
        buf.extend_from_slice(&self.difficulty_bits.to_le_bytes());
        buf.extend_from_slice(&(self.balances.len() as u32).to_le_bytes());
        for (addr, amount) in &self.balances {
            buf.extend_from_slice(&(addr.len() as u16).to_le_bytes());
            buf.extend_from_slice(addr.as_bytes());
            buf.extend_from_slice(&amount.to_le_bytes());
        }
        buf
    }

    fn decode(data: &[u8]) -> Result<Self, SnapshotError> {
        let mut off = 0usize;
        let height = read_u64(data, &mut off)?;
        let tip_hash = read_hash(data, &mut off)?;
        let difficulty_bits = read_u32(data, &mut off)?;
        let count = read_u32(data, &mut off)? as usize;
        let mut balances = BalanceMap::new();
        for _ in 0..count {
            let len = read_u16(data, &mut off)? as usize;
            let addr_bytes = data.get(off..off + len).ok_or(SnapshotError::Malformed)?;
            off += len;
            let addr = String::from_utf8(addr_bytes.to_vec()).map_err(|_| SnapshotError::Malformed)?;
            let amount = read_u64(data, &mut off)?;
            balances.insert(addr, amount);
        }
        Ok(Snapshot { height, tip_hash, difficulty_bits, balances })
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), SnapshotError> {
        let body = self.encode();
        let mut hasher = Hasher::new();
        hasher.update(&body);
        let crc = hasher.finalize();

        let tmp_path = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            writer.write_all(&body)?;
            writer.write_all(&crc.to_le_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Option<Self>, SnapshotError> {
        if !path.exists() {
            return Ok(None);
        }
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        if data.len() < 4 {
            return Err(SnapshotError::Malformed);
        }
        let (body, crc_bytes) = data.split_at(data.len() - 4);
        let expected_crc = u32::from_le_bytes(crc_bytes.try_into().unwrap());
        let mut hasher = Hasher::new();
        hasher.update(body);
        if hasher.finalize() != expected_crc {
            return Err(SnapshotError::BadChecksum);
        }
        Ok(Some(Self::decode(body)?))
    }
}

fn read_u64(data: &[u8], off: &mut usize) -> Result<u64, SnapshotError> {
    let bytes = data.get(*off..*off + 8).ok_or(SnapshotError::Malformed)?;
    *off += 8;
    Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_u32(data: &[u8], off: &mut usize) -> Result<u32, SnapshotError> {
    let bytes = data.get(*off..*off + 4).ok_or(SnapshotError::Malformed)?;
    *off += 4;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_u16(data: &[u8], off: &mut usize) -> Result<u16, SnapshotError> {
    let bytes = data.get(*off..*off + 2).ok_or(SnapshotError::Malformed)?;
    *off += 2;
    Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_hash(data: &[u8], off: &mut usize) -> Result<[u8; 32], SnapshotError> {
    let bytes = data.get(*off..*off + 32).ok_or(SnapshotError::Malformed)?;
    *off += 32;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(bytes);
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "globalcoyn_snapshot_test_{}_{}_{}",
            std::process::id(),
            name,
            std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_nanos()
        ))
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let path = tmp_path("roundtrip");
        let mut balances = BalanceMap::new();
        balances.insert("alice".to_string(), 500);
        let snap = Snapshot { height: 3, tip_hash: [7u8; 32], difficulty_bits: 0x1f00_ffff, balances };
        snap.write_atomic(&path).unwrap();

        let loaded = Snapshot::read(&path).unwrap().unwrap();
        assert_eq!(loaded.height, 3);
        assert_eq!(loaded.tip_hash, [7u8; 32]);
        assert_eq!(loaded.balances.get("alice"), Some(&500));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let path = tmp_path("missing");
        assert!(Snapshot::read(&path).unwrap().is_none());
    }
}
