// Append-only block log (`chain.log`): `[len: u32 LE][block bytes][crc32: u32 LE]`
// per frame, fsynced after every append. Replay stops at the first truncated
// or checksum-mismatched frame, which is exactly the shape a crash mid-write
// leaves behind — everything before it is kept, the partial tail discarded.
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use crc32fast::Hasher;

use crate::primitives::block::{Block, BlockError};

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt block encoding: {0}")]
    Block(#[from] BlockError),
}

pub struct ChainLog {
    file: File,
}

impl ChainLog {
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let file = OpenOptions::new().create(true).append(true).read(true).open(path)?;
        Ok(ChainLog { file })
    }

    pub fn append(&mut self, block: &Block) -> Result<(), LogError> {
        let bytes = block.to_bytes();
        let mut hasher = Hasher::new();
        hasher.update(&bytes);
        let crc = hasher.finalize();

        self.file.write_all(&(bytes.len() as u32).to_le_bytes())?;
        self.file.write_all(&bytes)?;
        self.file.write_all(&crc.to_le_bytes())?;
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Replays every well-formed frame in the log, in order.
    pub fn replay(path: &Path) -> Result<Vec<Block>, LogError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = BufReader::new(File::open(path)?);
        let mut blocks = Vec::new();
        loop {
            let mut len_buf = [0u8; 4];
            if reader.read_exact(&mut len_buf).is_err() {
                break;
            }
            let len = u32::from_le_bytes(len_buf) as usize;
            let mut body = vec![0u8; len];
            if reader.read_exact(&mut body).is_err() {
                break;
            }
            let mut crc_buf = [0u8; 4];
            if reader.read_exact(&mut crc_buf).is_err() {
                break;
            }
            let expected_crc = u32::from_le_bytes(crc_buf);
            let mut hasher = Hasher::new();
            hasher.update(&body);
            if hasher.finalize() != expected_crc {
                break;
            }
            match Block::from_bytes(&body) {
                Ok(block) => blocks.push(block),
                Err(_) => break,
            }
        }
        Ok(blocks)
    }
}
