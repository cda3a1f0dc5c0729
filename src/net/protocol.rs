// Wire protocol — all messages are length-prefixed frames:
//   [4-byte magic][4-byte length][1-byte type][payload]
//
// Block and transaction payloads are transmitted as their canonical byte
// representation (via `Block::to_bytes`/`Transaction::to_bytes`), not via
// any generic serializer, so what arrives on the wire is byte-identical to
// what the chain log stores.

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::primitives::block::Block;
use crate::primitives::transaction::Transaction;

pub const MAGIC_MAINNET: [u8; 4] = [0x47, 0x43, 0x4E, 0x01]; // "GCN" + 0x01
pub const MAGIC_TESTNET: [u8; 4] = [0x47, 0x43, 0x4E, 0x02]; // "GCN" + 0x02
pub const MAX_FRAME: usize = 1024 * 1024; // matches MAX_BLOCK_BYTES headroom

/// Item kind carried by `INV`/`GETDATA` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InvKind {
    Tx = 0x01,
    Block = 0x02,
}

impl InvKind {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::Tx),
            0x02 => Some(Self::Block),
            _ => None,
        }
    }
}

/// The `(protocol_version, network_id, chain_tip_height, chain_tip_hash,
/// listen_port, nonce)` handshake tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: u32,
    pub network_id: u8,
    pub chain_tip_height: u64,
    pub chain_tip_hash: [u8; 32],
    pub listen_port: u16,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddr {
    pub host: String,
    pub port: u16,
    pub last_seen: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvItem {
    pub kind: InvKind,
    pub hash: [u8; 32],
}

#[derive(Debug, Clone)]
pub enum NetworkMessage {
    Hello(Handshake),
    Inv(Vec<InvItem>),
    GetData(Vec<InvItem>),
    Tx(Transaction),
    Block(Block),
    GetHeaders {
        from_hash: [u8; 32],
        stop_hash: [u8; 32],
        max: u32,
    },
    Headers(Vec<Block>), // headers only: each Block here carries empty `transactions`
    GetPeers,
    Peers(Vec<PeerAddr>),
    Ping(u64),
    Pong(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum MsgType {
    Hello = 0x01,
    Inv = 0x10,
    GetData = 0x11,
    Tx = 0x12,
    Block = 0x13,
    GetHeaders = 0x20,
    Headers = 0x21,
    GetPeers = 0x30,
    Peers = 0x31,
    Ping = 0x40,
    Pong = 0x41,
}

impl MsgType {
    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::Hello),
            0x10 => Some(Self::Inv),
            0x11 => Some(Self::GetData),
            0x12 => Some(Self::Tx),
            0x13 => Some(Self::Block),
            0x20 => Some(Self::GetHeaders),
            0x21 => Some(Self::Headers),
            0x30 => Some(Self::GetPeers),
            0x31 => Some(Self::Peers),
            0x40 => Some(Self::Ping),
            0x41 => Some(Self::Pong),
            _ => None,
        }
    }
}

fn write_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    write_u16(buf, s.len() as u16);
    buf.extend_from_slice(s.as_bytes());
}

fn write_inv(buf: &mut Vec<u8>, items: &[InvItem]) {
    write_u32(buf, items.len() as u32);
    for it in items {
        buf.push(it.kind as u8);
        buf.extend_from_slice(&it.hash);
    }
}

fn read_u16(d: &[u8], off: &mut usize) -> Option<u16> {
    let b = d.get(*off..*off + 2)?;
    *off += 2;
    Some(u16::from_le_bytes(b.try_into().unwrap()))
}

fn read_u32(d: &[u8], off: &mut usize) -> Option<u32> {
    let b = d.get(*off..*off + 4)?;
    *off += 4;
    Some(u32::from_le_bytes(b.try_into().unwrap()))
}

fn read_u64(d: &[u8], off: &mut usize) -> Option<u64> {
    let b = d.get(*off..*off + 8)?;
    *off += 8;
    Some(u64::from_le_bytes(b.try_into().unwrap()))
}

fn read_hash(d: &[u8], off: &mut usize) -> Option<[u8; 32]> {
    let b = d.get(*off..*off + 32)?;
    *off += 32;
    let mut h = [0u8; 32];
    h.copy_from_slice(b);
    Some(h)
}

fn read_str(d: &[u8], off: &mut usize) -> Option<String> {
    let len = read_u16(d, off)? as usize;
    let b = d.get(*off..*off + len)?;
    *off += len;
    String::from_utf8(b.to_vec()).ok()
}

fn read_inv(d: &[u8], off: &mut usize, limit: usize) -> Option<Vec<InvItem>> {
    let count = read_u32(d, off)? as usize;
    if count > limit {
        return None;
    }
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let kind_byte = *d.get(*off)?;
        *off += 1;
        let kind = InvKind::from_u8(kind_byte)?;
        let hash = read_hash(d, off)?;
        out.push(InvItem { kind, hash });
    }
    Some(out)
}

impl NetworkMessage {
    pub fn encode(&self, magic: [u8; 4]) -> Vec<u8> {
        let mut payload = Vec::new();
        match self {
            NetworkMessage::Hello(h) => {
                payload.push(MsgType::Hello as u8);
                write_u32(&mut payload, h.protocol_version);
                payload.push(h.network_id);
                write_u64(&mut payload, h.chain_tip_height);
                payload.extend_from_slice(&h.chain_tip_hash);
                write_u16(&mut payload, h.listen_port);
                write_u64(&mut payload, h.nonce);
            }
            NetworkMessage::Inv(items) => {
                payload.push(MsgType::Inv as u8);
                write_inv(&mut payload, items);
            }
            NetworkMessage::GetData(items) => {
                payload.push(MsgType::GetData as u8);
                write_inv(&mut payload, items);
            }
            NetworkMessage::Tx(tx) => {
                payload.push(MsgType::Tx as u8);
                payload.extend_from_slice(&tx.to_bytes());
            }
            NetworkMessage::Block(block) => {
                payload.push(MsgType::Block as u8);
                payload.extend_from_slice(&block.to_bytes());
            }
            NetworkMessage::GetHeaders { from_hash, stop_hash, max } => {
                payload.push(MsgType::GetHeaders as u8);
                payload.extend_from_slice(from_hash);
                payload.extend_from_slice(stop_hash);
                write_u32(&mut payload, *max);
            }
            NetworkMessage::Headers(blocks) => {
                payload.push(MsgType::Headers as u8);
                write_u32(&mut payload, blocks.len() as u32);
                for b in blocks {
                    let raw = b.to_bytes();
                    write_u32(&mut payload, raw.len() as u32);
                    payload.extend_from_slice(&raw);
                }
            }
            NetworkMessage::GetPeers => {
                payload.push(MsgType::GetPeers as u8);
            }
            NetworkMessage::Peers(peers) => {
                payload.push(MsgType::Peers as u8);
                write_u32(&mut payload, peers.len() as u32);
                for p in peers {
                    write_str(&mut payload, &p.host);
                    write_u16(&mut payload, p.port);
                    write_u64(&mut payload, p.last_seen);
                }
            }
            NetworkMessage::Ping(n) => {
                payload.push(MsgType::Ping as u8);
                write_u64(&mut payload, *n);
            }
            NetworkMessage::Pong(n) => {
                payload.push(MsgType::Pong as u8);
                write_u64(&mut payload, *n);
            }
        }

        let mut frame = Vec::with_capacity(8 + payload.len());
        frame.extend_from_slice(&magic);
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);
        frame
    }

    pub fn decode(data: &[u8], expected_magic: [u8; 4]) -> Option<Self> {
        if data.len() < 9 || data[..4] != expected_magic {
            return None;
        }
        let payload_len = u32::from_le_bytes(data[4..8].try_into().unwrap()) as usize;
        if data.len() < 8 + payload_len {
            return None;
        }
        let payload = &data[8..8 + payload_len];
        let type_byte = *payload.first()?;
        let body = &payload[1..];
        let mut off = 0usize;

        match MsgType::from_u8(type_byte)? {
            MsgType::Hello => {
                let protocol_version = read_u32(body, &mut off)?;
                let network_id = *body.get(off)?;
                off += 1;
                let chain_tip_height = read_u64(body, &mut off)?;
                let chain_tip_hash = read_hash(body, &mut off)?;
                let listen_port = read_u16(body, &mut off)?;
                let nonce = read_u64(body, &mut off)?;
                Some(NetworkMessage::Hello(Handshake {
                    protocol_version,
                    network_id,
                    chain_tip_height,
                    chain_tip_hash,
                    listen_port,
                    nonce,
                }))
            }
            MsgType::Inv => Some(NetworkMessage::Inv(read_inv(body, &mut off, 50_000)?)),
            MsgType::GetData => Some(NetworkMessage::GetData(read_inv(body, &mut off, 50_000)?)),
            MsgType::Tx => Transaction::from_bytes(body).ok().map(NetworkMessage::Tx),
            MsgType::Block => Block::from_bytes(body).ok().map(NetworkMessage::Block),
            MsgType::GetHeaders => {
                let from_hash = read_hash(body, &mut off)?;
                let stop_hash = read_hash(body, &mut off)?;
                let max = read_u32(body, &mut off)?;
                Some(NetworkMessage::GetHeaders { from_hash, stop_hash, max })
            }
            MsgType::Headers => {
                let count = read_u32(body, &mut off)? as usize;
                if count > 2000 {
                    return None;
                }
                let mut blocks = Vec::with_capacity(count);
                for _ in 0..count {
                    let len = read_u32(body, &mut off)? as usize;
                    let raw = body.get(off..off + len)?;
                    off += len;
                    blocks.push(Block::from_bytes(raw).ok()?);
                }
                Some(NetworkMessage::Headers(blocks))
            }
            MsgType::GetPeers => Some(NetworkMessage::GetPeers),
            MsgType::Peers => {
                let count = read_u32(body, &mut off)? as usize;
                if count > 1000 {
                    return None;
                }
                let mut peers = Vec::with_capacity(count);
                for _ in 0..count {
                    let host = read_str(body, &mut off)?;
                    let port = read_u16(body, &mut off)?;
                    let last_seen = read_u64(body, &mut off)?;
                    peers.push(PeerAddr { host, port, last_seen });
                }
                Some(NetworkMessage::Peers(peers))
            }
            MsgType::Ping => Some(NetworkMessage::Ping(read_u64(body, &mut off)?)),
            MsgType::Pong => Some(NetworkMessage::Pong(read_u64(body, &mut off)?)),
        }
    }
}

pub struct FramedStream {
    stream: TcpStream,
    buf: Vec<u8>,
    magic: [u8; 4],
}

impl FramedStream {
    pub fn new(stream: TcpStream, magic: [u8; 4]) -> Self {
        FramedStream { stream, buf: Vec::new(), magic }
    }

    pub async fn send(&mut self, msg: &NetworkMessage) -> io::Result<()> {
        self.stream.write_all(&msg.encode(self.magic)).await
    }

    pub async fn recv(&mut self) -> io::Result<Option<NetworkMessage>> {
        loop {
            if self.buf.len() >= 8 {
                let payload_len = u32::from_le_bytes(self.buf[4..8].try_into().unwrap()) as usize;
                if payload_len > MAX_FRAME {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "frame too large"));
                }
                let frame_len = 8 + payload_len;
                if self.buf.len() >= frame_len {
                    let frame = self.buf[..frame_len].to_vec();
                    self.buf.drain(..frame_len);
                    return Ok(NetworkMessage::decode(&frame, self.magic));
                }
            }

            let mut tmp = vec![0u8; 4096];
            let n = self.stream.read(&mut tmp).await?;
            if n == 0 {
                return Ok(None);
            }
            self.buf.extend_from_slice(&tmp[..n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(msg: NetworkMessage) -> NetworkMessage {
        let enc = msg.encode(MAGIC_MAINNET);
        NetworkMessage::decode(&enc, MAGIC_MAINNET).expect("decode failed")
    }

    #[test]
    fn test_hello_roundtrip() {
        let h = Handshake {
            protocol_version: 1,
            network_id: 0,
            chain_tip_height: 42,
            chain_tip_hash: [9u8; 32],
            listen_port: 9000,
            nonce: 0xdead_beef,
        };
        let m = roundtrip(NetworkMessage::Hello(h.clone()));
        match m {
            NetworkMessage::Hello(got) => assert_eq!(got, h),
            _ => panic!("wrong type"),
        }
    }

    #[test]
    fn test_ping_pong_roundtrip() {
        match roundtrip(NetworkMessage::Ping(777)) {
            NetworkMessage::Ping(n) => assert_eq!(n, 777),
            _ => panic!("wrong type"),
        }
    }

    #[test]
    fn test_inv_roundtrip() {
        let items = vec![
            InvItem { kind: InvKind::Tx, hash: [1u8; 32] },
            InvItem { kind: InvKind::Block, hash: [2u8; 32] },
        ];
        match roundtrip(NetworkMessage::Inv(items.clone())) {
            NetworkMessage::Inv(got) => assert_eq!(got, items),
            _ => panic!("wrong type"),
        }
    }

    #[test]
    fn test_get_headers_roundtrip() {
        let m = roundtrip(NetworkMessage::GetHeaders {
            from_hash: [3u8; 32],
            stop_hash: [4u8; 32],
            max: 500,
        });
        match m {
            NetworkMessage::GetHeaders { from_hash, stop_hash, max } => {
                assert_eq!(from_hash, [3u8; 32]);
                assert_eq!(stop_hash, [4u8; 32]);
                assert_eq!(max, 500);
            }
            _ => panic!("wrong type"),
        }
    }

    #[test]
    fn test_peers_roundtrip() {
        let peers = vec![PeerAddr { host: "1.2.3.4".into(), port: 9000, last_seen: 55 }];
        match roundtrip(NetworkMessage::Peers(peers.clone())) {
            NetworkMessage::Peers(got) => assert_eq!(got, peers),
            _ => panic!("wrong type"),
        }
    }

    #[test]
    fn test_bad_magic_rejected() {
        let enc = NetworkMessage::GetPeers.encode(MAGIC_MAINNET);
        assert!(NetworkMessage::decode(&enc, MAGIC_TESTNET).is_none());
    }

    #[test]
    fn test_wrong_network_magic_distinguishes() {
        let enc = NetworkMessage::GetPeers.encode(MAGIC_TESTNET);
        assert!(NetworkMessage::decode(&enc, MAGIC_TESTNET).is_some());
        assert!(NetworkMessage::decode(&enc, MAGIC_MAINNET).is_none());
    }
}
