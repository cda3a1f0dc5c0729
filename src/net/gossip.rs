// Connection loop (C9): the dial/accept/handshake/relay logic that actually
// moves bytes between peers, sitting on top of `protocol`'s framing and
// `peer`'s state machine. Grounded on the teacher's `net/node.rs::P2PNode`
// accept/dial tasks, generalized from the teacher's line-delimited JSON
// gossip into this crate's length-prefixed binary frames, and extended with
// the per-peer send queue, INV dedup window, and rate limiter the distilled
// spec calls for that the teacher's P2P loop didn't need at its scale.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use primitive_types::U256;
use rayon::prelude::*;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::net::peer::{DiscoverySource, PeerManager};
use crate::net::protocol::{FramedStream, Handshake, InvItem, InvKind, NetworkMessage};
use crate::node::{NodeError, Orchestrator};
use crate::primitives::block::{Block, BlockHeader};
use crate::primitives::target_from_bits;

const PROTOCOL_VERSION: u32 = 1;
/// Outgoing messages queued per connection before `try_send` starts dropping
/// relay traffic for that peer; handshake/reply traffic always goes through
/// the framed stream directly, so a slow peer only loses gossip, not replies.
const SEND_QUEUE_CAPACITY: usize = 64;
/// An already-relayed INV hash is not relayed again to a different peer
/// within this window.
const INV_DEDUP_WINDOW_SECS: u64 = 120;
const MAX_MESSAGES_PER_SECOND: u32 = 200;
const DIAL_TICK: Duration = Duration::from_secs(2);
const MAX_HEADERS_PER_REQUEST: u64 = 2000;
/// How often an established connection re-asks its peer for its address book.
/// The post-handshake request is one-shot and can land before the peer itself
/// has finished connecting onward, so a periodic re-ask is what actually makes
/// peer exchange converge instead of racing it once and giving up.
const PEX_INTERVAL: Duration = Duration::from_secs(10);

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
}

fn header_meets_target(header: &BlockHeader) -> bool {
    let hash = header.hash();
    U256::from_big_endian(&hash) <= target_from_bits(header.difficulty_bits)
}

/// One entry per live connection, keyed by `host:port`, used to relay
/// inventory to every other connected peer.
#[derive(Default)]
struct Connections {
    by_peer: HashMap<String, mpsc::Sender<NetworkMessage>>,
}

/// Recently relayed inventory hashes, so the same announcement doesn't keep
/// bouncing around the mesh inside the dedup window.
#[derive(Default)]
struct InvCache {
    seen: HashMap<[u8; 32], u64>,
}

impl InvCache {
    fn should_relay(&mut self, hash: [u8; 32], now: u64) -> bool {
        self.seen.retain(|_, t| now.saturating_sub(*t) < INV_DEDUP_WINDOW_SECS);
        let fresh = self.seen.insert(hash, now).is_none();
        fresh
    }
}

/// Ties the wire protocol and peer manager to the orchestrator: runs the
/// accept loop, the dial loop, and one handshake+message loop per connection.
pub struct Gossip {
    orchestrator: Arc<Orchestrator>,
    peers: Arc<PeerManager>,
    magic: [u8; 4],
    listen_port: u16,
    connections: Mutex<Connections>,
    inv_cache: Mutex<InvCache>,
}

impl Gossip {
    pub fn new(orchestrator: Arc<Orchestrator>, peers: Arc<PeerManager>, magic: [u8; 4], listen_port: u16) -> Arc<Self> {
        Arc::new(Gossip {
            orchestrator,
            peers,
            magic,
            listen_port,
            connections: Mutex::new(Connections::default()),
            inv_cache: Mutex::new(InvCache::default()),
        })
    }

    /// Runs the accept loop and the dial loop until either one exits (which,
    /// for the accept loop, means the listener itself failed).
    pub async fn run(self: Arc<Self>, bind_addr: SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(bind_addr).await?;
        info!("p2p listening on {bind_addr}");
        let accept = self.clone().accept_loop(listener);
        let dial = self.clone().dial_loop();
        tokio::select! {
            r = accept => r,
            _ = dial => Ok(()),
        }
    }

    async fn accept_loop(self: Arc<Self>, listener: TcpListener) -> std::io::Result<()> {
        loop {
            let (stream, addr) = listener.accept().await?;
            let this = self.clone();
            tokio::spawn(async move {
                let host = addr.ip().to_string();
                if let Err(e) = this.handle_connection(stream, host.clone(), addr.port(), false).await {
                    debug!("inbound connection from {host} ended: {e}");
                }
            });
        }
    }

    async fn dial_loop(self: Arc<Self>) -> std::io::Result<()> {
        loop {
            tokio::time::sleep(DIAL_TICK).await;
            self.peers.expire_bans(now_secs()).await;
            let Some(record) = self.peers.next_to_dial(now_secs()).await else { continue };
            let this = self.clone();
            let host = record.host.clone();
            let port = record.p2p_port;
            tokio::spawn(async move {
                match TcpStream::connect((host.as_str(), port)).await {
                    Ok(stream) => {
                        if let Err(e) = this.handle_connection(stream, host.clone(), port, true).await {
                            debug!("outbound connection to {host}:{port} ended: {e}");
                        }
                    }
                    Err(_) => this.peers.record_failure(&host, port, now_secs()).await,
                }
            });
        }
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        host: String,
        port: u16,
        outbound: bool,
    ) -> std::io::Result<()> {
        let mut framed = FramedStream::new(stream, self.magic);
        let info = self.orchestrator.get_chain_info().await;
        let hello = Handshake {
            protocol_version: PROTOCOL_VERSION,
            network_id: self.magic[3],
            chain_tip_height: info.height,
            chain_tip_hash: info.tip_hash,
            listen_port: self.listen_port,
            nonce: rand::random(),
        };
        framed.send(&NetworkMessage::Hello(hello)).await?;
        let Some(NetworkMessage::Hello(peer_hello)) = framed.recv().await? else {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "expected HELLO"));
        };
        let port = if outbound { port } else { peer_hello.listen_port };
        let key = format!("{host}:{port}");

        self.peers.learn(&host, port, DiscoverySource::Pex, now_secs()).await;
        self.peers.mark_connected(&host, port, now_secs()).await;
        info!("handshake complete with {key} (peer tip height {})", peer_hello.chain_tip_height);

        // Ask immediately for this peer's address book; this is how a node
        // with only one bootstrap entry discovers the rest of the mesh.
        framed.send(&NetworkMessage::GetPeers).await?;
        if peer_hello.chain_tip_height > info.height {
            framed
                .send(&NetworkMessage::GetHeaders {
                    from_hash: info.tip_hash,
                    stop_hash: peer_hello.chain_tip_hash,
                    max: MAX_HEADERS_PER_REQUEST as u32,
                })
                .await?;
        }

        let (tx, mut rx) = mpsc::channel::<NetworkMessage>(SEND_QUEUE_CAPACITY);
        self.connections.lock().await.by_peer.insert(key.clone(), tx);

        let result = self.clone().message_loop(&host, port, &mut framed, &mut rx).await;

        self.connections.lock().await.by_peer.remove(&key);
        self.peers.mark_disconnected(&host, port).await;
        result
    }

    async fn message_loop(
        self: Arc<Self>,
        host: &str,
        port: u16,
        framed: &mut FramedStream,
        rx: &mut mpsc::Receiver<NetworkMessage>,
    ) -> std::io::Result<()> {
        let mut window_start = now_secs();
        let mut message_count = 0u32;
        let mut pex_tick = tokio::time::interval(PEX_INTERVAL);
        pex_tick.tick().await; // first tick fires immediately; we already asked once

        loop {
            tokio::select! {
                _ = pex_tick.tick() => {
                    framed.send(&NetworkMessage::GetPeers).await?;
                }
                outgoing = rx.recv() => {
                    match outgoing {
                        Some(msg) => framed.send(&msg).await?,
                        None => return Ok(()),
                    }
                }
                incoming = framed.recv() => {
                    let Some(msg) = incoming? else { return Ok(()) };
                    if matches!(msg, NetworkMessage::Hello(_)) {
                        continue;
                    }

                    let now = now_secs();
                    if now != window_start {
                        window_start = now;
                        message_count = 0;
                    }
                    message_count += 1;
                    if message_count > MAX_MESSAGES_PER_SECOND {
                        warn!("{host}:{port} exceeded message rate limit, disconnecting");
                        self.peers.record_protocol_fault(host, port, now).await;
                        return Ok(());
                    }

                    self.clone().on_message(host, port, msg, framed).await?;
                }
            }
        }
    }

    async fn on_message(
        self: Arc<Self>,
        host: &str,
        port: u16,
        msg: NetworkMessage,
        framed: &mut FramedStream,
    ) -> std::io::Result<()> {
        match msg {
            NetworkMessage::Hello(_) => {}
            NetworkMessage::Ping(nonce) => framed.send(&NetworkMessage::Pong(nonce)).await?,
            NetworkMessage::Pong(_) => {}
            NetworkMessage::GetPeers => {
                framed.send(&NetworkMessage::Peers(self.peers.as_peer_addrs().await)).await?;
            }
            NetworkMessage::Peers(addrs) => {
                self.peers.merge_discovered(&addrs, now_secs()).await;
            }
            NetworkMessage::Inv(items) => {
                let mut wanted = Vec::new();
                for item in items {
                    let have = match item.kind {
                        InvKind::Tx => self.orchestrator.mempool_contains(&item.hash).await,
                        InvKind::Block => self.orchestrator.get_block(None, Some(item.hash)).await.is_ok(),
                    };
                    if !have {
                        wanted.push(item);
                    }
                }
                if !wanted.is_empty() {
                    framed.send(&NetworkMessage::GetData(wanted)).await?;
                }
            }
            NetworkMessage::GetData(items) => {
                for item in items {
                    match item.kind {
                        InvKind::Tx => {
                            if let Some(tx) = self.orchestrator.find_mempool_tx(&item.hash).await {
                                framed.send(&NetworkMessage::Tx(tx)).await?;
                            }
                        }
                        InvKind::Block => {
                            if let Ok(block) = self.orchestrator.get_block(None, Some(item.hash)).await {
                                framed.send(&NetworkMessage::Block(block)).await?;
                            }
                        }
                    }
                }
            }
            NetworkMessage::Tx(tx) => {
                let hash = tx.tx_hash();
                match self.orchestrator.submit_tx(tx).await {
                    Ok(_) => self.relay(InvItem { kind: InvKind::Tx, hash }, host, port).await,
                    Err(NodeError::Mempool(_)) => {} // rejected on economics, not a protocol fault
                    Err(_) => self.peers.record_protocol_fault(host, port, now_secs()).await,
                }
            }
            NetworkMessage::Block(block) => {
                let hash = block.hash();
                match self.orchestrator.submit_block(block).await {
                    Ok(()) => self.relay(InvItem { kind: InvKind::Block, hash }, host, port).await,
                    Err(NodeError::UnknownParent) => {
                        framed
                            .send(&NetworkMessage::GetHeaders { from_hash: [0u8; 32], stop_hash: hash, max: MAX_HEADERS_PER_REQUEST as u32 })
                            .await?;
                    }
                    Err(_) => self.peers.record_protocol_fault(host, port, now_secs()).await,
                }
            }
            NetworkMessage::GetHeaders { from_hash, stop_hash, max } => {
                let start = match self.orchestrator.get_block(None, Some(from_hash)).await {
                    Ok(known) => known.index() + 1,
                    Err(_) => 0,
                };
                let info = self.orchestrator.get_chain_info().await;
                let end = start.saturating_add((max as u64).min(MAX_HEADERS_PER_REQUEST)).saturating_sub(1).min(info.height);

                let mut headers = Vec::new();
                if start <= end {
                    for h in start..=end {
                        let Ok(block) = self.orchestrator.get_block(Some(h), None).await else { break };
                        let reached_stop = block.hash() == stop_hash;
                        headers.push(Block { header: block.header, transactions: Vec::new() });
                        if reached_stop {
                            break;
                        }
                    }
                }
                framed.send(&NetworkMessage::Headers(headers)).await?;
            }
            NetworkMessage::Headers(headers) => {
                // Cheap to verify in bulk before spending a round trip on
                // each full block: PoW is checkable from the header alone.
                let pow_ok: Vec<bool> = headers.par_iter().map(|h| header_meets_target(&h.header)).collect();
                let wanted: Vec<InvItem> = headers
                    .iter()
                    .zip(pow_ok)
                    .filter(|(_, ok)| *ok)
                    .map(|(h, _)| InvItem { kind: InvKind::Block, hash: h.hash() })
                    .collect();
                let dropped = headers.len() - wanted.len();
                if dropped > 0 {
                    warn!("{host}:{port} sent {dropped} header(s) failing proof-of-work");
                    self.peers.record_protocol_fault(host, port, now_secs()).await;
                }
                if !wanted.is_empty() {
                    framed.send(&NetworkMessage::GetData(wanted)).await?;
                }
            }
        }
        Ok(())
    }

    /// Announces `item` to every other live connection, unless it was
    /// already relayed within the dedup window.
    async fn relay(&self, item: InvItem, from_host: &str, from_port: u16) {
        if !self.inv_cache.lock().await.should_relay(item.hash, now_secs()) {
            return;
        }
        let from_key = format!("{from_host}:{from_port}");
        let conns = self.connections.lock().await;
        for (key, tx) in conns.by_peer.iter() {
            if *key == from_key {
                continue;
            }
            let _ = tx.try_send(NetworkMessage::Inv(vec![item.clone()]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inv_cache_dedups_within_window() {
        let mut cache = InvCache::default();
        assert!(cache.should_relay([1u8; 32], 1000));
        assert!(!cache.should_relay([1u8; 32], 1010));
    }

    #[test]
    fn test_inv_cache_forgets_after_window() {
        let mut cache = InvCache::default();
        assert!(cache.should_relay([1u8; 32], 0));
        assert!(cache.should_relay([1u8; 32], INV_DEDUP_WINDOW_SECS + 1));
    }
}
