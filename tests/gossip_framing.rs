// Wire round-trips for the framed gossip protocol, but over a real loopback
// socket rather than `encode`/`decode` called directly in-process, so a
// partial-read/multi-message scenario actually exercises `FramedStream`'s
// internal buffering the way a slow peer on a real network would.

use globalcoyn::net::protocol::{
    FramedStream, Handshake, InvItem, InvKind, NetworkMessage, PeerAddr, MAGIC_MAINNET,
};
use globalcoyn::primitives::block::{Block, BlockHeader};
use globalcoyn::primitives::transaction::Transaction;
use tokio::net::{TcpListener, TcpStream};

async fn loopback_pair() -> (FramedStream, FramedStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client_res, server_res) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let client = client_res.unwrap();
    let (server, _) = server_res.unwrap();
    (
        FramedStream::new(client, MAGIC_MAINNET),
        FramedStream::new(server, MAGIC_MAINNET),
    )
}

#[tokio::test]
async fn hello_handshake_round_trips_over_a_real_socket() {
    let (mut a, mut b) = loopback_pair().await;
    let hello = Handshake {
        protocol_version: 1,
        network_id: 0,
        chain_tip_height: 7,
        chain_tip_hash: [5u8; 32],
        listen_port: 7654,
        nonce: 0x1234_5678,
    };
    a.send(&NetworkMessage::Hello(hello.clone())).await.unwrap();
    match b.recv().await.unwrap() {
        Some(NetworkMessage::Hello(got)) => assert_eq!(got, hello),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn multiple_frames_written_back_to_back_are_each_recovered_in_order() {
    let (mut a, mut b) = loopback_pair().await;
    // Write both frames before reading either, so `FramedStream::recv` has to
    // split them back apart out of one buffered read rather than getting a
    // read call per message.
    a.send(&NetworkMessage::Ping(1)).await.unwrap();
    a.send(&NetworkMessage::Ping(2)).await.unwrap();

    match b.recv().await.unwrap() {
        Some(NetworkMessage::Ping(n)) => assert_eq!(n, 1),
        other => panic!("unexpected message: {other:?}"),
    }
    match b.recv().await.unwrap() {
        Some(NetworkMessage::Ping(n)) => assert_eq!(n, 2),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn tx_round_trips_with_canonical_byte_encoding_preserved() {
    let (mut a, mut b) = loopback_pair().await;
    let tx = Transaction::new_coinbase("recipient-address".to_string(), 5_000_000_000, 1_800_000_100);
    a.send(&NetworkMessage::Tx(tx.clone())).await.unwrap();
    match b.recv().await.unwrap() {
        Some(NetworkMessage::Tx(got)) => assert_eq!(got.to_bytes(), tx.to_bytes()),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn block_round_trips_including_its_transactions() {
    let (mut a, mut b) = loopback_pair().await;
    let coinbase = Transaction::new_coinbase("miner-address".to_string(), 5_000_000_000, 1_800_000_200);
    let transactions = vec![coinbase];
    let header = BlockHeader {
        index: 1,
        previous_hash: [0u8; 32],
        timestamp: 1_800_000_200,
        merkle_root: Block::merkle_root(&transactions),
        nonce: 42,
        difficulty_bits: 0x1f00_ffff,
    };
    let block = Block { header, transactions };
    a.send(&NetworkMessage::Block(block.clone())).await.unwrap();
    match b.recv().await.unwrap() {
        Some(NetworkMessage::Block(got)) => assert_eq!(got.to_bytes(), block.to_bytes()),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn inv_and_get_data_round_trip() {
    let (mut a, mut b) = loopback_pair().await;
    let items = vec![
        InvItem { kind: InvKind::Tx, hash: [1u8; 32] },
        InvItem { kind: InvKind::Block, hash: [2u8; 32] },
    ];
    a.send(&NetworkMessage::Inv(items.clone())).await.unwrap();
    match b.recv().await.unwrap() {
        Some(NetworkMessage::Inv(got)) => assert_eq!(got, items),
        other => panic!("unexpected message: {other:?}"),
    }

    a.send(&NetworkMessage::GetData(items.clone())).await.unwrap();
    match b.recv().await.unwrap() {
        Some(NetworkMessage::GetData(got)) => assert_eq!(got, items),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn peers_round_trip_with_multiple_entries() {
    let (mut a, mut b) = loopback_pair().await;
    let peers = vec![
        PeerAddr { host: "198.51.100.1".into(), port: 9333, last_seen: 100 },
        PeerAddr { host: "198.51.100.2".into(), port: 9334, last_seen: 200 },
    ];
    a.send(&NetworkMessage::Peers(peers.clone())).await.unwrap();
    match b.recv().await.unwrap() {
        Some(NetworkMessage::Peers(got)) => assert_eq!(got, peers),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn peer_disconnect_is_observed_as_a_clean_eof() {
    let (a, mut b) = loopback_pair().await;
    drop(a);
    assert!(b.recv().await.unwrap().is_none());
}
