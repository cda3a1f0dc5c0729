// End-to-end scenarios: genesis mining, transfer+fee, double-spend
// rejection, fork resolution, restart durability, and peer bootstrap via
// peer-exchange. Each mirrors one of the node's documented end-to-end
// scenarios directly, driving either the in-process orchestrator facade or
// (for fork resolution) the chain manager it wraps.

use std::time::{SystemTime, UNIX_EPOCH};

use globalcoyn::chain::{Chain, ExtendOutcome};
use globalcoyn::config::Config;
use globalcoyn::consensus::genesis::create_genesis_block;
use globalcoyn::consensus::reward;
use globalcoyn::crypto::keys::{derive_address, derive_keypair};
use globalcoyn::mempool::Mempool;
use globalcoyn::net::gossip::Gossip;
use globalcoyn::node::Orchestrator;
use globalcoyn::primitives::block::{Block, BlockHeader};
use globalcoyn::primitives::transaction::{Transaction, UNITS_PER_COIN};
use globalcoyn::primitives::{merkle_root_of, new_tx, sign_tx, target_from_bits};

fn gcn(n: u64) -> u64 {
    n * UNITS_PER_COIN
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
}

fn tmp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "globalcoyn_e2e_{}_{}_{}",
        std::process::id(),
        name,
        now_secs()
    ))
}

fn test_config(dir: &std::path::Path) -> Config {
    let mut cfg = Config::default();
    cfg.data_dir = dir.to_path_buf();
    cfg
}

async fn mine_until(orch: &Orchestrator, miner: &str, target_height: u64, timeout_ticks: u32) -> u64 {
    orch.start_mining(miner.to_string()).await;
    let mut height = 0;
    for _ in 0..timeout_ticks {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        height = orch.get_chain_info().await.height;
        if height >= target_height {
            break;
        }
    }
    orch.stop_mining().await;
    height
}

#[tokio::test]
async fn scenario_1_genesis_and_first_block() {
    let dir = tmp_dir("genesis");
    let orch = Orchestrator::open(test_config(&dir)).await.unwrap();
    let genesis = orch.get_block(Some(0), None).await.unwrap();
    assert_eq!(genesis.header.previous_hash, [0u8; 32]);

    let (pk, _) = derive_keypair(&[42u8; 64]);
    let miner = derive_address(&pk);

    let height = mine_until(&orch, &miner, 1, 200).await;
    assert_eq!(height, 1, "expected block 1 to be mined");

    let block1 = orch.get_block(Some(1), None).await.unwrap();
    assert_eq!(block1.header.previous_hash, genesis.hash());
    assert_eq!(block1.transactions.len(), 1);
    assert!(block1.transactions[0].is_coinbase());
    assert_eq!(orch.wallet_balance(&miner).await, gcn(50));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn scenario_2_transfer_and_fee() {
    let dir = tmp_dir("transfer");
    let orch = Orchestrator::open(test_config(&dir)).await.unwrap();

    let (address_a, _mnemonic_a) = orch.wallet_create("pw-a").await.unwrap();
    let (address_b, _) = orch.wallet_create("pw-b").await.unwrap();
    let (address_m, _) = orch.wallet_create("pw-m").await.unwrap();

    assert_eq!(mine_until(&orch, &address_a, 1, 200).await, 1);
    assert_eq!(orch.wallet_balance(&address_a).await, gcn(50));

    let fee = UNITS_PER_COIN / 10; // 0.1 GCN
    orch.wallet_sign_and_submit(&address_a, "pw-a", address_b.clone(), gcn(10), fee, None).await.unwrap();

    assert_eq!(mine_until(&orch, &address_m, 2, 200).await, 2);

    assert_eq!(orch.wallet_balance(&address_a).await, gcn(50) - gcn(10) - fee);
    assert_eq!(orch.wallet_balance(&address_b).await, gcn(10));
    assert_eq!(orch.wallet_balance(&address_m).await, gcn(50) + fee);
    assert!(orch.mempool_snapshot().await.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn scenario_3_double_spend_rejected() {
    let dir = tmp_dir("doublespend");
    let orch = Orchestrator::open(test_config(&dir)).await.unwrap();

    let (address_a, _) = orch.wallet_create("pw-a").await.unwrap();
    let (address_b1, _) = orch.wallet_create("pw-b1").await.unwrap();
    let (address_b2, _) = orch.wallet_create("pw-b2").await.unwrap();

    assert_eq!(mine_until(&orch, &address_a, 1, 200).await, 1);
    assert_eq!(orch.wallet_balance(&address_a).await, gcn(50));

    orch.wallet_sign_and_submit(&address_a, "pw-a", address_b1.clone(), gcn(30), 0, None).await.unwrap();
    let second = orch.wallet_sign_and_submit(&address_a, "pw-a", address_b2.clone(), gcn(30), 0, None).await;
    assert!(second.is_err(), "second 30 GCN spend should be rejected: only 50 GCN confirmed");

    assert_eq!(mine_until(&orch, &address_a, 2, 200).await, 2);
    let block2 = orch.get_block(Some(2), None).await.unwrap();
    assert_eq!(block2.transactions.len(), 2, "coinbase + the one accepted transfer");
    assert_eq!(orch.wallet_balance(&address_b1).await, gcn(30));
    assert_eq!(orch.wallet_balance(&address_b2).await, 0);

    let _ = std::fs::remove_dir_all(&dir);
}

fn mine_trivial(mut block: Block) -> Block {
    let target = target_from_bits(block.header.difficulty_bits);
    loop {
        if primitive_types::U256::from_big_endian(&block.hash()) <= target {
            return block;
        }
        block.header.nonce += 1;
    }
}

fn mined_block(chain: &Chain, transactions: Vec<Transaction>, timestamp: u64) -> Block {
    let (height, tip_hash, _) = chain.tip();
    let bits = chain.expected_difficulty_bits_for_next();
    let header = BlockHeader {
        index: height + 1,
        previous_hash: tip_hash,
        timestamp,
        merkle_root: merkle_root_of(&transactions),
        nonce: 0,
        difficulty_bits: bits,
    };
    mine_trivial(Block { header, transactions })
}

#[tokio::test]
async fn scenario_4_fork_resolution_picks_heavier_branch_and_restores_mempool_tx() {
    let (pk, sk) = derive_keypair(&[7u8; 64]);
    let miner = derive_address(&pk);
    let (ypk, _) = derive_keypair(&[8u8; 64]);
    let address_y = derive_address(&ypk);

    let mut base_ts = 1_800_000_100u64;

    let mut n1 = Chain::new(create_genesis_block());
    let mut pool1 = Mempool::new(globalcoyn::mempool::DEFAULT_MAX_BYTES, globalcoyn::mempool::DEFAULT_TX_TTL_SECS);

    // n1 mines 3 blocks; block 2 carries a real transfer unique to this branch.
    for i in 0..3u64 {
        base_ts += 600;
        let mut txs = vec![Transaction::new_coinbase(miner.clone(), reward::reward(n1.height() + 1), base_ts)];
        if i == 1 {
            let tx = sign_tx(new_tx(miner.clone(), address_y.clone(), gcn(10), 0, base_ts, None), &sk);
            txs.push(tx);
        }
        let block = mined_block(&n1, txs, base_ts);
        assert!(matches!(n1.try_extend(block, &mut pool1, base_ts + 1), ExtendOutcome::Applied));
    }
    assert_eq!(n1.height(), 3);
    let unique_tx_hash = n1.history(&address_y)[0].tx_hash();

    // n2 mines 4 blocks in isolation from the same genesis, strictly heavier.
    let mut n2 = Chain::new(create_genesis_block());
    let mut pool2 = Mempool::new(globalcoyn::mempool::DEFAULT_MAX_BYTES, globalcoyn::mempool::DEFAULT_TX_TTL_SECS);
    let mut ts2 = 1_800_000_100u64;
    let mut n2_blocks = Vec::new();
    for _ in 0..4u64 {
        ts2 += 600;
        let txs = vec![Transaction::new_coinbase(miner.clone(), reward::reward(n2.height() + 1), ts2)];
        let block = mined_block(&n2, txs, ts2);
        assert!(matches!(n2.try_extend(block.clone(), &mut pool2, ts2 + 1), ExtendOutcome::Applied));
        n2_blocks.push(block);
    }

    // Reconnect: feed n2's branch into n1.
    let mut outcome = ExtendOutcome::Orphaned;
    for block in n2_blocks {
        outcome = n1.try_extend(block, &mut pool1, ts2 + 100);
    }
    assert!(matches!(outcome, ExtendOutcome::Applied), "heavier branch should win the reorg");
    assert_eq!(n1.height(), 4);
    assert_eq!(n1.balance(&miner), n2.balance(&miner));

    // The transfer unique to the discarded n1 branch is restored to the mempool.
    assert!(pool1.contains(&unique_tx_hash), "discarded-branch tx should return to the mempool");
}

#[tokio::test]
async fn scenario_5_restart_durability() {
    let dir = tmp_dir("restart");
    let (pk, _) = derive_keypair(&[3u8; 64]);
    let miner = derive_address(&pk);

    let (tip_before, balance_before) = {
        let orch = Orchestrator::open(test_config(&dir)).await.unwrap();
        let height = mine_until(&orch, &miner, 3, 400).await;
        assert_eq!(height, 3);
        let info = orch.get_chain_info().await;
        orch.shutdown().await;
        (info.tip_hash, orch.wallet_balance(&miner).await)
    };

    let reopened = Orchestrator::open(test_config(&dir)).await.unwrap();
    let info_after = reopened.get_chain_info().await;
    assert_eq!(info_after.tip_hash, tip_before);
    assert_eq!(reopened.wallet_balance(&miner).await, balance_before);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn scenario_6_peer_bootstrap_via_pex() {
    // node1 <- node2 (bootstrap) <- node3 (bootstrap); node3 should reach
    // node1 within the window via peer-exchange, and a block node1 mines
    // should reach node3.
    let base_port = 19500u16 + (std::process::id() % 500) as u16 * 3;
    let (p1, p2, p3) = (base_port, base_port + 1, base_port + 2);

    let dir1 = tmp_dir("pex1");
    let dir2 = tmp_dir("pex2");
    let dir3 = tmp_dir("pex3");

    let mut cfg1 = test_config(&dir1);
    cfg1.p2p_port = p1;
    let mut cfg2 = test_config(&dir2);
    cfg2.p2p_port = p2;
    cfg2.bootstrap_peers = vec![format!("127.0.0.1:{p1}")];
    let mut cfg3 = test_config(&dir3);
    cfg3.p2p_port = p3;
    cfg3.bootstrap_peers = vec![format!("127.0.0.1:{p2}")];

    let orch1 = std::sync::Arc::new(Orchestrator::open(cfg1).await.unwrap());
    let orch2 = std::sync::Arc::new(Orchestrator::open(cfg2).await.unwrap());
    let orch3 = std::sync::Arc::new(Orchestrator::open(cfg3).await.unwrap());

    let magic = globalcoyn::config::Network::Mainnet.magic();
    let g1 = Gossip::new(orch1.clone(), orch1.peer_manager(), magic, p1);
    let g2 = Gossip::new(orch2.clone(), orch2.peer_manager(), magic, p2);
    let g3 = Gossip::new(orch3.clone(), orch3.peer_manager(), magic, p3);

    let a1: std::net::SocketAddr = format!("127.0.0.1:{p1}").parse().unwrap();
    let a2: std::net::SocketAddr = format!("127.0.0.1:{p2}").parse().unwrap();
    let a3: std::net::SocketAddr = format!("127.0.0.1:{p3}").parse().unwrap();
    tokio::spawn(async move { let _ = g1.run(a1).await; });
    tokio::spawn(async move { let _ = g2.run(a2).await; });
    tokio::spawn(async move { let _ = g3.run(a3).await; });

    let (pk, _) = derive_keypair(&[55u8; 64]);
    let miner = derive_address(&pk);

    let mut connected = false;
    for _ in 0..300 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if orch3.network_status().await.outbound_peers >= 1 {
            connected = true;
            break;
        }
    }
    assert!(connected, "node3 should dial node1 via peer-exchange within the window");

    assert_eq!(mine_until(&orch1, &miner, 1, 200).await, 1);

    let mut propagated = false;
    for _ in 0..300 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if orch3.get_chain_info().await.height >= 1 {
            propagated = true;
            break;
        }
    }
    assert!(propagated, "node1's mined block should reach node3");

    let _ = std::fs::remove_dir_all(&dir1);
    let _ = std::fs::remove_dir_all(&dir2);
    let _ = std::fs::remove_dir_all(&dir3);
}
