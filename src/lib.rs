//! GlobalCoyn: an account-model, proof-of-work cryptocurrency node.
//!
//! Module map: [`primitives`] is the pure data model (transactions, blocks);
//! [`crypto`] provides ECDSA keys, addresses, and mnemonics; [`consensus`]
//! holds history-independent rules (difficulty, reward schedule, genesis);
//! [`chain`] is the sole mutator of chain state; [`mempool`] holds
//! unconfirmed transactions; [`miner`] builds and solves block templates;
//! [`net`] is the gossip wire protocol and peer manager; [`persistence`]
//! covers the on-disk log, snapshot, wallet store, and peer book;
//! [`config`] loads node configuration; [`node`] is the orchestrator tying
//! all of the above into the facade the binaries drive.
pub mod chain;
pub mod config;
pub mod consensus;
pub mod crypto;
pub mod mempool;
pub mod miner;
pub mod net;
pub mod node;
pub mod persistence;
pub mod primitives;
