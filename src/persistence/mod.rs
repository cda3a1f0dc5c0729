//! On-disk persistence: an append-only block log, periodic snapshots, the
//! encrypted wallet store, and the peer address book. Hand-rolled file I/O
//! per the binary formats named in the node's external interfaces, rather
//! than an embedded KV store — see DESIGN.md for the rationale.
pub mod log;
pub mod peer_store;
pub mod snapshot;
pub mod wallet_store;
