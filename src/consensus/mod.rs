//! Consensus rules that don't depend on a particular chain's history:
//! difficulty retargeting, the block reward schedule, and genesis.
pub mod difficulty;
pub mod genesis;
pub mod reward;
