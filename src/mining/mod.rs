//! Proof-of-work mining for powledger

pub mod miner;
pub mod difficulty;

pub use miner::{Miner, MiningStats};
pub use difficulty::DifficultyTarget;
