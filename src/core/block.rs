use crate::core::clock::canonical_timestamp;
use crate::core::transaction::{canonical_batch, Transaction};
use crate::crypto::hash::{Hash256, Hashable};
use crate::mining::difficulty::DifficultyTarget;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub previous_hash: String,
    /// Empty until the block has been mined.
    pub hash: String,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
}

impl Block {
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        transactions: Vec<Transaction>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            index,
            timestamp,
            previous_hash: previous_hash.into(),
            hash: String::new(),
            transactions,
            nonce: 0,
        }
    }

    pub fn genesis(transactions: Vec<Transaction>, timestamp: DateTime<Utc>) -> Self {
        Self::new(0, GENESIS_PREVIOUS_HASH, transactions, timestamp)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    pub fn is_mined(&self) -> bool {
        !self.hash.is_empty()
    }

    /// Bytes fed to SHA-256: index, timestamp, previous hash, transactions, nonce.
    pub fn preimage(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.index,
            canonical_timestamp(&self.timestamp),
            self.previous_hash,
            canonical_batch(&self.transactions),
            self.nonce
        )
    }

    pub fn compute_hash(&self) -> String {
        self.hash().to_string()
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    pub fn increment_nonce(&mut self) {
        self.nonce = self.nonce.wrapping_add(1);
    }

    /// Brute-force nonce search. Runs until the hash carries `difficulty`
    /// leading zeros; there is no upper bound.
    pub fn mine(&mut self, difficulty: u32) {
        let target = DifficultyTarget::new(difficulty);

        loop {
            self.increment_nonce();
            self.hash = self.compute_hash();
            if target.is_met_by(&self.hash) {
                break;
            }
        }
    }

    pub fn meets_target(&self, difficulty: u32) -> bool {
        DifficultyTarget::new(difficulty).is_met_by(&self.hash)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// First ten hex characters, for narration.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..10).unwrap_or(&self.hash)
    }
}

impl Hashable for Block {
    fn hash(&self) -> Hash256 {
        Hash256::hash(self.preimage().as_bytes())
    }
}
