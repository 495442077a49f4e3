use crate::core::Chain;
use crate::mining::DifficultyTarget;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which integrity rules a ledger enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Single writer: content hashes and linkage only.
    Authority,
    /// Independent replicas: linkage plus proof-of-work on every block.
    #[default]
    Replicated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("block {index} has an invalid internal hash (stored {stored}, computed {computed})")]
    HashMismatch {
        index: u64,
        stored: String,
        computed: String,
    },

    #[error("block {index} previous hash is corrupted (expected {expected}, found {found})")]
    BrokenLink {
        index: u64,
        expected: String,
        found: String,
    },

    #[error("block {index} did not meet the proof-of-work requirement of {difficulty} leading zeros")]
    InsufficientWork { index: u64, difficulty: u32 },
}

impl ValidationFailure {
    pub fn index(&self) -> u64 {
        match self {
            Self::HashMismatch { index, .. }
            | Self::BrokenLink { index, .. }
            | Self::InsufficientWork { index, .. } => *index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainValidator {
    difficulty: u32,
    mode: ValidationMode,
}

impl ChainValidator {
    pub fn new(difficulty: u32, mode: ValidationMode) -> Self {
        Self { difficulty, mode }
    }

    /// Scans forward from index 1 and stops at the first failing block.
    /// Genesis is exempt from every check.
    pub fn validate(&self, chain: &Chain) -> Result<(), ValidationFailure> {
        let target = DifficultyTarget::new(self.difficulty);

        for pair in chain.blocks().windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);

            let computed = current.compute_hash();
            if current.hash != computed {
                return Err(ValidationFailure::HashMismatch {
                    index: current.index,
                    stored: current.hash.clone(),
                    computed,
                });
            }

            if current.previous_hash != previous.hash {
                return Err(ValidationFailure::BrokenLink {
                    index: current.index,
                    expected: previous.hash.clone(),
                    found: current.previous_hash.clone(),
                });
            }

            if self.mode == ValidationMode::Replicated && !target.is_met_by(&current.hash) {
                return Err(ValidationFailure::InsufficientWork {
                    index: current.index,
                    difficulty: self.difficulty,
                });
            }
        }

        Ok(())
    }

    pub fn is_valid(&self, chain: &Chain) -> bool {
        self.validate(chain).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::Ledger;
    use crate::events::NullSink;
    use std::sync::Arc;

    fn ledger(difficulty: u32, mode: ValidationMode) -> Ledger {
        Ledger::builder("Node-V")
            .difficulty(difficulty)
            .mode(mode)
            .clock(Arc::new(FixedClock::from_unix(1_700_000_000)))
            .events(Arc::new(NullSink))
            .build()
    }

    #[test]
    fn test_fresh_chain_is_valid() {
        let mut ledger = ledger(1, ValidationMode::Replicated);
        ledger.mine("Miner-V").unwrap();
        ledger.mine("Miner-V").unwrap();

        let validator = ChainValidator::new(1, ValidationMode::Replicated);
        assert_eq!(validator.validate(ledger.chain()), Ok(()));
    }

    #[test]
    fn test_detects_content_tamper() {
        let mut ledger = ledger(1, ValidationMode::Replicated);
        ledger.submit_transaction("Alice", "Bob", 10.5);
        ledger.mine("Miner-V").unwrap();
        ledger.block_mut(1).unwrap().transactions[0].amount = 1000.0;

        let failure = ChainValidator::new(1, ValidationMode::Replicated)
            .validate(ledger.chain())
            .unwrap_err();
        assert!(matches!(failure, ValidationFailure::HashMismatch { index: 1, .. }));
        assert_eq!(failure.index(), 1);
    }

    #[test]
    fn test_detects_broken_link_after_remine() {
        let mut ledger = ledger(1, ValidationMode::Authority);
        ledger.mine("Miner-V").unwrap();
        ledger.mine("Miner-V").unwrap();

        let block = ledger.block_mut(1).unwrap();
        block.transactions[0].recipient = "Mallory".to_string();
        block.mine(1);

        let failure = ChainValidator::new(1, ValidationMode::Authority)
            .validate(ledger.chain())
            .unwrap_err();
        assert!(matches!(failure, ValidationFailure::BrokenLink { index: 2, .. }));
    }

    #[test]
    fn test_work_only_checked_in_replicated_mode() {
        let mut ledger = ledger(0, ValidationMode::Authority);
        ledger.mine("Miner-V").unwrap();

        // A zero-difficulty block almost never carries four leading zeros.
        let tip = ledger.chain().tip().clone();
        if tip.meets_target(4) {
            return;
        }

        assert!(ChainValidator::new(4, ValidationMode::Authority).is_valid(ledger.chain()));
        assert_eq!(
            ChainValidator::new(4, ValidationMode::Replicated).validate(ledger.chain()),
            Err(ValidationFailure::InsufficientWork {
                index: 1,
                difficulty: 4
            })
        );
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let ledger = ledger(2, ValidationMode::Replicated);
        assert!(ChainValidator::new(8, ValidationMode::Replicated).is_valid(ledger.chain()));
    }
}
