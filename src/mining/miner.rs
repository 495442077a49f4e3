use crate::core::Block;
use crate::mining::difficulty::DifficultyTarget;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningStats {
    pub attempts: u64,
    pub elapsed: Duration,
    pub threads: usize,
}

impl MiningStats {
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }
}

/// Runs the nonce search for a block, optionally spread across worker threads.
///
/// With one thread this is exactly [`Block::mine`]. With more, worker `t` of `n`
/// tries nonces `base + 1 + t`, `base + 1 + t + n`, ... and the first worker to
/// hit the target stops the rest. When several workers succeed in the same
/// window the lowest nonce is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miner {
    threads: usize,
}

impl Default for Miner {
    fn default() -> Self {
        Self::single_threaded()
    }
}

impl Miner {
    /// `0` means one worker per logical CPU.
    pub fn new(threads: usize) -> Self {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        Self {
            threads: threads.max(1),
        }
    }

    pub fn single_threaded() -> Self {
        Self { threads: 1 }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn mine(&self, block: &mut Block, difficulty: u32) -> MiningStats {
        let start_time = Instant::now();

        if self.threads == 1 {
            let first_nonce = block.nonce;
            block.mine(difficulty);

            return MiningStats {
                attempts: block.nonce.wrapping_sub(first_nonce),
                elapsed: start_time.elapsed(),
                threads: 1,
            };
        }

        let attempts = self.search_parallel(block, difficulty);
        log::debug!(
            "Block {} solved by {} workers after {} attempts",
            block.index,
            self.threads,
            attempts
        );

        MiningStats {
            attempts,
            elapsed: start_time.elapsed(),
            threads: self.threads,
        }
    }

    fn search_parallel(&self, block: &mut Block, difficulty: u32) -> u64 {
        let target = DifficultyTarget::new(difficulty);
        let base_nonce = block.nonce;
        let stride = self.threads as u64;

        let found = AtomicBool::new(false);
        let hash_counter = AtomicU64::new(0);
        let winner: Mutex<Option<(u64, String)>> = Mutex::new(None);

        std::thread::scope(|scope| {
            for worker in 0..self.threads {
                let mut candidate = block.clone();
                let found = &found;
                let hash_counter = &hash_counter;
                let winner = &winner;

                scope.spawn(move || {
                    let mut nonce = base_nonce.wrapping_add(1 + worker as u64);
                    let mut hashes = 0u64;

                    while !found.load(Ordering::Relaxed) {
                        candidate.set_nonce(nonce);
                        let hash = candidate.compute_hash();
                        hashes += 1;

                        if target.is_met_by(&hash) {
                            let mut best = winner.lock();
                            if best.as_ref().map_or(true, |(best_nonce, _)| nonce < *best_nonce) {
                                *best = Some((nonce, hash));
                            }
                            found.store(true, Ordering::Relaxed);
                            break;
                        }

                        nonce = nonce.wrapping_add(stride);
                    }

                    hash_counter.fetch_add(hashes, Ordering::Relaxed);
                });
            }
        });

        if let Some((nonce, hash)) = winner.into_inner() {
            block.set_nonce(nonce);
            block.hash = hash;
        }

        hash_counter.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{Clock, FixedClock};
    use crate::core::Transaction;

    fn candidate() -> Block {
        let at = FixedClock::from_unix(1_700_000_000).now();
        Block::new(3, "ef".repeat(32), vec![Transaction::new_reward("Miner-A", 50.0, at)], at)
    }

    #[test]
    fn test_miner_creation() {
        assert_eq!(Miner::new(4).threads(), 4);
        assert_eq!(Miner::single_threaded().threads(), 1);
        assert!(Miner::new(0).threads() >= 1);
    }

    #[test]
    fn test_single_thread_matches_block_mine() {
        let mut via_miner = candidate();
        let stats = Miner::single_threaded().mine(&mut via_miner, 2);

        let mut direct = candidate();
        direct.mine(2);

        assert_eq!(via_miner.nonce, direct.nonce);
        assert_eq!(via_miner.hash, direct.hash);
        assert_eq!(stats.attempts, direct.nonce);
        assert_eq!(stats.threads, 1);
    }

    #[test]
    fn test_parallel_search_meets_target() {
        let mut block = candidate();
        let stats = Miner::new(4).mine(&mut block, 3);

        assert!(block.meets_target(3));
        assert_eq!(block.hash, block.compute_hash());
        assert!(stats.attempts >= 1);
        assert_eq!(stats.threads, 4);
    }

    #[test]
    fn test_parallel_zero_difficulty() {
        let mut block = candidate();
        Miner::new(3).mine(&mut block, 0);

        assert!(block.is_mined());
        assert!(block.nonce >= 1 && block.nonce <= 3);
    }

    #[test]
    fn test_hashrate() {
        let stats = MiningStats {
            attempts: 500,
            elapsed: Duration::from_secs(2),
            threads: 1,
        };
        assert_eq!(stats.hashrate(), 250.0);

        let instant = MiningStats {
            attempts: 1,
            elapsed: Duration::ZERO,
            threads: 1,
        };
        assert_eq!(instant.hashrate(), 0.0);
    }
}
