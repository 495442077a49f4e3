//! Progress events emitted by ledgers and the consensus resolver.
//!
//! Core operations never print. Every narration point goes through an
//! [`EventSink`] handed to the ledger at construction; the default
//! [`LogSink`] forwards to the `log` facade.

use crate::consensus::validation::ValidationFailure;
use crate::core::{Block, Transaction};
use crate::mining::MiningStats;
use std::fmt;

#[derive(Debug, Clone, Copy)]
pub enum LedgerEvent<'a> {
    GenesisCreated {
        node_id: &'a str,
        block: &'a Block,
    },
    TransactionSubmitted {
        node_id: &'a str,
        transaction: &'a Transaction,
    },
    MiningStarted {
        node_id: &'a str,
        index: u64,
        transactions: usize,
    },
    BlockMined {
        node_id: &'a str,
        block: &'a Block,
        stats: &'a MiningStats,
    },
    ValidationPassed {
        node_id: &'a str,
        length: usize,
    },
    ValidationFailed {
        node_id: &'a str,
        failure: &'a ValidationFailure,
    },
    ConsensusStarted {
        node_id: &'a str,
        length: usize,
    },
    PeerChecked {
        node_id: &'a str,
        peer_id: &'a str,
        length: usize,
    },
    ChainReplaced {
        node_id: &'a str,
        peer_id: &'a str,
        length: usize,
    },
    ChainKept {
        node_id: &'a str,
        length: usize,
    },
}

pub trait EventSink: Send + Sync + fmt::Debug {
    fn emit(&self, event: &LedgerEvent<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &LedgerEvent<'_>) {
        match event {
            LedgerEvent::GenesisCreated { node_id, block } => {
                log::info!("[{}] Genesis block mined: {}", node_id, block.hash);
            }
            LedgerEvent::TransactionSubmitted { node_id, transaction } => {
                log::info!("[{}] New transaction added: {}", node_id, transaction);
            }
            LedgerEvent::MiningStarted { node_id, index, transactions } => {
                log::info!(
                    "[{}] Starting mining for block {} ({} transactions)",
                    node_id,
                    index,
                    transactions
                );
            }
            LedgerEvent::BlockMined { node_id, block, stats } => {
                log::info!(
                    "[{}] Block {} mined! Hash: {}... ({} attempts, {:.2} H/s)",
                    node_id,
                    block.index,
                    block.short_hash(),
                    stats.attempts,
                    stats.hashrate()
                );
            }
            LedgerEvent::ValidationPassed { node_id, length } => {
                log::info!("[{}] Validation succeeded: {} blocks are secure", node_id, length);
            }
            LedgerEvent::ValidationFailed { node_id, failure } => {
                log::warn!("[{}] Validation failed: {}", node_id, failure);
            }
            LedgerEvent::ConsensusStarted { node_id, length } => {
                log::info!("[{}] Starting consensus check. Current length: {}", node_id, length);
            }
            LedgerEvent::PeerChecked { node_id, peer_id, length } => {
                log::debug!("[{}] Checking peer {} (length: {})", node_id, peer_id, length);
            }
            LedgerEvent::ChainReplaced { node_id, peer_id, length } => {
                log::info!(
                    "[{}] Chain replaced by {}'s chain (new length: {})",
                    node_id,
                    peer_id,
                    length
                );
            }
            LedgerEvent::ChainKept { node_id, length } => {
                log::info!(
                    "[{}] Current chain is authoritative (length: {})",
                    node_id,
                    length
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &LedgerEvent<'_>) {}
}
