//! powledger - an append-only ledger secured by hash linking and proof-of-work
//!
//! Two configurations share one core:
//! - a single-authority ledger (one writer, content and linkage checks)
//! - replicated ledgers that mine independently and converge on the
//!   longest valid chain
//!
//! Everything is in memory; peers are other `Ledger` values in the same process.

pub mod core;
pub mod crypto;
pub mod mining;
pub mod consensus;
pub mod events;
pub mod cli;
pub mod error;
pub mod config;

pub use error::{LedgerError, Result};
