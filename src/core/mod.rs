//! Core ledger components

pub mod block;
pub mod chain;
pub mod clock;
pub mod ledger;
pub mod transaction;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use chain::Chain;
pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::{mine_shared, Ledger, LedgerBuilder, SharedLedger};
pub use transaction::{Transaction, SYSTEM_SENDER};
