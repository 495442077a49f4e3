use crate::config::LedgerConfig;
use crate::consensus::validation::{ChainValidator, ValidationFailure, ValidationMode};
use crate::core::clock::{Clock, SystemClock};
use crate::core::{Block, Chain, Transaction};
use crate::events::{EventSink, LedgerEvent, LogSink};
use crate::mining::Miner;
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_DIFFICULTY: u32 = 4;
pub const DEFAULT_MINING_REWARD: f64 = 50.0;

/// A ledger handed to several actors. Mining takes the write lock for the
/// whole pool-drain-and-append, consensus takes read locks on peers.
pub type SharedLedger = Arc<RwLock<Ledger>>;

/// One participant's view: its chain, pending pool and mining parameters.
#[derive(Debug, Clone)]
pub struct Ledger {
    node_id: String,
    chain: Chain,
    pending: Vec<Transaction>,
    difficulty: u32,
    mining_reward: f64,
    mode: ValidationMode,
    miner: Miner,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

#[derive(Debug, Clone)]
pub struct LedgerBuilder {
    node_id: String,
    difficulty: u32,
    mining_reward: f64,
    mode: ValidationMode,
    miner: Miner,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl LedgerBuilder {
    fn new(node_id: String) -> Self {
        Self {
            node_id,
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            mode: ValidationMode::Replicated,
            miner: Miner::single_threaded(),
            clock: Arc::new(SystemClock),
            events: Arc::new(LogSink),
        }
    }

    pub fn difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn mining_reward(mut self, reward: f64) -> Self {
        self.mining_reward = reward;
        self
    }

    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn miner(mut self, miner: Miner) -> Self {
        self.miner = miner;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(self, config: &LedgerConfig) -> Self {
        self.difficulty(config.difficulty)
            .mining_reward(config.mining_reward)
            .mode(config.mode)
    }

    /// Mines the genesis block and returns the ledger.
    pub fn build(self) -> Ledger {
        let now = self.clock.now();
        let allocation = Transaction::new_reward(self.node_id.clone(), 0.0, now);
        let mut genesis = Block::genesis(vec![allocation], now);
        self.miner.mine(&mut genesis, self.difficulty);

        self.events.emit(&LedgerEvent::GenesisCreated {
            node_id: &self.node_id,
            block: &genesis,
        });

        Ledger {
            node_id: self.node_id,
            chain: Chain::with_genesis(genesis),
            pending: Vec::new(),
            difficulty: self.difficulty,
            mining_reward: self.mining_reward,
            mode: self.mode,
            miner: self.miner,
            clock: self.clock,
            events: self.events,
        }
    }
}

impl Ledger {
    /// Replicated ledger with default difficulty and reward.
    pub fn new(node_id: impl Into<String>) -> Self {
        Self::builder(node_id).build()
    }

    pub fn builder(node_id: impl Into<String>) -> LedgerBuilder {
        LedgerBuilder::new(node_id.into())
    }

    pub fn into_shared(self) -> SharedLedger {
        Arc::new(RwLock::new(self))
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn latest_block(&self) -> &Block {
        self.chain.tip()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Later validation measures every block against the new value,
    /// including blocks mined under the old one.
    pub fn set_difficulty(&mut self, difficulty: u32) {
        self.difficulty = difficulty;
    }

    pub fn mining_reward(&self) -> f64 {
        self.mining_reward
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn miner(&self) -> Miner {
        self.miner
    }

    /// Builds a transaction timestamped by this ledger's clock without pooling it.
    pub fn stamp(
        &self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Transaction {
        Transaction::new(sender, recipient, amount, self.clock.now())
    }

    pub fn submit_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: f64,
    ) -> Transaction {
        let transaction = self.stamp(sender, recipient, amount);
        self.pending.push(transaction.clone());

        self.events.emit(&LedgerEvent::TransactionSubmitted {
            node_id: &self.node_id,
            transaction: &transaction,
        });

        transaction
    }

    /// Adds the reward, drains the pool into a new block on the tip, mines it
    /// and appends it. Every block mined here holds at least the reward.
    pub fn mine(&mut self, miner_identity: &str) -> Result<Block> {
        let now = self.clock.now();
        self.pending
            .push(Transaction::new_reward(miner_identity, self.mining_reward, now));

        let transactions = std::mem::take(&mut self.pending);
        match self.seal(transactions, now) {
            Ok(block) => Ok(block),
            Err((mut transactions, err)) => {
                transactions.pop();
                self.pending = transactions;
                Err(err)
            }
        }
    }

    /// Single-authority write: mines `transactions` into a block on the tip
    /// without a reward and without touching the pending pool.
    pub fn append_block(&mut self, transactions: Vec<Transaction>) -> Result<Block> {
        let now = self.clock.now();
        self.seal(transactions, now).map_err(|(_, err)| err)
    }

    fn seal(
        &mut self,
        transactions: Vec<Transaction>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> std::result::Result<Block, (Vec<Transaction>, crate::LedgerError)> {
        let mut block = Block::new(
            self.chain.next_index(),
            self.chain.tip().hash.clone(),
            transactions,
            now,
        );

        self.events.emit(&LedgerEvent::MiningStarted {
            node_id: &self.node_id,
            index: block.index,
            transactions: block.transaction_count(),
        });

        let stats = self.miner.mine(&mut block, self.difficulty);

        self.events.emit(&LedgerEvent::BlockMined {
            node_id: &self.node_id,
            block: &block,
            stats: &stats,
        });

        match self.chain.append(block.clone()) {
            Ok(_) => Ok(block),
            Err(err) => Err((block.transactions, err)),
        }
    }

    pub fn validator(&self) -> ChainValidator {
        ChainValidator::new(self.difficulty, self.mode)
    }

    /// Checks the whole chain against the current difficulty. Never mutates.
    pub fn validate(&self) -> std::result::Result<(), ValidationFailure> {
        let outcome = self.validator().validate(&self.chain);

        match &outcome {
            Ok(()) => self.events.emit(&LedgerEvent::ValidationPassed {
                node_id: &self.node_id,
                length: self.chain.len(),
            }),
            Err(failure) => self.events.emit(&LedgerEvent::ValidationFailed {
                node_id: &self.node_id,
                failure,
            }),
        }

        outcome
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Mutable access to a stored block for audit drills. Any change is
    /// reported by [`Ledger::validate`].
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.chain.block_mut(index)
    }

    pub(crate) fn events(&self) -> &Arc<dyn EventSink> {
        &self.events
    }

    pub(crate) fn replace_chain(&mut self, chain: Chain) {
        self.chain = chain;
    }
}

/// Mines on a shared ledger, holding the write lock for the whole operation.
pub fn mine_shared(ledger: &SharedLedger, miner_identity: &str) -> Result<Block> {
    ledger.write().mine(miner_identity)
}
