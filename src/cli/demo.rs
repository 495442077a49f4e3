use crate::config::{Config, LedgerConfig};
use crate::consensus::{ConsensusResolver, ValidationMode};
use crate::core::{mine_shared, Block, Ledger, SharedLedger, SYSTEM_SENDER};
use crate::mining::Miner;
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

static PICKAXE: Emoji<'_, '_> = Emoji("⛏️  ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

const AUTHORITY_ID: &str = "Authority";
const TAMPERED_INDEX: usize = 2;

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Runs `work` behind a spinner. Mining has no progress to report, only time.
fn with_spinner<T>(message: String, work: impl FnOnce() -> T) -> T {
    let spinner = spinner(message);
    let out = work();
    spinner.finish_and_clear();
    out
}

fn banner(title: &str) {
    println!("\n{}", style(format!("=========== {} ===========", title)).bold().cyan());
}

fn section(title: &str) {
    println!("\n{}", style(format!("--- {} ---", title)).bold());
}

fn report_block(block: &Block) {
    println!(
        "{}Block {} mined! Hash: {}... (nonce {}, {} transactions)",
        PICKAXE,
        style(block.index).bold(),
        style(block.short_hash()).green(),
        block.nonce,
        block.transaction_count()
    );
}

fn report_validity(ledger: &Ledger) {
    match ledger.validate() {
        Ok(()) => println!(
            "{}{} The blockchain is secure ({} blocks).",
            CHECK,
            style("Validation Succeeded:").green().bold(),
            ledger.len()
        ),
        Err(failure) => println!(
            "{}{} {}",
            CROSS,
            style("Validation Failed:").red().bold(),
            failure
        ),
    }
}

/// Miner identity for a node id: `Node-A` mines as `Miner-A`.
fn miner_identity(node_id: &str) -> String {
    match node_id.strip_prefix("Node-") {
        Some(suffix) => format!("Miner-{}", suffix),
        None => format!("Miner-{}", node_id),
    }
}

pub struct AuthorityDemo {
    ledger: LedgerConfig,
    miner: Miner,
}

impl AuthorityDemo {
    pub fn new(config: &Config) -> Self {
        Self {
            ledger: config.ledger.clone(),
            miner: config.mining.miner(),
        }
    }

    fn build_ledger(&self) -> Ledger {
        Ledger::builder(AUTHORITY_ID)
            .config(&self.ledger)
            .mode(ValidationMode::Authority)
            .miner(self.miner)
            .build()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        banner("CENTRALIZED BLOCKCHAIN DEMO");

        let mut ledger = with_spinner("Mining genesis block".to_string(), || self.build_ledger());
        println!("Blockchain created. Difficulty: {}", style(ledger.difficulty()).bold());
        println!("Genesis Block Hash: {}", ledger.chain().genesis().hash);

        let payloads = [
            ("Sender A", "Receiver B", 10.0),
            ("Sender C", "Receiver D", 5.0),
            (SYSTEM_SENDER, "Miner", 0.5),
        ];
        for (sender, recipient, amount) in payloads {
            let index = ledger.chain().next_index();
            section(&format!("Start Mining Block {}", index));

            let transaction = ledger.stamp(sender, recipient, amount);
            let block = with_spinner(format!("Mining block {}", index), || {
                ledger.append_block(vec![transaction])
            })?;
            report_block(&block);
        }

        section("Testing Chain Integrity");
        report_validity(&ledger);

        section(&format!("TAMPERING WITH BLOCK {} DATA", TAMPERED_INDEX));
        let difficulty = ledger.difficulty();
        let block = ledger
            .block_mut(TAMPERED_INDEX)
            .ok_or_else(|| anyhow::anyhow!("chain has no block {}", TAMPERED_INDEX))?;
        if let Some(first) = block.transactions.first_mut() {
            first.sender = "SENDER HACKER".to_string();
            first.recipient = "TARGET".to_string();
            first.amount = 1000.0;
        }
        println!("Block {} data changed. Original Hash: {}", TAMPERED_INDEX, block.hash);
        println!("Block {} New Calculated Hash: {}", TAMPERED_INDEX, block.compute_hash());

        section("Re-Testing Chain Integrity After Tampering");
        report_validity(&ledger);

        section(&format!("Attacker Tries to Re-Mine Block {}", TAMPERED_INDEX));
        if let Some(block) = ledger.block_mut(TAMPERED_INDEX) {
            with_spinner(format!("Re-mining block {}", TAMPERED_INDEX), || block.mine(difficulty));
            report_block(block);
        }

        section(&format!("Re-Testing Chain Integrity After Re-Mining Block {}", TAMPERED_INDEX));
        report_validity(&ledger);

        Ok(())
    }
}

/// Transfers each node submits in the first round.
fn opening_transfers(position: usize) -> &'static [(&'static str, &'static str, f64)] {
    match position {
        0 => &[("Alice", "Bob", 10.5), ("Bob", "Charlie", 2.0)],
        _ => &[("Dave", "Eve", 50.0)],
    }
}

/// Replicated ledgers mining side by side.
///
/// The second configured node is the laggard: it mirrors the first node's
/// transfers without mining, syncs by consensus, then mines the longest chain
/// which every other node adopts.
pub struct NetworkDemo {
    config: Config,
}

impl NetworkDemo {
    const LAGGARD: usize = 1;

    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn build_node(&self, node_id: &str) -> SharedLedger {
        Ledger::builder(node_id)
            .config(&self.config.ledger)
            .mode(ValidationMode::Replicated)
            .miner(self.config.mining.miner())
            .build()
            .into_shared()
    }

    async fn mine_concurrently(nodes: &[SharedLedger]) -> anyhow::Result<Vec<Block>> {
        let mut handles = Vec::new();
        for node in nodes {
            let node = Arc::clone(node);
            let miner_id = miner_identity(node.read().node_id());
            handles.push(tokio::task::spawn_blocking(move || mine_shared(&node, &miner_id)));
        }

        let mut blocks = Vec::new();
        for handle in handles {
            blocks.push(handle.await??);
        }
        Ok(blocks)
    }

    fn print_resolution(node: &SharedLedger, replaced: bool) {
        let ledger = node.read();
        if replaced {
            println!(
                "{}[{}] *** CHAIN REPLACED (new length: {}) ***",
                LINK,
                style(ledger.node_id()).bold(),
                ledger.len()
            );
        } else {
            println!(
                "[{}] *** Current chain is the longest/authoritative (length: {}) ***",
                style(ledger.node_id()).bold(),
                ledger.len()
            );
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        self.config.validate()?;
        banner("DECENTRALIZED BLOCKCHAIN DEMO");

        let node_ids = &self.config.simulation.node_ids;
        let nodes: Vec<SharedLedger> = with_spinner("Mining genesis blocks".to_string(), || {
            node_ids.iter().map(|id| self.build_node(id)).collect()
        });
        let laggard = Arc::clone(&nodes[Self::LAGGARD]);
        let laggard_id = node_ids[Self::LAGGARD].clone();
        let miners: Vec<SharedLedger> = nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != Self::LAGGARD)
            .map(|(_, node)| Arc::clone(node))
            .collect();

        banner("ROUND 1: Nodes Mine Concurrently");
        for (position, node) in miners.iter().enumerate() {
            let mut ledger = node.write();
            for (sender, recipient, amount) in opening_transfers(position) {
                ledger.submit_transaction(*sender, *recipient, *amount);
            }
        }
        {
            let mut ledger = laggard.write();
            for (sender, recipient, amount) in opening_transfers(0) {
                ledger.submit_transaction(*sender, *recipient, *amount);
            }
        }

        let progress = spinner(format!("{} nodes mining", miners.len()));
        let blocks = Self::mine_concurrently(&miners).await;
        progress.finish_and_clear();
        let blocks = blocks?;
        for (node, block) in miners.iter().zip(&blocks) {
            print!("[{}] ", style(node.read().node_id()).bold());
            report_block(block);
        }

        banner(&format!("ROUND 2: Consensus Check ({} Syncs)", laggard_id));
        let replaced = ConsensusResolver::resolve_shared(&laggard, &nodes);
        Self::print_resolution(&laggard, replaced);

        banner(&format!("ROUND 3: {} Mines and Creates the Longest Chain", laggard_id));
        laggard.write().submit_transaction("Charlie", "Alice", 3.0);
        let progress = spinner(format!("{} mining", laggard_id));
        let mined = Self::mine_concurrently(std::slice::from_ref(&laggard)).await;
        progress.finish_and_clear();
        for block in mined? {
            print!("[{}] ", style(&laggard_id).bold());
            report_block(&block);
        }

        banner("ROUND 4: Consensus Check (Everyone Else Syncs)");
        for node in &miners {
            let replaced = ConsensusResolver::resolve_shared(node, &nodes);
            Self::print_resolution(node, replaced);
        }

        section("Final Status");
        for node in &nodes {
            let ledger = node.read();
            let validity = if ledger.is_valid() {
                style("valid").green()
            } else {
                style("INVALID").red()
            };
            println!(
                "{} length: {} ({}) tip: {}...",
                style(ledger.node_id()).bold(),
                ledger.len(),
                validity,
                ledger.latest_block().short_hash()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miner_identity() {
        assert_eq!(miner_identity("Node-A"), "Miner-A");
        assert_eq!(miner_identity("alpha"), "Miner-alpha");
    }

    #[test]
    fn test_opening_transfers() {
        assert_eq!(opening_transfers(0).len(), 2);
        assert_eq!(opening_transfers(1), opening_transfers(5));
    }

    #[test]
    fn test_authority_demo_runs() {
        let mut config = Config::default();
        config.ledger.difficulty = 1;
        AuthorityDemo::new(&config).run().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_network_demo_runs() {
        let mut config = Config::default();
        config.ledger.difficulty = 1;
        NetworkDemo::new(&config).run().await.unwrap();
    }

    #[tokio::test]
    async fn test_network_demo_needs_two_nodes() {
        let mut config = Config::default();
        config.ledger.difficulty = 1;
        config.simulation.node_ids.truncate(1);

        let err = NetworkDemo::new(&config).run().await.unwrap_err();
        assert!(err.to_string().contains("at least two nodes"));
    }
}
