use crate::config::Config;
use crate::core::Ledger;
use crate::mining::DifficultyTarget;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub fn inspect_chain(config: &Config, blocks: usize, miner: &str, json: bool) -> anyhow::Result<()> {
    let mut ledger = Ledger::builder("Inspector")
        .config(&config.ledger)
        .miner(config.mining.miner())
        .build();

    let target = DifficultyTarget::new(ledger.difficulty());
    let progress = ProgressBar::new(blocks as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} blocks [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    for _ in 0..blocks {
        ledger.mine(miner)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(ledger.chain())?);
        return Ok(());
    }

    println!(
        "Difficulty {} (target prefix \"{}\", ~{:.0} hashes per block)",
        style(target.difficulty).bold(),
        target.prefix(),
        target.expected_attempts()
    );
    for block in ledger.chain() {
        println!(
            "#{:<4} nonce {:>10}  hash {}  prev {}  txs {}",
            block.index,
            block.nonce,
            style(block.short_hash()).green(),
            block.previous_hash.get(..10).unwrap_or(&block.previous_hash),
            block.transaction_count()
        );
    }

    match ledger.validate() {
        Ok(()) => println!("{}", style("Chain is valid").green().bold()),
        Err(failure) => println!("{} {}", style("Chain is invalid:").red().bold(), failure),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_runs() {
        let mut config = Config::default();
        config.ledger.difficulty = 1;

        inspect_chain(&config, 2, "Miner-1", false).unwrap();
        inspect_chain(&config, 1, "Miner-1", true).unwrap();
    }
}
