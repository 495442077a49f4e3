use crate::cli::demo::{AuthorityDemo, NetworkDemo};
use crate::cli::inspect::inspect_chain;
use crate::config::Config;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "powledgerd")]
#[command(about = "Proof-of-work ledger demos: single authority and replicated longest chain")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Leading zero hex digits required per block")]
    pub difficulty: Option<u32>,

    #[arg(long, global = true, help = "Nonce search threads per block (0 = all CPUs)")]
    pub threads: Option<usize>,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick a demo from an interactive menu
    Menu,

    /// Single-authority ledger: mine, validate, tamper, re-validate
    Authority,

    /// Replicated ledgers mining concurrently and converging by consensus
    Network,

    /// Run the authority demo followed by the network demo
    Both,

    /// Mine a fresh ledger and print its blocks
    Inspect {
        #[arg(long, default_value_t = 3, help = "Blocks to mine after genesis")]
        blocks: usize,

        #[arg(long, default_value = "Miner-1", help = "Reward recipient")]
        miner: String,

        #[arg(long, help = "Print the chain as JSON")]
        json: bool,
    },

    /// Write the effective configuration to disk
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Authority,
    Network,
    Both,
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 4] = [
        MenuChoice::Authority,
        MenuChoice::Network,
        MenuChoice::Both,
        MenuChoice::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::Authority => "1 - Centralized (single authority) demo",
            MenuChoice::Network => "2 - Decentralized (replicated) demo",
            MenuChoice::Both => "3 - Run both demos",
            MenuChoice::Exit => "0 - Exit",
        }
    }
}

pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _ = if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).try_init()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
    };

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(difficulty) = cli.difficulty {
        config.ledger.difficulty = difficulty;
    }
    if let Some(threads) = cli.threads {
        config.mining.threads = threads;
    }
    config.validate()?;

    log::debug!("Effective configuration: {:?}", config);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => run_menu(&config).await,
        Commands::Authority => AuthorityDemo::new(&config).run(),
        Commands::Network => NetworkDemo::new(&config).run().await,
        Commands::Both => run_both(&config).await,
        Commands::Inspect { blocks, miner, json } => inspect_chain(&config, blocks, &miner, json),
        Commands::Init { force } => init_config(&config, cli.config, force),
    }
}

async fn run_menu(config: &Config) -> anyhow::Result<()> {
    let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a blockchain demo to run")
        .items(&labels)
        .default(0)
        .interact()?;

    match MenuChoice::ALL[selection] {
        MenuChoice::Authority => AuthorityDemo::new(config).run(),
        MenuChoice::Network => NetworkDemo::new(config).run().await,
        MenuChoice::Both => run_both(config).await,
        MenuChoice::Exit => {
            println!("Exiting application.");
            Ok(())
        }
    }
}

async fn run_both(config: &Config) -> anyhow::Result<()> {
    AuthorityDemo::new(config).run()?;
    println!();
    NetworkDemo::new(config).run().await
}

fn init_config(config: &Config, path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(Config::default_path);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    config.save(&path)?;
    println!("{} Configuration written to {}", style("✔").green(), style(path.display()).bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from(["powledgerd", "inspect", "--blocks", "2", "--difficulty", "1"]).unwrap();

        assert_eq!(cli.difficulty, Some(1));
        assert!(matches!(cli.command, Some(Commands::Inspect { blocks: 2, .. })));
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["powledgerd"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_menu_labels_follow_numbering() {
        let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
        assert!(labels[0].starts_with('1'));
        assert!(labels[3].starts_with('0'));
    }
}
