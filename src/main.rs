use powledger::cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is initialised inside run_cli once the --debug flag is known.
    run_cli().await
}
