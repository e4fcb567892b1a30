use clap::Parser;

use herald_rs::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, loader) = load_and_merge_config(&cli)?;
    let log_handle = init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = herald_rs::clap_long_version(),
        environment = %loader.environment(),
        "Starting herald-rs"
    );

    execute_command(&cli, settings, loader, Some(log_handle)).await?;
    Ok(())
}
