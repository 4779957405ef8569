use api_client::ApiClient;
use clap::Parser;
use engine::Ledger;

mod cli;
mod commands;
mod error;
mod render;
mod settings;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = settings::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "pocketbook={level},engine={level},api_client={level}",
            level = config.level
        ))
        .init();

    let api = ApiClient::builder()
        .base_url(&config.base_url)
        .token(&config.token)
        .build()?;
    tracing::debug!("using remote ledger at {}", api.base_url());

    let ctx = commands::Context::new(Ledger::new(api), config.timezone()?);
    let mut stdout = std::io::stdout().lock();
    commands::run(&ctx, cli.command, &mut stdout).await
}
