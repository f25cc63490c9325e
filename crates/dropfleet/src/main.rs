mod cli;
mod commands;
mod utils;

use anyhow::Context;
use clap::Parser;
use cli::{Action, Cli};
use dropfleet_cloud::{FileLedger, KeyProvisioner, validate_request};
use dropfleet_cloud_digitalocean::DigitalOceanProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrへ。stdoutは結果表示専用
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let action = cli.action();
    tracing::debug!("action: {:?}", action);

    // 引数の検証はネットワークに触れる前に行う
    if let Action::CreateFleet { prefix, count } = &action {
        validate_request(prefix, *count)?;
    }

    let provider = DigitalOceanProvider::from_env()
        .context("DigitalOcean の認証情報を読み込めません（環境変数 DO_API_KEY を設定してください）")?;
    let ledger = FileLedger::new(&cli.ledger);

    match action {
        Action::Sizes => {
            commands::sizes::handle(&provider).await?;
        }
        Action::List => {
            commands::list::handle(&provider, &ledger).await?;
        }
        Action::DeleteAll => {
            commands::delete_all::handle(&provider, &ledger).await?;
        }
        Action::SizeRegions(slug) => {
            commands::size_regions::handle(&provider, &slug).await?;
        }
        Action::CreateFleet { prefix, count } => {
            let keys = KeyProvisioner::new(&cli.key_dir);
            commands::create_fleet::handle(
                &provider,
                &ledger,
                &keys,
                cli.policy(),
                &prefix,
                count,
                cli.wait,
            )
            .await?;
        }
    }

    Ok(())
}
