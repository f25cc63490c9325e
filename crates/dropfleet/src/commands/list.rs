use crate::utils;
use colored::Colorize;
use dropfleet_cloud::{ComputeProvider, Fleet, LedgerStore};

pub async fn handle<P, L>(provider: &P, ledger: &L) -> anyhow::Result<()>
where
    P: ComputeProvider + ?Sized,
    L: LedgerStore + ?Sized,
{
    println!("{}", "ドロップレット一覧を取得中...".blue());

    let refresh = Fleet::new(provider, ledger).refresh().await?;

    println!();
    utils::print_machines(&refresh.live);

    println!();
    println!(
        "稼働中: {} 台 / 台帳: {} 台",
        refresh.live.len().to_string().cyan(),
        refresh.ledger.len().to_string().cyan()
    );

    Ok(())
}
