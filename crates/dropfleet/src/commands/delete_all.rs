use colored::Colorize;
use dropfleet_cloud::{ComputeProvider, Fleet, LedgerStore};

pub async fn handle<P, L>(provider: &P, ledger: &L) -> anyhow::Result<()>
where
    P: ComputeProvider + ?Sized,
    L: LedgerStore + ?Sized,
{
    println!("{}", "全ドロップレットを削除中...".yellow());

    let teardown = Fleet::new(provider, ledger).delete_all().await?;
    let report = &teardown.report;

    println!();
    if report.is_empty() {
        println!("{}", "ℹ 削除対象のドロップレットはありません".dimmed());
        return Ok(());
    }

    for item in &report.succeeded {
        println!("  {} {} ({})", "✓".green(), item.name.cyan(), item.id);
    }
    for item in &report.failed {
        println!(
            "  {} {} ({}): {}",
            "✗".red(),
            item.name.cyan(),
            item.id,
            item.error.as_deref().unwrap_or("unknown error").red()
        );
    }

    println!();
    if report.is_success() {
        println!(
            "{}",
            format!("✓ {} 台を削除しました", report.succeeded.len())
                .green()
                .bold()
        );
    } else {
        // 個別の失敗はコマンド全体の失敗にしない
        tracing::warn!("{} droplet(s) could not be deleted", report.failed.len());
        println!(
            "{}",
            format!(
                "⚠ {} 台を削除、{} 台は削除できませんでした",
                report.succeeded.len(),
                report.failed.len()
            )
            .yellow()
            .bold()
        );
    }
    println!("台帳: 残り {} 台", teardown.ledger.len());

    Ok(())
}
