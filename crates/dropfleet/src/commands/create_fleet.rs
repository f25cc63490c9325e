use crate::utils;
use colored::Colorize;
use dropfleet_cloud::{ComputeProvider, Fleet, FleetPolicy, KeyProvisioner, LedgerStore};
use std::time::Duration;

pub async fn handle<P, L>(
    provider: &P,
    ledger: &L,
    keys: &KeyProvisioner,
    policy: FleetPolicy,
    prefix: &str,
    count: usize,
    wait_secs: u64,
) -> anyhow::Result<()>
where
    P: ComputeProvider + ?Sized,
    L: LedgerStore + ?Sized,
{
    println!(
        "{}",
        format!("ドロップレットを {} 台作成中...", count).blue()
    );

    let fleet = Fleet::new(provider, ledger).with_policy(policy);
    let policy = fleet.policy();
    println!(
        "リージョン: {}  サイズ: {}  イメージ: {}",
        policy.region.cyan(),
        policy.size.cyan(),
        policy.image.cyan()
    );
    let report = fleet.create_fleet(keys, prefix, count).await?;

    println!();
    println!(
        "🔑 SSH鍵 '{}' を登録しました (id: {})",
        report.key.name.cyan(),
        report.key.key_id
    );
    println!("  • {}", report.key.private_key_path.display());
    println!("  • {}", report.key.public_key_path.display());
    println!("  {}", report.key.fingerprint.dimmed());

    println!();
    for machine in &report.created {
        println!("  {} {} ({})", "✓".green(), machine.name.cyan(), machine.id);
    }
    println!(
        "{}",
        format!(
            "✓ {} 台を作成しました（台帳: {} 台）",
            report.created.len(),
            report.ledger.len()
        )
        .green()
        .bold()
    );

    // 作成直後はアドレスが割り当てられていないことが多い
    if wait_secs > 0 {
        println!();
        println!(
            "{}",
            format!("ネットワークの準備を待機中 ({} 秒)...", wait_secs).dimmed()
        );
        tokio::time::sleep(Duration::from_secs(wait_secs)).await;
    }

    let refresh = fleet.refresh().await?;
    println!();
    utils::print_machines(&refresh.live);

    Ok(())
}
