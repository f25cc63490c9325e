use crate::utils;
use colored::Colorize;
use dropfleet_cloud::ComputeProvider;

pub async fn handle<P: ComputeProvider + ?Sized>(provider: &P) -> anyhow::Result<()> {
    println!("{}", "サイズ一覧を取得中...".blue());

    let sizes = provider.list_sizes().await?;

    println!();
    if sizes.is_empty() {
        println!("{}", "利用可能なサイズはありません".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:<22} {:>9} {:>6} {:>8} {:>9} {:>10} {:>9}  {}",
            "SLUG", "MEMORY", "VCPUS", "DISK", "TRANSFER", "$/MONTH", "$/HOUR", "REGIONS"
        )
        .bold()
    );
    println!("{}", "─".repeat(110).dimmed());

    for size in &sizes {
        let slug = if size.available {
            size.slug.cyan()
        } else {
            size.slug.dimmed()
        };
        println!(
            "{:<22} {:>9} {:>6} {:>8} {:>9} {:>10} {:>9}  {}",
            slug,
            utils::format_memory(size.memory),
            size.vcpus,
            format!("{} GB", size.disk),
            utils::format_transfer(size.transfer),
            format!("{:.2}", size.price_monthly),
            format!("{:.5}", size.price_hourly),
            size.regions.join(",").dimmed()
        );
    }

    println!();
    println!("{} 件", sizes.len());
    Ok(())
}
