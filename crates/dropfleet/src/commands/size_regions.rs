use colored::Colorize;
use dropfleet_cloud::{ComputeProvider, find_size};

pub async fn handle<P: ComputeProvider + ?Sized>(provider: &P, slug: &str) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("サイズ '{}' の提供リージョンを検索中...", slug).blue()
    );

    let sizes = provider.list_sizes().await?;

    println!();
    match find_size(&sizes, slug) {
        Some(size) if !size.regions.is_empty() => {
            println!("{}", format!("サイズ '{}' の提供リージョン:", slug).bold());
            for region in &size.regions {
                println!("  • {}", region.cyan());
            }
        }
        Some(_) => {
            println!(
                "{}",
                format!("ℹ サイズ '{}' を提供しているリージョンはありません", slug).yellow()
            );
        }
        None => {
            // 見つからなくてもエラーにはしない
            println!(
                "{}",
                format!("ℹ サイズ '{}' は見つかりませんでした", slug).yellow()
            );
        }
    }

    Ok(())
}
