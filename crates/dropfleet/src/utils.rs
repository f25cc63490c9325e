use colored::Colorize;
use dropfleet_cloud::Machine;

/// ドロップレット一覧を表形式で表示
pub fn print_machines(machines: &[Machine]) {
    if machines.is_empty() {
        println!("{}", "ドロップレットはありません".dimmed());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<12} {:<20} {:<8} {:<16} {:<16}",
            "ID", "NAME", "REGION", "SIZE", "ADDRESS"
        )
        .bold()
    );
    println!("{}", "─".repeat(76).dimmed());

    for machine in machines {
        let address = format_addresses(machine);
        let address = if machine.addresses.is_empty() {
            address.dimmed()
        } else {
            address.green()
        };
        println!(
            "{:<12} {:<20} {:<8} {:<16} {:<16}",
            machine.id,
            machine.name.cyan(),
            machine.region.as_str(),
            display_or_dash(&machine.size),
            address
        );
    }
}

/// アドレス未割り当ての場合は "pending"
pub fn format_addresses(machine: &Machine) -> String {
    if machine.addresses.is_empty() {
        "pending".to_string()
    } else {
        machine
            .addresses
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// メモリ(MB)を読みやすい単位に変換
pub fn format_memory(mb: u32) -> String {
    if mb >= 1024 && mb % 1024 == 0 {
        format!("{} GB", mb / 1024)
    } else if mb >= 1024 {
        format!("{:.1} GB", mb as f64 / 1024.0)
    } else {
        format!("{} MB", mb)
    }
}

/// 転送量(TB)を表示用に変換
pub fn format_transfer(tb: f64) -> String {
    if tb.fract() == 0.0 {
        format!("{} TB", tb as u64)
    } else {
        format!("{:.1} TB", tb)
    }
}

pub fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
