use clap::Parser;
use dropfleet_cloud::{DEFAULT_LEDGER_FILE, FleetPolicy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dropfleet", version)]
#[command(
    about = "DigitalOcean のドロップレットをまとめて作る。一覧する。片付ける。",
    long_about = None
)]
pub struct Cli {
    /// 利用可能なサイズ一覧を表示
    #[arg(long)]
    pub sizes: bool,

    /// ドロップレット一覧を表示し、台帳のアドレスを更新
    #[arg(long, visible_alias = "drops")]
    pub list: bool,

    /// アカウント内の全ドロップレットを削除（⚠️ 元に戻せません）
    #[arg(long = "delete-all", visible_alias = "dry")]
    pub delete_all: bool,

    /// 指定サイズを提供しているリージョンを表示
    #[arg(long, value_name = "SLUG")]
    pub size_regions: Option<String>,

    /// 作成するドロップレット名のプレフィックス（SSH鍵の登録名にも使用）
    #[arg(long, value_name = "PREFIX", default_value = "droplet")]
    pub name: String,

    /// 作成するドロップレットの台数（1〜25）
    #[arg(long, value_name = "COUNT", default_value_t = 2)]
    pub fleet: usize,

    /// 台帳ファイルのパス
    #[arg(long, value_name = "PATH", env = "DROPFLEET_LEDGER", default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: PathBuf,

    /// 生成したSSH鍵の保存先ディレクトリ
    #[arg(long, value_name = "DIR", env = "DROPFLEET_KEY_DIR", default_value = ".")]
    pub key_dir: PathBuf,

    /// 作成先リージョン
    #[arg(long, env = "DROPFLEET_REGION", default_value = FleetPolicy::DEFAULT_REGION)]
    pub region: String,

    /// 作成するドロップレットのサイズ
    #[arg(long, env = "DROPFLEET_SIZE", default_value = FleetPolicy::DEFAULT_SIZE)]
    pub size: String,

    /// 作成に使うイメージ
    #[arg(long, env = "DROPFLEET_IMAGE", default_value = FleetPolicy::DEFAULT_IMAGE)]
    pub image: String,

    /// 作成後、一覧を取得するまでの待機秒数（0 で待機しない）
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub wait: u64,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}

/// 実行するアクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Sizes,
    List,
    DeleteAll,
    SizeRegions(String),
    CreateFleet { prefix: String, count: usize },
}

impl Cli {
    /// 複数指定された場合は sizes > list > delete-all > size-regions > 作成 の順で優先
    pub fn action(&self) -> Action {
        if self.sizes {
            Action::Sizes
        } else if self.list {
            Action::List
        } else if self.delete_all {
            Action::DeleteAll
        } else if let Some(slug) = &self.size_regions {
            Action::SizeRegions(slug.clone())
        } else {
            Action::CreateFleet {
                prefix: self.name.clone(),
                count: self.fleet,
            }
        }
    }

    pub fn policy(&self) -> FleetPolicy {
        FleetPolicy {
            region: self.region.clone(),
            size: self.size.clone(),
            image: self.image.clone(),
        }
    }
}
