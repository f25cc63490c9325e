#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

mod common;

use assert_cmd::Command;
use common::{StubApi, TestWorkspace, dropfleet};
use predicates::prelude::*;

const SIZES: &str = r#"{"sizes":[
    {"slug":"s-1vcpu-1gb","memory":1024,"vcpus":1,"disk":25,"transfer":1.0,"price_monthly":6.0,"price_hourly":0.00893,"regions":["nyc1","nyc3"],"available":true,"description":"Basic"},
    {"slug":"s-2vcpu-2gb","memory":2048,"vcpus":2,"disk":60,"transfer":3.0,"price_monthly":18.0,"price_hourly":0.02679,"regions":["ams3"],"available":true,"description":"Basic"}
],"links":{},"meta":{"total":2}}"#;

fn droplet_json(id: u64, name: &str, address: Option<&str>) -> String {
    let v4 = match address {
        Some(ip) => format!(r#"[{{"ip_address":"{}","type":"public"}}]"#, ip),
        None => "[]".to_string(),
    };
    format!(
        r#"{{"id":{},"name":"{}","region":{{"slug":"nyc1"}},"size_slug":"s-1vcpu-1gb","image":{{"slug":"ubuntu-20-04-x64"}},"networks":{{"v4":{}}}}}"#,
        id, name, v4
    )
}

fn droplet_page(droplets: &[String]) -> String {
    format!(r#"{{"droplets":[{}],"links":{{}}}}"#, droplets.join(","))
}

fn ledger_names(ledger: &serde_json::Value) -> Vec<String> {
    ledger["droplets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect()
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("dropfleet").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--sizes"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--delete-all"))
        .stdout(predicate::str::contains("--size-regions"))
        .stdout(predicate::str::contains("--fleet"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("dropfleet").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dropfleet"));
}

/// 26台以上はネットワークに触れる前に拒否されることを確認
#[test]
fn test_fleet_over_limit_rejected() {
    let mut cmd = Command::cargo_bin("dropfleet").unwrap();
    cmd.env_remove("DO_API_KEY")
        .arg("--fleet")
        .arg("26")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot create more than 25"));
}

/// 0台の指定も拒否されることを確認
#[test]
fn test_fleet_zero_rejected() {
    let mut cmd = Command::cargo_bin("dropfleet").unwrap();
    cmd.env_remove("DO_API_KEY")
        .arg("--fleet")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

/// ホスト名に使えないプレフィックスは拒否されることを確認
#[test]
fn test_invalid_prefix_rejected() {
    let mut cmd = Command::cargo_bin("dropfleet").unwrap();
    cmd.env_remove("DO_API_KEY")
        .arg("--name")
        .arg("../web")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name prefix"));
}

/// DO_API_KEY 未設定ならリクエストを送らずに失敗することを確認
#[test]
fn test_missing_credential_makes_no_request() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let url = format!("http://{}/v2", listener.local_addr().unwrap());
    let workspace = TestWorkspace::new();

    dropfleet(&url, &workspace)
        .env_remove("DO_API_KEY")
        .arg("--list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DO_API_KEY"));

    let err = listener.accept().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);
    assert!(!workspace.ledger_path().exists());
}

/// --size-regions で提供リージョンが表示されることを確認
#[test]
fn test_size_regions_lists_regions() {
    let api = StubApi::serve(vec![(200, SIZES.to_string())]);
    let workspace = TestWorkspace::new();

    dropfleet(&api.url, &workspace)
        .arg("--size-regions")
        .arg("s-1vcpu-1gb")
        .assert()
        .success()
        .stdout(predicate::str::contains("nyc1"))
        .stdout(predicate::str::contains("nyc3"))
        .stdout(predicate::str::contains("ams3").not());

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /v2/sizes"));
}

/// 存在しないサイズは「見つかりません」を表示して正常終了することを確認
#[test]
fn test_size_regions_unknown_slug() {
    let api = StubApi::serve(vec![(200, SIZES.to_string())]);
    let workspace = TestWorkspace::new();

    dropfleet(&api.url, &workspace)
        .arg("--size-regions")
        .arg("m-64vcpu-512gb")
        .assert()
        .success()
        .stdout(predicate::str::contains("見つかりませんでした"));

    assert_eq!(api.requests().len(), 1);
    assert!(!workspace.ledger_path().exists());
}

/// --sizes が --list より優先されることを確認
#[test]
fn test_sizes_takes_priority() {
    let api = StubApi::serve(vec![(200, SIZES.to_string())]);
    let workspace = TestWorkspace::new();

    dropfleet(&api.url, &workspace)
        .arg("--list")
        .arg("--sizes")
        .assert()
        .success()
        .stdout(predicate::str::contains("s-2vcpu-2gb"))
        .stdout(predicate::str::contains("TRANSFER"))
        .stdout(predicate::str::contains("$/HOUR"))
        .stdout(predicate::str::contains("3 TB"))
        .stdout(predicate::str::contains("0.02679"));

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /v2/sizes"));
}

/// --list で台帳のアドレスが補完されることを確認
#[test]
fn test_list_backfills_ledger_addresses() {
    let workspace = TestWorkspace::new();
    workspace.write_ledger(&format!(
        r#"{{"droplets":[{}]}}"#,
        r#"{"id":3164444,"name":"droplet1","region":{"slug":"nyc1"},"size":"s-1vcpu-1gb","image":{"slug":"ubuntu-20-04-x64"}}"#
    ));
    let api = StubApi::serve(vec![(
        200,
        droplet_page(&[droplet_json(3164444, "droplet1", Some("192.0.2.10"))]),
    )]);

    dropfleet(&api.url, &workspace)
        .arg("--drops")
        .assert()
        .success()
        .stdout(predicate::str::contains("droplet1"))
        .stdout(predicate::str::contains("192.0.2.10"));

    let ledger = workspace.read_ledger();
    assert_eq!(ledger["droplets"][0]["addresses"][0], "192.0.2.10");
}

/// 一部の削除に失敗しても正常終了し、失敗分は台帳に残ることを確認
#[test]
fn test_delete_all_keeps_failed_entries() {
    let workspace = TestWorkspace::new();
    workspace.write_ledger(
        r#"{"droplets":[
            {"id":1,"name":"droplet1","region":{"slug":"nyc1"},"size":"s-1vcpu-1gb","image":{"slug":"ubuntu-20-04-x64"}},
            {"id":2,"name":"droplet2","region":{"slug":"nyc1"},"size":"s-1vcpu-1gb","image":{"slug":"ubuntu-20-04-x64"}}
        ]}"#,
    );
    let api = StubApi::serve(vec![
        (
            200,
            droplet_page(&[
                droplet_json(1, "droplet1", None),
                droplet_json(2, "droplet2", None),
            ]),
        ),
        (204, String::new()),
        (
            422,
            r#"{"id":"unprocessable_entity","message":"Droplet is locked"}"#.to_string(),
        ),
    ]);

    dropfleet(&api.url, &workspace)
        .arg("--delete-all")
        .assert()
        .success()
        .stdout(predicate::str::contains("Droplet is locked"))
        .stdout(predicate::str::contains("1 台は削除できませんでした"));

    let requests = api.requests();
    assert!(requests[1].starts_with("DELETE /v2/droplets/1 "));
    assert!(requests[2].starts_with("DELETE /v2/droplets/2 "));
    assert_eq!(ledger_names(&workspace.read_ledger()), vec!["droplet2"]);
}

/// 全削除が成功すると台帳が空になることを確認
#[test]
fn test_delete_all_empties_ledger() {
    let workspace = TestWorkspace::new();
    workspace.write_ledger(
        r#"{"droplets":[{"id":1,"name":"droplet1","region":{"slug":"nyc1"},"size":"s-1vcpu-1gb","image":{"slug":"ubuntu-20-04-x64"}}]}"#,
    );
    let api = StubApi::serve(vec![
        (200, droplet_page(&[droplet_json(1, "droplet1", None)])),
        (204, String::new()),
    ]);

    dropfleet(&api.url, &workspace)
        .arg("--dry")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 台を削除しました"));

    assert!(ledger_names(&workspace.read_ledger()).is_empty());
}

/// 作成は台帳の件数から連番を続け、鍵を保存することを確認
#[test]
fn test_create_fleet_continues_numbering() {
    let workspace = TestWorkspace::new();
    workspace.write_ledger(
        r#"{"droplets":[{"id":1,"name":"droplet1","region":{"slug":"nyc1"},"size":"s-1vcpu-1gb","image":{"slug":"ubuntu-20-04-x64"}}]}"#,
    );
    let api = StubApi::serve(vec![
        (
            201,
            r#"{"ssh_key":{"id":512190,"fingerprint":"3b:16:bf","public_key":"ssh-rsa AAAA","name":"droplet"}}"#
                .to_string(),
        ),
        (
            202,
            format!(r#"{{"droplet":{}}}"#, droplet_json(3164494, "droplet2", None)),
        ),
        (
            200,
            format!(
                r#"{{"droplet":{}}}"#,
                droplet_json(3164494, "droplet2", Some("192.0.2.20"))
            ),
        ),
        (
            200,
            droplet_page(&[
                droplet_json(1, "droplet1", Some("192.0.2.10")),
                droplet_json(3164494, "droplet2", Some("192.0.2.20")),
            ]),
        ),
    ]);

    dropfleet(&api.url, &workspace)
        .arg("--fleet")
        .arg("1")
        .arg("--region")
        .arg("sfo3")
        .arg("--wait")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("リージョン: sfo3"))
        .stdout(predicate::str::contains("droplet2"))
        .stdout(predicate::str::contains("192.0.2.20"));

    let requests = api.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests[0].starts_with("POST /v2/account/keys "));
    assert!(requests[1].starts_with("POST /v2/droplets "));
    assert!(requests[2].starts_with("GET /v2/droplets/3164494 "));
    assert!(requests[3].starts_with("GET /v2/droplets?"));

    let ledger = workspace.read_ledger();
    assert_eq!(ledger_names(&ledger), vec!["droplet1", "droplet2"]);
    assert_eq!(ledger["droplets"][1]["id"], 3164494);

    let key_dir = workspace.key_dir();
    assert!(key_dir.join("id_rsa").exists());
    assert!(key_dir.join("id_rsa.pub").exists());
    assert!(key_dir.join("droplet").join("id_rsa").exists());
}
