use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// Stand-in for the DigitalOcean API
///
/// Answers connections in order with the canned responses, whatever the
/// request path, and records each request line.
pub struct StubApi {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubApi {
    pub fn serve(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v2", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let head = read_request(&mut stream);
                let line = head.lines().next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(line);

                let reply = format!(
                    "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { url, requests }
    }

    /// Request lines seen so far, e.g. `GET /v2/sizes?page=1&per_page=200 HTTP/1.1`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    l.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Scratch directory holding the ledger and generated keys
pub struct TestWorkspace {
    pub root: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.path().join("droplets.json")
    }

    pub fn key_dir(&self) -> PathBuf {
        self.root.path().join("keys")
    }

    pub fn write_ledger(&self, content: &str) {
        std::fs::write(self.ledger_path(), content).unwrap();
    }

    pub fn read_ledger(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.ledger_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

/// Command for the binary with a clean environment pointed at `api_url`
#[allow(deprecated)]
pub fn dropfleet(api_url: &str, workspace: &TestWorkspace) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("dropfleet").unwrap();
    cmd.env("DO_API_KEY", "dop_v1_test")
        .env("DIGITALOCEAN_API_URL", api_url)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DROPFLEET_REGION")
        .env_remove("DROPFLEET_SIZE")
        .env_remove("DROPFLEET_IMAGE")
        .arg("--ledger")
        .arg(workspace.ledger_path())
        .arg("--key-dir")
        .arg(workspace.key_dir());
    cmd
}
