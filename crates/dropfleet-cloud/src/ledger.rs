//! Fleet ledger
//!
//! Tracks the machines this tool has created in a single JSON document
//! (`droplets.json` by default). Every change is a whole-document
//! read / merge / write; [`Ledger`] is an immutable snapshot and the
//! [`LedgerStore`] implementations only load and save snapshots.

use crate::error::{CloudError, Result};
use crate::machine::Machine;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

pub const DEFAULT_LEDGER_FILE: &str = "droplets.json";
const BACKUP_SUFFIX: &str = "backup";
const TEMP_SUFFIX: &str = "tmp";

/// Snapshot of the ledger document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    droplets: Vec<Machine>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_machines(droplets: Vec<Machine>) -> Self {
        Self { droplets }
    }

    pub fn machines(&self) -> &[Machine] {
        &self.droplets
    }

    pub fn len(&self) -> usize {
        self.droplets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.droplets.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Machine> {
        self.droplets.iter().find(|m| m.id == id)
    }

    /// Index used for the next machine name (`prefix` + index)
    pub fn next_index(&self) -> usize {
        self.droplets.len() + 1
    }

    /// Add newly created machines.
    ///
    /// Machines are appended in the given order. A machine whose id is
    /// already recorded replaces the old entry in place.
    pub fn merge(&self, created: &[Machine]) -> Ledger {
        let mut droplets = self.droplets.clone();
        for machine in created {
            match droplets.iter_mut().find(|m| m.id == machine.id) {
                Some(existing) => *existing = machine.clone(),
                None => droplets.push(machine.clone()),
            }
        }
        Ledger { droplets }
    }

    /// Drop the entries whose id is in `ids`, keeping the order of the rest
    pub fn prune(&self, ids: &[u64]) -> Ledger {
        let remove: HashSet<u64> = ids.iter().copied().collect();
        Ledger {
            droplets: self
                .droplets
                .iter()
                .filter(|m| !remove.contains(&m.id))
                .cloned()
                .collect(),
        }
    }

    /// Back-fill addresses from a live listing.
    ///
    /// Entries are matched by id. Live addresses replace the recorded ones;
    /// a size or image slug missing from the ledger is taken from the live
    /// record too. Entries without a live counterpart are left untouched.
    pub fn merge_addresses(&self, live: &[Machine]) -> Ledger {
        let by_id: HashMap<u64, &Machine> = live.iter().map(|m| (m.id, m)).collect();
        Ledger {
            droplets: self
                .droplets
                .iter()
                .map(|entry| match by_id.get(&entry.id) {
                    Some(observed) => {
                        let mut updated = entry.clone();
                        if !observed.addresses.is_empty() {
                            updated.addresses = observed.addresses.clone();
                        }
                        if updated.size.is_empty() {
                            updated.size = observed.size.clone();
                        }
                        if updated.image.is_empty() {
                            updated.image = observed.image.clone();
                        }
                        updated
                    }
                    None => entry.clone(),
                })
                .collect(),
        }
    }
}

/// Storage for ledger snapshots
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the current snapshot. A ledger that was never saved is empty.
    async fn load(&self) -> Result<Ledger>;

    /// Replace the stored document with `ledger`
    async fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// Ledger stored as a JSON file on disk
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the backup file path
    fn backup_path(&self) -> PathBuf {
        self.sibling(BACKUP_SUFFIX)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(TEMP_SUFFIX)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    async fn read(path: &Path) -> Result<Ledger> {
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(Ledger::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            CloudError::Ledger(format!("{} is not a valid ledger: {}", path.display(), e))
        })
    }

    /// Ensure the directory holding the ledger exists
    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).await?;
                tracing::debug!("Created ledger directory: {}", dir.display());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FileLedger {
    async fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            // an interrupted save can leave only the backup behind
            let backup = self.backup_path();
            if backup.exists() {
                tracing::warn!(
                    "Ledger {} not found, recovering from {}",
                    self.path.display(),
                    backup.display()
                );
                return Self::read(&backup).await;
            }
            tracing::debug!("Ledger {} not found, starting empty", self.path.display());
            return Ok(Ledger::new());
        }

        let ledger = Self::read(&self.path).await?;
        tracing::debug!("Loaded ledger with {} droplets", ledger.len());
        Ok(ledger)
    }

    /// Write the new document next to the ledger, then rename it into
    /// place. The ledger path always holds a complete document.
    async fn save(&self, ledger: &Ledger) -> Result<()> {
        self.ensure_parent_dir().await?;

        let content = serde_json::to_string_pretty(ledger)?;
        let temp = self.temp_path();
        fs::write(&temp, content).await?;

        if self.path.exists() {
            fs::copy(&self.path, self.backup_path()).await?;
            tracing::debug!("Created ledger backup");
        }
        fs::rename(&temp, &self.path).await?;

        tracing::debug!("Saved ledger with {} droplets", ledger.len());
        Ok(())
    }
}

/// Ledger kept in memory
#[derive(Default)]
pub struct MemoryLedger {
    ledger: Mutex<Ledger>,
}

impl MemoryLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    pub fn snapshot(&self) -> Ledger {
        self.ledger
            .lock()
            .map(|l| l.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn load(&self) -> Result<Ledger> {
        Ok(self.snapshot())
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let mut guard = self
            .ledger
            .lock()
            .map_err(|_| CloudError::Ledger("in-memory ledger lock poisoned".into()))?;
        *guard = ledger.clone();
        Ok(())
    }
}
