//! Per-item results of batch operations

use serde::{Deserialize, Serialize};

/// Result of a batch over several machines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Items that completed
    pub succeeded: Vec<ItemResult>,

    /// Items that failed; the batch carried on past them
    pub failed: Vec<ItemResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn add_success(&mut self, id: u64, name: impl Into<String>) {
        self.succeeded.push(ItemResult {
            id,
            name: name.into(),
            error: None,
        });
    }

    pub fn add_failure(&mut self, id: u64, name: impl Into<String>, error: impl Into<String>) {
        self.failed.push(ItemResult {
            id,
            name: name.into(),
            error: Some(error.into()),
        });
    }

    /// Ids of the items that completed
    pub fn succeeded_ids(&self) -> Vec<u64> {
        self.succeeded.iter().map(|r| r.id).collect()
    }
}

/// Outcome for a single machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    pub id: u64,
    pub name: String,
    /// Error message if failed
    pub error: Option<String>,
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}
