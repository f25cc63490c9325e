//! dropfleet cloud core
//!
//! Provider abstraction, fleet ledger and fleet workflows for dropfleet.
//! Provider crates (currently DigitalOcean) implement [`ComputeProvider`];
//! everything in this crate works against that trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  dropfleet CLI                   │
//! │      (--list / --sizes / --delete-all / ...)     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                dropfleet-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   Fleet (create / refresh / delete_all)   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ KeyProvision │  │    Ledger    │            │
//! │  └──────────────┘  └──────────────┘            │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │      trait ComputeProvider { ... }        │   │
//! │  └──────────────────────────────────────────┘   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │ digitalocean  │
//!           │   provider    │
//!           └───────────────┘
//! ```

pub mod error;
pub mod fleet;
pub mod keypair;
pub mod ledger;
pub mod machine;
pub mod provider;
pub mod report;

#[cfg(test)]
mod test_support;

// Re-exports
pub use error::{CloudError, ErrorKind, Result};
pub use fleet::{Fleet, FleetReport, MAX_FLEET_SIZE, Refresh, Teardown, validate_request};
pub use keypair::{KeyPair, KeyProvisioner, ProvisionedKey};
pub use ledger::{DEFAULT_LEDGER_FILE, FileLedger, Ledger, LedgerStore, MemoryLedger};
pub use machine::{Machine, MachineSize, Slug, find_size};
pub use provider::{ComputeProvider, FleetPolicy, MachineSpec, SshKey};
pub use report::{BatchReport, ItemResult};
