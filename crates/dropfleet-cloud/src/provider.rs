//! Cloud provider trait definition

use crate::error::Result;
use crate::machine::{Machine, MachineSize};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Compute provider abstraction trait
///
/// One implementation per provider control plane. Workflows in
/// [`crate::fleet`] and [`crate::keypair`] only talk to this trait.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Returns the provider name (e.g., "digitalocean")
    fn name(&self) -> &str;

    /// List every machine visible to the credential
    async fn list_machines(&self) -> Result<Vec<Machine>>;

    /// Read a single machine by id
    async fn get_machine(&self, id: u64) -> Result<Machine>;

    /// Create a machine. The returned record may be incomplete.
    async fn create_machine(&self, spec: &MachineSpec) -> Result<Machine>;

    /// Delete a machine by id
    async fn delete_machine(&self, id: u64) -> Result<()>;

    /// List the size catalogue
    async fn list_sizes(&self) -> Result<Vec<MachineSize>>;

    /// Register a public key with the account
    async fn register_ssh_key(&self, name: &str, public_key: &str) -> Result<SshKey>;
}

/// Request to create one machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSpec {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    /// Provider key ids the machine should trust
    pub ssh_keys: Vec<u64>,
}

/// A public key registered with the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub fingerprint: String,
}

/// Region, size and image applied to every machine of a fleet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetPolicy {
    pub region: String,
    pub size: String,
    pub image: String,
}

impl FleetPolicy {
    pub const DEFAULT_REGION: &'static str = "nyc1";
    pub const DEFAULT_SIZE: &'static str = "s-1vcpu-1gb";
    pub const DEFAULT_IMAGE: &'static str = "ubuntu-20-04-x64";

    pub fn spec(&self, name: impl Into<String>, ssh_key: u64) -> MachineSpec {
        MachineSpec {
            name: name.into(),
            region: self.region.clone(),
            size: self.size.clone(),
            image: self.image.clone(),
            ssh_keys: vec![ssh_key],
        }
    }
}

impl Default for FleetPolicy {
    fn default() -> Self {
        Self {
            region: Self::DEFAULT_REGION.to_string(),
            size: Self::DEFAULT_SIZE.to_string(),
            image: Self::DEFAULT_IMAGE.to_string(),
        }
    }
}
