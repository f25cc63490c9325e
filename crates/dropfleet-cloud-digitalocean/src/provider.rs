//! DigitalOcean provider implementation

use crate::client::DigitalOceanClient;
use crate::config::DigitalOceanConfig;
use async_trait::async_trait;
use dropfleet_cloud::{
    CloudError, ComputeProvider, Machine, MachineSize, MachineSpec, SshKey,
};

/// DigitalOcean provider
pub struct DigitalOceanProvider {
    client: DigitalOceanClient,
}

impl DigitalOceanProvider {
    pub fn new(config: DigitalOceanConfig) -> Self {
        Self {
            client: DigitalOceanClient::new(config),
        }
    }

    /// Build the provider from `DO_API_KEY` / `DIGITALOCEAN_API_URL`
    pub fn from_env() -> dropfleet_cloud::Result<Self> {
        let config = DigitalOceanConfig::from_env().map_err(CloudError::from)?;
        tracing::debug!("DigitalOcean API: {}", config.api_url);
        Ok(Self::new(config))
    }

    pub fn client(&self) -> &DigitalOceanClient {
        &self.client
    }
}

#[async_trait]
impl ComputeProvider for DigitalOceanProvider {
    fn name(&self) -> &str {
        "digitalocean"
    }

    async fn list_machines(&self) -> dropfleet_cloud::Result<Vec<Machine>> {
        Ok(self.client.list_droplets().await?)
    }

    async fn get_machine(&self, id: u64) -> dropfleet_cloud::Result<Machine> {
        Ok(self.client.get_droplet(id).await?)
    }

    async fn create_machine(&self, spec: &MachineSpec) -> dropfleet_cloud::Result<Machine> {
        tracing::info!(
            "Creating droplet {} ({} / {} / {})",
            spec.name,
            spec.region,
            spec.size,
            spec.image
        );
        let machine = self.client.create_droplet(spec).await?;
        tracing::info!("Droplet {} created with id {}", machine.name, machine.id);
        Ok(machine)
    }

    async fn delete_machine(&self, id: u64) -> dropfleet_cloud::Result<()> {
        tracing::info!("Deleting droplet {}", id);
        self.client.delete_droplet(id).await?;
        Ok(())
    }

    async fn list_sizes(&self) -> dropfleet_cloud::Result<Vec<MachineSize>> {
        Ok(self.client.list_sizes().await?)
    }

    async fn register_ssh_key(
        &self,
        name: &str,
        public_key: &str,
    ) -> dropfleet_cloud::Result<SshKey> {
        tracing::info!("Registering SSH key {}", name);
        let key = self.client.create_ssh_key(name, public_key).await?;
        tracing::debug!("SSH key {} registered with id {}", key.name, key.id);
        Ok(key)
    }
}
