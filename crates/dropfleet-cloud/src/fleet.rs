//! Fleet workflows
//!
//! [`Fleet`] ties a [`ComputeProvider`] to a [`LedgerStore`]: it creates
//! batches of machines that share one SSH key, refreshes the ledger from
//! the live machine list, and tears everything down again.

use crate::error::{CloudError, Result};
use crate::keypair::{KeyProvisioner, ProvisionedKey};
use crate::ledger::{Ledger, LedgerStore};
use crate::machine::Machine;
use crate::provider::{ComputeProvider, FleetPolicy};
use crate::report::BatchReport;
use std::time::Instant;

/// Upper bound on machines created by a single run
pub const MAX_FLEET_SIZE: usize = 25;

/// Outcome of [`Fleet::create_fleet`]
#[derive(Debug, Clone)]
pub struct FleetReport {
    pub key: ProvisionedKey,
    /// Machines created by this run, in creation order
    pub created: Vec<Machine>,
    /// Ledger as saved at the end of the run
    pub ledger: Ledger,
}

/// Outcome of [`Fleet::refresh`]
#[derive(Debug, Clone)]
pub struct Refresh {
    pub live: Vec<Machine>,
    pub ledger: Ledger,
}

/// Outcome of [`Fleet::delete_all`]
#[derive(Debug, Clone)]
pub struct Teardown {
    pub report: BatchReport,
    pub ledger: Ledger,
}

/// Fleet orchestrator
pub struct Fleet<'a, P, L>
where
    P: ComputeProvider + ?Sized,
    L: LedgerStore + ?Sized,
{
    provider: &'a P,
    ledger: &'a L,
    policy: FleetPolicy,
}

impl<'a, P, L> Fleet<'a, P, L>
where
    P: ComputeProvider + ?Sized,
    L: LedgerStore + ?Sized,
{
    pub fn new(provider: &'a P, ledger: &'a L) -> Self {
        Self {
            provider,
            ledger,
            policy: FleetPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FleetPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &FleetPolicy {
        &self.policy
    }

    /// Create `count` machines named `prefix<n>`, numbering on from the
    /// current ledger size.
    ///
    /// Fail-fast: the first error aborts the run and the ledger is left as
    /// it was. The arguments are checked before any provider call.
    pub async fn create_fleet(
        &self,
        keys: &KeyProvisioner,
        prefix: &str,
        count: usize,
    ) -> Result<FleetReport> {
        validate_request(prefix, count)?;

        let key = keys.provision(self.provider, prefix).await?;

        let existing = self.ledger.load().await?;
        let start = existing.next_index();
        tracing::debug!(
            "Creating {} droplets from index {} ({} already recorded)",
            count,
            start,
            existing.len()
        );

        let mut created = Vec::with_capacity(count);
        for index in start..start + count {
            let spec = self.policy.spec(format!("{}{}", prefix, index), key.key_id);
            let response = self.provider.create_machine(&spec).await?;
            tracing::info!(id = response.id, "Created droplet {}", spec.name);

            let observed = self.provider.get_machine(response.id).await?;
            created.push(response.reconcile(observed));
        }

        let ledger = existing.merge(&created);
        self.ledger.save(&ledger).await?;

        Ok(FleetReport {
            key,
            created,
            ledger,
        })
    }

    /// List live machines and back-fill their addresses into the ledger
    pub async fn refresh(&self) -> Result<Refresh> {
        let live = self.provider.list_machines().await?;
        let recorded = self.ledger.load().await?;

        let ledger = recorded.merge_addresses(&live);
        if ledger != recorded {
            self.ledger.save(&ledger).await?;
        }

        Ok(Refresh { live, ledger })
    }

    /// Delete every machine visible to the credential.
    ///
    /// A deletion the provider rejects is recorded in the report and the
    /// batch moves on. Any other error stops the batch; machines deleted up
    /// to that point are still pruned from the ledger.
    pub async fn delete_all(&self) -> Result<Teardown> {
        let start = Instant::now();
        let live = self.provider.list_machines().await?;

        let mut report = BatchReport::new();
        let mut fatal = None;
        for machine in &live {
            match self.provider.delete_machine(machine.id).await {
                Ok(()) => {
                    tracing::info!(id = machine.id, "Deleted droplet {}", machine.name);
                    report.add_success(machine.id, &machine.name);
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(id = machine.id, "Failed to delete droplet: {}", e);
                    report.add_failure(machine.id, &machine.name, e.to_string());
                }
                Err(e) => {
                    fatal = Some(e);
                    break;
                }
            }
        }

        let recorded = self.ledger.load().await?;
        let ledger = recorded.prune(&report.succeeded_ids());
        if ledger.len() != recorded.len() {
            self.ledger.save(&ledger).await?;
        }

        if let Some(e) = fatal {
            return Err(e);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(Teardown { report, ledger })
    }
}

/// Check a fleet request before anything touches the network
pub fn validate_request(prefix: &str, count: usize) -> Result<()> {
    if count == 0 {
        return Err(CloudError::InvalidRequest(
            "fleet size must be at least 1".into(),
        ));
    }
    if count > MAX_FLEET_SIZE {
        return Err(CloudError::InvalidRequest(format!(
            "cannot create more than {} droplets (requested {})",
            MAX_FLEET_SIZE, count
        )));
    }
    if prefix.is_empty() {
        return Err(CloudError::InvalidRequest("name prefix is empty".into()));
    }
    if prefix.starts_with('.') || prefix.starts_with('-') {
        return Err(CloudError::InvalidRequest(format!(
            "name prefix '{}' must start with a letter or digit",
            prefix
        )));
    }
    // droplet names must be valid hostnames
    if let Some(c) = prefix
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(CloudError::InvalidRequest(format!(
            "name prefix '{}' contains '{}'; use letters, digits, '-' or '.'",
            prefix, c
        )));
    }
    Ok(())
}
