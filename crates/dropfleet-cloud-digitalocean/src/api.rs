//! DigitalOcean v2 wire types
//!
//! Field names are fixed by the API. Everything that is not needed is
//! ignored; everything that may be absent or null is optional.

use chrono::{DateTime, Utc};
use dropfleet_cloud::{Machine, MachineSize, MachineSpec, Slug, SshKey};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

#[derive(Debug, Deserialize)]
pub(crate) struct DropletEnvelope {
    pub droplet: ApiDroplet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DropletPage {
    #[serde(default)]
    pub droplets: Vec<ApiDroplet>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SizePage {
    #[serde(default)]
    pub sizes: Vec<ApiSize>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

impl Links {
    pub fn has_next(&self) -> bool {
        self.pages.as_ref().is_some_and(|p| p.next.is_some())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pages {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDroplet {
    id: u64,
    name: String,
    #[serde(default)]
    region: Option<ApiSlug>,
    #[serde(default)]
    size_slug: Option<String>,
    #[serde(default)]
    image: Option<ApiImage>,
    #[serde(default)]
    networks: Option<ApiNetworks>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiSlug {
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiNetworks {
    #[serde(default)]
    v4: Vec<ApiNetworkV4>,
}

#[derive(Debug, Deserialize)]
struct ApiNetworkV4 {
    ip_address: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl From<ApiDroplet> for Machine {
    fn from(droplet: ApiDroplet) -> Self {
        let mut networks = droplet.networks.unwrap_or_default().v4;
        // public addresses first
        networks.sort_by_key(|n| n.kind != "public");
        let addresses: Vec<Ipv4Addr> = networks
            .iter()
            .filter_map(|n| n.ip_address.parse().ok())
            .collect();

        // custom images and snapshots have no slug
        let image = droplet
            .image
            .and_then(|i| i.slug.or(i.name))
            .unwrap_or_default();

        Machine {
            id: droplet.id,
            name: droplet.name,
            region: Slug::new(droplet.region.and_then(|r| r.slug).unwrap_or_default()),
            size: droplet.size_slug.unwrap_or_default(),
            image: Slug::new(image),
            addresses,
            created_at: droplet.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSize {
    slug: String,
    #[serde(default)]
    memory: u32,
    #[serde(default)]
    vcpus: u32,
    #[serde(default)]
    disk: u32,
    #[serde(default)]
    transfer: f64,
    #[serde(default)]
    price_monthly: f64,
    #[serde(default)]
    price_hourly: f64,
    #[serde(default)]
    regions: Vec<String>,
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    description: Option<String>,
}

fn default_available() -> bool {
    true
}

impl From<ApiSize> for MachineSize {
    fn from(size: ApiSize) -> Self {
        MachineSize {
            slug: size.slug,
            memory: size.memory,
            vcpus: size.vcpus,
            disk: size.disk,
            transfer: size.transfer,
            price_monthly: size.price_monthly,
            price_hourly: size.price_hourly,
            regions: size.regions,
            available: size.available,
            description: size.description.filter(|d| !d.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SshKeyEnvelope {
    pub ssh_key: ApiSshKey,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSshKey {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    fingerprint: String,
}

impl From<ApiSshKey> for SshKey {
    fn from(key: ApiSshKey) -> Self {
        SshKey {
            id: key.id,
            name: key.name,
            fingerprint: key.fingerprint,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateDropletRequest<'a> {
    pub name: &'a str,
    pub region: &'a str,
    pub size: &'a str,
    pub image: &'a str,
    pub ssh_keys: &'a [u64],
}

impl<'a> From<&'a MachineSpec> for CreateDropletRequest<'a> {
    fn from(spec: &'a MachineSpec) -> Self {
        Self {
            name: &spec.name,
            region: &spec.region,
            size: &spec.size,
            image: &spec.image,
            ssh_keys: &spec.ssh_keys,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSshKeyRequest<'a> {
    pub name: &'a str,
    pub public_key: &'a str,
}

/// Error body returned by the API on non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub id: Option<String>,
    pub message: String,
}
