//! Machine and size records shared by every provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A provider slug wrapped the way the provider nests it (`{"slug": "nyc1"}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub slug: String,
}

impl Slug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.slug
    }

    pub fn is_empty(&self) -> bool {
        self.slug.is_empty()
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.slug)
    }
}

/// A provider-managed virtual machine (droplet)
///
/// This is also the record shape of the fleet ledger, so the field names
/// follow the ledger document rather than any one API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: u64,
    pub name: String,
    pub region: Slug,
    #[serde(default)]
    pub size: String,
    pub image: Slug,
    /// Assigned IPv4 addresses, empty until networking is up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Machine {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        region: impl Into<String>,
        size: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            region: Slug::new(region),
            size: size.into(),
            image: Slug::new(image),
            addresses: Vec::new(),
            created_at: None,
        }
    }

    pub fn with_address(mut self, address: Ipv4Addr) -> Self {
        self.addresses.push(address);
        self
    }

    /// First assigned address, if any
    pub fn primary_address(&self) -> Option<Ipv4Addr> {
        self.addresses.first().copied()
    }

    /// Combine this record with a later observation of the same machine.
    ///
    /// Values from `observed` win. Fields the observation left empty keep
    /// the value already known here.
    pub fn reconcile(self, observed: Machine) -> Machine {
        Machine {
            id: observed.id,
            name: if observed.name.is_empty() {
                self.name
            } else {
                observed.name
            },
            region: if observed.region.is_empty() {
                self.region
            } else {
                observed.region
            },
            size: if observed.size.is_empty() {
                self.size
            } else {
                observed.size
            },
            image: if observed.image.is_empty() {
                self.image
            } else {
                observed.image
            },
            addresses: if observed.addresses.is_empty() {
                self.addresses
            } else {
                observed.addresses
            },
            created_at: observed.created_at.or(self.created_at),
        }
    }
}

/// A machine size from the provider catalogue. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSize {
    pub slug: String,
    /// Memory in MB
    pub memory: u32,
    pub vcpus: u32,
    /// Disk in GB
    pub disk: u32,
    /// Transfer allowance in TB
    pub transfer: f64,
    pub price_monthly: f64,
    pub price_hourly: f64,
    pub regions: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_available() -> bool {
    true
}

/// Find a size in a catalogue by slug
pub fn find_size<'a>(sizes: &'a [MachineSize], slug: &str) -> Option<&'a MachineSize> {
    sizes.iter().find(|s| s.slug == slug)
}
