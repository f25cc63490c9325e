//! DigitalOcean provider for dropfleet
//!
//! This crate implements the ComputeProvider trait for DigitalOcean,
//! talking to the v2 REST API directly.
//!
//! # Features
//!
//! - Droplet management (create, read, delete, list)
//! - Size catalogue listing
//! - SSH key registration
//!
//! # Requirements
//!
//! - `DO_API_KEY` env var holding a personal access token
//! - `DIGITALOCEAN_API_URL` optionally overrides the API base URL
//!
//! # Example
//!
//! ```ignore
//! use dropfleet_cloud::ComputeProvider;
//! use dropfleet_cloud_digitalocean::DigitalOceanProvider;
//!
//! let provider = DigitalOceanProvider::from_env()?;
//! for droplet in provider.list_machines().await? {
//!     println!("{} {}", droplet.id, droplet.name);
//! }
//! ```

mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use client::DigitalOceanClient;
pub use config::{API_TOKEN_ENV, API_URL_ENV, DEFAULT_API_URL, DigitalOceanConfig};
pub use error::{DigitalOceanError, Result};
pub use provider::DigitalOceanProvider;
