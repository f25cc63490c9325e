//! DigitalOcean API client
//!
//! Thin bearer-token REST client. One request at a time, no retries; a
//! non-success status becomes [`DigitalOceanError::Api`] and a body that
//! does not match the expected shape becomes [`DigitalOceanError::Decode`].

use crate::api::{
    ApiErrorBody, CreateDropletRequest, CreateSshKeyRequest, DropletEnvelope, DropletPage,
    SizePage, SshKeyEnvelope,
};
use crate::config::DigitalOceanConfig;
use crate::error::{DigitalOceanError, Result};
use dropfleet_cloud::{Machine, MachineSize, MachineSpec, SshKey};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

const PER_PAGE: u32 = 200;
// 200 droplets per page; far beyond any account this tool manages
const MAX_PAGES: u32 = 50;

/// DigitalOcean REST client
pub struct DigitalOceanClient {
    client: reqwest::Client,
    api_token: String,
    api_url: String,
}

impl DigitalOceanClient {
    pub fn new(config: DigitalOceanConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: config.api_token,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Send a request and return the status with the raw body
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, String)>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("{} {}", method, path);

        let mut request = self
            .client
            .request(method, self.url(path))
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Send a request and decode a successful JSON response
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        endpoint: &'static str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (status, text) = self.send(method, path, body).await?;
        if !status.is_success() {
            return Err(api_error(endpoint, status, &text));
        }
        decode(endpoint, &text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, endpoint: &'static str) -> Result<T> {
        self.request(Method::GET, path, None::<&()>, endpoint).await
    }

    /// List all droplets, following pagination
    pub async fn list_droplets(&self) -> Result<Vec<Machine>> {
        let mut machines = Vec::new();
        for page in 1..=MAX_PAGES {
            let path = format!("/droplets?page={}&per_page={}", page, PER_PAGE);
            let response: DropletPage = self.get(&path, "list droplets").await?;
            machines.extend(response.droplets.into_iter().map(Machine::from));
            if !response.links.has_next() {
                break;
            }
            if page == MAX_PAGES {
                warn_truncated("droplets", machines.len());
            }
        }
        tracing::debug!("Listed {} droplets", machines.len());
        Ok(machines)
    }

    /// Get a droplet by id
    pub async fn get_droplet(&self, id: u64) -> Result<Machine> {
        let response: DropletEnvelope = self
            .get(&format!("/droplets/{}", id), "get droplet")
            .await?;
        Ok(response.droplet.into())
    }

    /// Create a droplet
    pub async fn create_droplet(&self, spec: &MachineSpec) -> Result<Machine> {
        let body = CreateDropletRequest::from(spec);
        let response: DropletEnvelope = self
            .request(Method::POST, "/droplets", Some(&body), "create droplet")
            .await?;
        Ok(response.droplet.into())
    }

    /// Delete a droplet. Anything but 204 No Content is a failure.
    pub async fn delete_droplet(&self, id: u64) -> Result<()> {
        let (status, text) = self
            .send(Method::DELETE, &format!("/droplets/{}", id), None::<&()>)
            .await?;
        if status != StatusCode::NO_CONTENT {
            return Err(api_error("delete droplet", status, &text));
        }
        Ok(())
    }

    /// List the size catalogue, following pagination
    pub async fn list_sizes(&self) -> Result<Vec<MachineSize>> {
        let mut sizes = Vec::new();
        for page in 1..=MAX_PAGES {
            let path = format!("/sizes?page={}&per_page={}", page, PER_PAGE);
            let response: SizePage = self.get(&path, "list sizes").await?;
            sizes.extend(response.sizes.into_iter().map(MachineSize::from));
            if !response.links.has_next() {
                break;
            }
            if page == MAX_PAGES {
                warn_truncated("sizes", sizes.len());
            }
        }
        Ok(sizes)
    }

    /// Register a public key with the account
    pub async fn create_ssh_key(&self, name: &str, public_key: &str) -> Result<SshKey> {
        let body = CreateSshKeyRequest { name, public_key };
        let response: SshKeyEnvelope = self
            .request(Method::POST, "/account/keys", Some(&body), "register ssh key")
            .await?;
        Ok(response.ssh_key.into())
    }
}

fn warn_truncated(what: &str, fetched: usize) {
    tracing::warn!(
        "Stopped listing {} after {} pages ({} fetched); more pages remain",
        what,
        MAX_PAGES,
        fetched
    );
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| DigitalOceanError::Decode { endpoint, source })
}

fn api_error(endpoint: &'static str, status: StatusCode, text: &str) -> DigitalOceanError {
    let message = match serde_json::from_str::<ApiErrorBody>(text) {
        Ok(ApiErrorBody {
            id: Some(id),
            message,
        }) => format!("{} ({})", message, id),
        Ok(ApiErrorBody { id: None, message }) => message,
        Err(_) if text.trim().is_empty() => "empty response".to_string(),
        Err(_) => text.trim().to_string(),
    };
    DigitalOceanError::Api {
        endpoint,
        status,
        message,
    }
}
