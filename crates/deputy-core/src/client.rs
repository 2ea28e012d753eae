//! HTTP client for the upstream workforce-management API.
//!
//! Commands depend on the [`ApiClient`] trait rather than on [`HttpClient`]
//! directly, so tests can hand the command tree a stub implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Error, Result};
use crate::types::{Department, Employee, Leave, Me, Resource, Roster, Timesheet};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings resolved from flags and environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Install base URL, e.g. `https://acme.na.deputy.com`.
    pub base_url: Option<String>,
    /// Bearer token.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Operations the CLI needs from the upstream API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// The authenticated user.
    async fn me(&self) -> Result<Me>;
    /// All employees visible to the token.
    async fn employees(&self) -> Result<Vec<Employee>>;
    /// A single employee by id.
    async fn employee(&self, id: u64) -> Result<Employee>;
    /// All departments.
    async fn departments(&self) -> Result<Vec<Department>>;
    /// All timesheets.
    async fn timesheets(&self) -> Result<Vec<Timesheet>>;
    /// All rostered shifts.
    async fn rosters(&self) -> Result<Vec<Roster>>;
    /// All leave requests.
    async fn leave(&self) -> Result<Vec<Leave>>;
}

/// [`ApiClient`] backed by `reqwest`.
pub struct HttpClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl HttpClient {
    /// Creates a client from resolved connection settings.
    ///
    /// Fails before any request when the token or base URL is missing. The
    /// token is checked first, so an unconfigured client reports
    /// [`Error::NotAuthenticated`].
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(Error::NotAuthenticated)?
            .to_string();

        let raw = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingBaseUrl)?;
        let base_url = parse_base_url(raw)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("deputy-cli/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("{} -> {}", url, status.as_u16());

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body, retry_after).into());
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }

    async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        self.get_json(&format!("api/v1/resource/{}", resource.api_name()))
            .await
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    async fn me(&self) -> Result<Me> {
        self.get_json("api/v1/me").await
    }

    async fn employees(&self) -> Result<Vec<Employee>> {
        self.list(Resource::Employee).await
    }

    async fn employee(&self, id: u64) -> Result<Employee> {
        self.get_json(&format!(
            "api/v1/resource/{}/{id}",
            Resource::Employee.api_name()
        ))
        .await
    }

    async fn departments(&self) -> Result<Vec<Department>> {
        self.list(Resource::Department).await
    }

    async fn timesheets(&self) -> Result<Vec<Timesheet>> {
        self.list(Resource::Timesheet).await
    }

    async fn rosters(&self) -> Result<Vec<Roster>> {
        self.list(Resource::Roster).await
    }

    async fn leave(&self) -> Result<Vec<Leave>> {
        self.list(Resource::Leave).await
    }
}

/// Parse a base URL, accepting bare hosts and normalizing the trailing slash
/// so relative joins keep any path prefix.
fn parse_base_url(raw: &str) -> Result<Url> {
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| Error::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
