//! Cloudflare API client implementation.

use crate::api::{DnsRecordsApi, Envelope, ZonesApi};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use zonescan_core::{Result, ScanError};

/// The Cloudflare API base URL
const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per page when listing a zone
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Read-only Cloudflare API client
#[derive(Clone)]
pub struct CloudflareClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_token: String,
    base_url: String,
    page_size: u32,
}

impl CloudflareClient {
    /// Create a new client with the given API token using default settings
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        CloudflareClientBuilder::new(api_token).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_token: impl Into<String>) -> CloudflareClientBuilder {
        CloudflareClientBuilder::new(api_token)
    }

    /// Access zone endpoints
    #[must_use]
    pub const fn zones(&self) -> ZonesApi<'_> {
        ZonesApi::new(self)
    }

    /// Access DNS record endpoints
    #[must_use]
    pub const fn dns_records(&self) -> DnsRecordsApi<'_> {
        DnsRecordsApi::new(self)
    }

    /// Records requested per page
    pub(crate) fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Perform a GET request and unwrap the response envelope
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Envelope<T>> {
        let url = self.build_url(path, params)?;
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .bearer_auth(&self.inner.api_token)
            .send()
            .await
            .map_err(|e| ScanError::Http(e.to_string()))?;

        Self::handle_response(response).await
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}{}", self.inner.base_url.trim_end_matches('/'), path);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| ScanError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Handle an API response wrapped in the Cloudflare envelope
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<Envelope<T>> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response
            .text()
            .await
            .map_err(|e| ScanError::Http(e.to_string()))?;

        if (200..300).contains(&status) {
            let envelope: Envelope<T> = serde_json::from_str(&body)?;
            if envelope.success {
                return Ok(envelope);
            }
            return Err(ScanError::Api {
                code: status,
                message: envelope.error_message(),
            });
        }

        // Error bodies are usually enveloped too, but don't count on it
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .map(|e| e.error_message())
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        Err(match status {
            401 | 403 => ScanError::Unauthorized,
            404 => ScanError::NotFound { resource: message },
            429 => {
                warn!("Rate limited by Cloudflare API");
                ScanError::RateLimited { retry_after }
            }
            _ => ScanError::Api {
                code: status,
                message,
            },
        })
    }
}

/// Builder for configuring a [`CloudflareClient`]
pub struct CloudflareClientBuilder {
    api_token: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    page_size: u32,
}

impl CloudflareClientBuilder {
    /// Create a new builder with the given API token
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("zonescan/{}", env!("CARGO_PKG_VERSION")),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the number of records requested per page (clamped to 5..=5000)
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.clamp(5, 5000);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CloudflareClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ScanError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(CloudflareClient {
            inner: Arc::new(ClientInner {
                http,
                api_token: self.api_token,
                base_url: self.base_url,
                page_size: self.page_size,
            }),
        })
    }
}
