//! HTTP access to Codal behind a small trait so the pipeline can be driven
//! without a network in tests.

use crate::codal::CodalError;
use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::{debug, warn};

#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `url` and return the raw body. Status codes are not inspected.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CodalError>;
}

/// [`Fetch`] implementation backed by `reqwest`
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, CodalError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| CodalError::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| CodalError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CodalError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} for {}", status, url);
        }

        Ok(response.bytes().await?.to_vec())
    }
}
