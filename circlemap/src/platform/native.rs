use crate::error::CircleMapError;
use crate::platform::PlatformService;
use async_trait::async_trait;
use bytes::Bytes;
use log::info;

/// Platform service loading data over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

#[async_trait]
impl PlatformService for NativePlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, CircleMapError> {
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            info!("Failed to load {url}: {status}");
            return Err(CircleMapError::Network(format!(
                "{url} responded with {status}"
            )));
        }

        let bytes = response.bytes().await?;
        info!("Loaded {} bytes from {url}", bytes.len());

        Ok(bytes)
    }
}

impl NativePlatformService {
    /// Creates a new service sending requests with the given user agent.
    pub fn new(user_agent: &str) -> Result<Self, CircleMapError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self { http_client })
    }
}
