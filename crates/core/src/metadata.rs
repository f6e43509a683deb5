use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{error::Result, types::VideoMetadata};

pub const NOEMBED_ENDPOINT: &str = "https://noembed.com/embed";

/// Looks up a video's title and author from its URL.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn lookup(&self, url: &str) -> Result<Option<VideoMetadata>>;
}

#[derive(Debug, Default, Deserialize)]
pub struct OEmbedResponse {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub error: Option<String>,
}

impl OEmbedResponse {
    pub fn into_metadata(self) -> Option<VideoMetadata> {
        if self.error.is_some() {
            return None;
        }
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(VideoMetadata {
            title,
            author_name: self.author_name.unwrap_or_default(),
        })
    }
}

/// oEmbed lookup through noembed.com, which needs no credentials.
pub struct NoembedClient {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for NoembedClient {
    fn default() -> Self {
        Self::new(NOEMBED_ENDPOINT)
    }
}

impl NoembedClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MetadataSource for NoembedClient {
    async fn lookup(&self, url: &str) -> Result<Option<VideoMetadata>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await?
            .json::<OEmbedResponse>()
            .await?;

        if let Some(error) = &response.error {
            debug!(url, error = %error, "oEmbed lookup returned an error");
        }

        Ok(response.into_metadata())
    }
}

/// Fail-open wrapper: any lookup failure is logged and treated as "no metadata".
pub async fn fetch_metadata(source: &dyn MetadataSource, url: &str) -> Option<VideoMetadata> {
    match source.lookup(url).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(url, error = %e, "failed to fetch video metadata");
            None
        }
    }
}
