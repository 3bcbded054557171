use crate::parser::{self, SearchResponse};
use crate::types::{DigestError, FetchConfig, FetchKind, Item, Result, SourceSpec};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP fetcher shared by all sources. One client carries the fixed
/// identity header and timeout for every request.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }

    /// Fetch one source and return at most `limit` normalized items. A
    /// transport or decode failure propagates to the caller; there are no
    /// retries.
    pub async fn fetch(&self, spec: &SourceSpec, limit: usize) -> Result<Vec<Item>> {
        debug!("fetching {} from {}", spec.name, spec.url);
        let items = match &spec.kind {
            FetchKind::Feed => self.fetch_feed(spec, limit).await?,
            FetchKind::SearchApi { item_url_base } => {
                self.fetch_search(spec, item_url_base, limit).await?
            }
        };
        info!("fetched {} items from {}", items.len(), spec.name);
        Ok(items)
    }

    async fn fetch_feed(&self, spec: &SourceSpec, limit: usize) -> Result<Vec<Item>> {
        let body = self.get_text(&spec.url).await?;
        parser::items_from_feed(&body, &spec.name, limit)
    }

    async fn fetch_search(
        &self,
        spec: &SourceSpec,
        item_url_base: &str,
        limit: usize,
    ) -> Result<Vec<Item>> {
        let response = self.client.get(&spec.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Status {
                status,
                url: spec.url.clone(),
            });
        }
        let payload: SearchResponse = response.json().await?;
        Ok(parser::items_from_search(
            payload,
            &spec.name,
            item_url_base,
            limit,
        ))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
