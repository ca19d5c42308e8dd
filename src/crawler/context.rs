//! State shared by every worker of a pipeline run

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError};
use crate::extract::SiteMarkup;
use crate::store::{CsvStore, StorePaths};
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Configuration, HTTP client, compiled selectors and store of one run
///
/// Built once at startup and shared by reference-counted pointer with every
/// worker task.
pub struct CrawlContext {
    pub config: Config,
    pub base_url: Url,
    pub markup: SiteMarkup,
    pub store: CsvStore,
    pub paths: StorePaths,
    client: Client,
}

impl CrawlContext {
    /// Builds the context from a validated configuration
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let base_url = Url::parse(&config.site.base_url)?;
        let client = build_http_client(&config.http)?;
        let markup = SiteMarkup::new()?;
        let paths = StorePaths::new(&config.storage);

        Ok(Arc::new(Self {
            config,
            base_url,
            markup,
            store: CsvStore::new(),
            paths,
            client,
        }))
    }

    /// GETs `url` and returns its body
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        tracing::debug!("Fetching {}", url);
        fetch_page(&self.client, url).await
    }
}
