use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{FetchError, Result};
use crate::models::{Candidate, SourceDescriptor};

use super::extract;

const USER_AGENT_STRING: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Readable text of an article plus the host it was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullPage {
    pub content: String,
    pub source_label: String,
}

/// Anything that can turn a source into headline candidates and an article
/// url into its text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_listing(&self, source: &SourceDescriptor) -> std::result::Result<Vec<Candidate>, FetchError>;

    async fn fetch_full(&self, url: &str) -> std::result::Result<FullPage, FetchError>;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    /// GET a page and return the url it finally resolved to with its body.
    async fn get_page(&self, url: &str) -> std::result::Result<(Url, String), FetchError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok((final_url, body))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_listing(&self, source: &SourceDescriptor) -> std::result::Result<Vec<Candidate>, FetchError> {
        let (page_url, html) = self.get_page(&source.endpoint).await?;
        let candidates = extract::listing_candidates(&html, &page_url, source);
        tracing::debug!(
            source = %source.name,
            strategy = %source.strategy,
            count = candidates.len(),
            "Extracted listing candidates"
        );
        Ok(candidates)
    }

    async fn fetch_full(&self, url: &str) -> std::result::Result<FullPage, FetchError> {
        let (page_url, html) = self.get_page(url).await?;
        let content = extract::article_text(&html).ok_or_else(|| FetchError::NoContent(url.to_string()))?;
        let source_label = page_url.host_str().unwrap_or("Unknown").to_string();
        tracing::debug!(%url, chars = content.chars().count(), "Extracted article content");
        Ok(FullPage { content, source_label })
    }
}
