use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use scraper::Html;
use tokio::time::sleep;

use crate::error::Result;

mod request;

pub use request::{RequestFetcher, DEFAULT_USER_AGENT};

/// Anything that can hand back the HTML body of a URL
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

/// A parsed recipe page. Owned by the extraction pass that consumes it.
#[derive(Debug)]
pub struct RawPage {
    url: String,
    document: Html,
}

impl RawPage {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }
}

/// Fetch one page after waiting `delay`. A zero delay fetches immediately.
pub async fn fetch_page(source: &dyn PageSource, url: &str, delay: Duration) -> Result<RawPage> {
    if !delay.is_zero() {
        debug!("Waiting {:?} before fetching {}", delay, url);
        sleep(delay).await;
    }

    let html = source.fetch_html(url).await?;
    debug!("Fetched {} ({} bytes)", url, html.len());
    Ok(RawPage::parse(url, &html))
}
