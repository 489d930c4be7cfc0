use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::PageSource;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};

/// The source site rejects requests without a browser-like user agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP page source backed by a pooled `reqwest` client.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Self::new(&config.user_agent, config.timeout())
    }
}

#[async_trait]
impl PageSource for RequestFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // pages are always UTF-8, whatever the headers claim
        let body = response.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
