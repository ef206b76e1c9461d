//! Page fetching for the reaction scraper

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::ScrapeFailure;

/// Source of reaction page HTML
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeFailure>;
}

impl<F> PageFetcher for F
where
    F: Fn(&str) -> Result<String, ScrapeFailure>,
{
    fn fetch(&self, url: &str) -> Result<String, ScrapeFailure> {
        self(url)
    }
}

/// Blocking HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScrapeFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeFailure> {
        debug!(url, "Fetching reaction page");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}
