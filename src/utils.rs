use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::config::SiteConfig;
use crate::error::{Result, ScrapeError};

// ============================================================================
// FETCHING
// ============================================================================

/// Anything that can turn a URL into page HTML
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with the headers the archive expects
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

// ============================================================================
// DOCUMENT HELPERS
// ============================================================================

/// Parses a previously extracted fragment as its own root document
pub fn parse_sub_document(fragment: &str) -> Html {
    Html::parse_document(&format!("<html><body>{}</body></html>", fragment))
}

/// Compiles a CSS selector taken from configuration
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {:?}", css, e)))
}

/// Element text with every text node trimmed and joined without separator
pub fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
