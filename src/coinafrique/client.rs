//! HTTP client for CoinAfrique requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Browser User-Agents rotated across requests.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Trait for page fetching - enables mocking for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a URL and returns the response body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// CoinAfrique HTTP client with browser-like headers.
///
/// No retries and no delays here; pacing belongs to the crawler.
pub struct CoinAfriqueClient {
    client: Client,
    rng: Mutex<StdRng>,
}

impl CoinAfriqueClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        // wreq does not follow redirects unless asked to.
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .redirect(wreq::redirect::Policy::default());

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, rng: Mutex::new(config.rng()) })
    }

    /// Picks the User-Agent for the next request.
    fn user_agent(&self) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        pick_user_agent(&mut *rng)
    }

    /// Performs a GET request with browser headers.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = self.user_agent();
        debug!("GET {} (UA: {})", url, user_agent);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", user_agent)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Connection", "keep-alive")
            .header("Upgrade-Insecure-Requests", "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Cache-Control", "max-age=0")
            .header("DNT", "1")
            .send()
            .await
            .map_err(|e| FetchError::Network { url: url.to_string(), message: e.to_string() })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            if status == 429 || status == 503 {
                warn!("Throttled ({}). Consider increasing the delay ranges.", status);
            }
            return Err(FetchError::HttpStatus { url: url.to_string(), status: status.as_u16() });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Network { url: url.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl PageFetcher for CoinAfriqueClient {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get(url).await
    }
}

/// Picks one User-Agent uniformly at random.
pub fn pick_user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
}
