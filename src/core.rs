use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::num::NonZeroU32;
use std::sync::Arc;

use super::config::TrialsConfig;
use super::error::{Result, TrialsError};

const PREVIEW_CHARS: usize = 200;

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone)]
pub struct ClinicalTrials {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter in front of every request
    pub(crate) rate_limiter: Arc<Governor>,

    /// Studies search endpoint
    pub(crate) studies_url: String,

    /// Studies requested per page
    pub(crate) page_size: u32,
}

/// HTTP client for the ClinicalTrials.gov Data API.
///
/// Every request waits on a token bucket before it is sent and is bounded by the
/// configured timeout. A request is attempted exactly once: non-success statuses
/// surface as [`TrialsError::HttpStatus`] and transport failures as
/// [`TrialsError::Network`], leaving the decision of what to do with a failed
/// page to the caller.
///
/// # Examples
///
/// ```rust
/// # use trialsheet::ClinicalTrials;
/// let client = ClinicalTrials::new("my_app/1.0 (my@email.com)")?;
/// # Ok::<(), trialsheet::TrialsError>(())
/// ```
impl ClinicalTrials {
    /// Creates a client with the default endpoint, timeout and rate limit.
    pub fn new(user_agent: &str) -> Result<Self> {
        let config = TrialsConfig {
            user_agent: user_agent.to_string(),
            ..TrialsConfig::default()
        };
        Self::with_config(config)
    }

    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrialsError::Config` if the user agent is malformed, the rate limit
    /// is zero, or the HTTP client cannot be built.
    pub fn with_config(config: TrialsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| TrialsError::Config(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TrialsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(config.rate_limit).ok_or_else(|| {
                TrialsError::Config("Rate limit must be greater than zero".to_string())
            })?,
        )));

        Ok(ClinicalTrials {
            client,
            rate_limiter,
            studies_url: config.base_url,
            page_size: config.page_size,
        })
    }

    /// Fetches text content from a URL.
    ///
    /// # Errors
    ///
    /// * `TrialsError::Network` - transport failure or timeout
    /// * `TrialsError::HttpStatus` - any non-2xx status, with a preview of the body
    pub async fn get(&self, url: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            return response.text().await.map_err(TrialsError::Network);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());

        Err(TrialsError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
            preview: body.chars().take(PREVIEW_CHARS).collect(),
        })
    }

    /// Returns the studies search endpoint.
    pub fn studies_url(&self) -> &str {
        &self.studies_url
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
