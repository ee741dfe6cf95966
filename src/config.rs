use std::time::Duration;

/// Search endpoint of the ClinicalTrials.gov Data API (v2).
pub const DEFAULT_STUDIES_URL: &str = "https://clinicaltrials.gov/api/v2/studies";

/// Default number of studies requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Configuration for the ClinicalTrials.gov client
#[derive(Debug, Clone)]
pub struct TrialsConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// Timeout applied to each page request
    pub timeout: Duration,
    /// Studies requested per page
    pub page_size: u32,
    /// Studies search endpoint
    pub base_url: String,
}

impl Default for TrialsConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("trialsheet/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: 5,
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
            base_url: DEFAULT_STUDIES_URL.to_string(),
        }
    }
}

impl TrialsConfig {
    /// Creates a new TrialsConfig with custom settings
    ///
    /// # Basic usage
    ///
    /// ```ignore
    /// use trialsheet::{ClinicalTrials, TrialsConfig};
    /// use std::time::Duration;
    ///
    /// let config = TrialsConfig::new("research_tool/1.0", 5, Duration::from_secs(60), None);
    /// let client = ClinicalTrials::with_config(config)?;
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
        base_url: Option<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            rate_limit,
            timeout,
            page_size: DEFAULT_PAGE_SIZE,
            base_url: base_url.unwrap_or_else(|| DEFAULT_STUDIES_URL.to_string()),
        }
    }

    /// Sets the studies requested per page by queries built from this client.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
