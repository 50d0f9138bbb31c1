use std::time::Duration;

/// Desktop Chrome, so the site serves the regular listing page
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.90 Safari/537.36";

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

const ACCEPT_LANGUAGE: &str = "en-GB,en-US;q=0.8,en;q=0.6";

/// Settings for a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Number of worker threads (capped to the URL count)
    pub workers: usize,
    /// Per-request timeout; `None` waits forever
    pub timeout: Option<Duration>,
    /// Honour HTTP_PROXY and friends from the environment
    pub use_system_proxy: bool,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            workers: 6,
            timeout: Some(Duration::from_secs(30)),
            use_system_proxy: true,
            user_agent: USER_AGENT.to_string(),
            accept: ACCEPT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
        }
    }
}
