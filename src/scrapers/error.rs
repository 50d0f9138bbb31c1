use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid value for header {name}: {source}")]
    InvalidHeader {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("unparsable page: {0}")]
    Parse(String),

    #[error("scrape panicked: {0}")]
    Panicked(String),

    #[error("worker thread panicked")]
    WorkerPanicked,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl ScrapeError {
    /// True for failures reaching the listing page
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ScrapeError::Request { .. } | ScrapeError::Status { .. })
    }
}
