use crate::scrapers::error::ScrapeError;

/// Anything that can turn a listing URL into page HTML.
/// Each worker thread owns its own fetcher, so implementations need not be `Sync`.
pub trait PageFetcher {
    /// Fetch the page body for `url`
    fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}
