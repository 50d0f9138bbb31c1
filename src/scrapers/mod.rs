pub mod airbnb;
pub mod counts;
pub mod dispatch;
pub mod error;
pub mod fetcher;
pub mod traits;
pub mod types;

pub use dispatch::scrape_all;
pub use fetcher::HttpFetcher;
pub use types::ScrapeConfig;
