use crate::models::ListingRecord;
use crate::scrapers::airbnb::extract_listing;
use crate::scrapers::error::ScrapeError;
use crate::scrapers::traits::PageFetcher;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tracing::{debug, info, warn};

/// Split `items` into contiguous chunks, one per worker.
///
/// The worker count is clamped to `1..=items.len()`. Chunk sizes differ by at
/// most one, with the larger chunks first, and concatenating the chunks gives
/// back `items` in order.
pub fn partition<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }

    let workers = workers.clamp(1, items.len());
    let base = items.len() / workers;
    let extra = items.len() % workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut rest = items;
    for index in 0..workers {
        let size = base + usize::from(index < extra);
        let (chunk, tail) = rest.split_at(size);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Fetch, parse and extract a single URL. Failures become an empty record.
pub fn scrape_one<F: PageFetcher>(fetcher: &F, url: &str) -> ListingRecord {
    match fetcher.fetch(url).and_then(|html| extract_listing(&html)) {
        Ok(details) => {
            debug!(url = %url, missing = details.missing_fields().len(), "Scraped listing");
            ListingRecord::scraped(url, details)
        }
        Err(e) => {
            let stage = if e.is_fetch_failure() { "fetch" } else { "parse" };
            warn!(url = %url, stage, error = %e, "Scrape failed");
            ListingRecord::failed(url, &e)
        }
    }
}

/// Scrape every URL across `workers` threads, one record per URL in input order.
///
/// Each thread builds its own fetcher with `make_fetcher` and works through its
/// chunk sequentially. All threads are joined before returning.
pub fn scrape_all<F, M>(
    urls: &[String],
    workers: usize,
    make_fetcher: M,
) -> Result<Vec<ListingRecord>, ScrapeError>
where
    F: PageFetcher,
    M: Fn() -> Result<F, ScrapeError> + Sync,
{
    let chunks = partition(urls, workers);
    info!(urls = urls.len(), workers = chunks.len(), "Dispatching scrape");

    let make_fetcher = &make_fetcher;
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(chunks.len());
        for (index, &chunk) in chunks.iter().enumerate() {
            let handle = thread::Builder::new()
                .name(format!("scraper-{index}"))
                .spawn_scoped(scope, move || run_chunk(index, chunk, make_fetcher))
                .map_err(ScrapeError::Spawn)?;
            handles.push((chunk, handle));
        }

        let mut records = Vec::with_capacity(urls.len());
        for (index, (chunk, handle)) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(chunk_records) => records.extend(chunk_records),
                Err(_) => {
                    warn!(worker = index, urls = chunk.len(), "Worker panicked, chunk lost");
                    records.extend(
                        chunk
                            .iter()
                            .map(|url| ListingRecord::failed(url, ScrapeError::WorkerPanicked)),
                    );
                }
            }
        }
        Ok(records)
    })
}

fn run_chunk<F, M>(worker: usize, urls: &[String], make_fetcher: &M) -> Vec<ListingRecord>
where
    F: PageFetcher,
    M: Fn() -> Result<F, ScrapeError>,
{
    debug!(worker, urls = urls.len(), "Worker started");

    let fetcher = match make_fetcher() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            warn!(worker, error = %e, "Could not set up fetcher");
            return urls.iter().map(|url| ListingRecord::failed(url, &e)).collect();
        }
    };

    let records: Vec<ListingRecord> = urls
        .iter()
        .map(|url| {
            panic::catch_unwind(AssertUnwindSafe(|| scrape_one(&fetcher, url))).unwrap_or_else(
                |payload| {
                    let message = panic_message(payload.as_ref());
                    warn!(worker, url = %url, panic = %message, "Scrape panicked");
                    ListingRecord::failed(url, ScrapeError::Panicked(message))
                },
            )
        })
        .collect();
    debug!(worker, records = records.len(), "Worker finished");
    records
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
