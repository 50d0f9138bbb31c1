use crate::scrapers::error::ScrapeError;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::ScrapeConfig;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;

/// Blocking HTTP fetcher. Build one per worker thread.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept-language", &config.accept_language)?,
        );

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(ScrapeError::Client)?;

        Ok(Self { client })
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(value).map_err(|source| ScrapeError::InvalidHeader { name, source })
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url = %url, "Fetching listing page");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| ScrapeError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().map_err(|source| ScrapeError::Request {
            url: url.to_string(),
            source,
        })?;

        debug!(url = %url, bytes = html.len(), "Downloaded listing page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    /// Loopback tests must not be routed through a proxy from the environment
    fn direct_config() -> ScrapeConfig {
        ScrapeConfig {
            use_system_proxy: false,
            ..Default::default()
        }
    }

    /// Serve a single canned response on loopback and hand back the raw request
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{addr}/rooms/1"), rx)
    }

    #[test]
    fn returns_body_on_success() {
        let (url, requests) = serve_once("200 OK", "<html><h1>Hi</h1></html>");
        let fetcher = HttpFetcher::new(&direct_config()).unwrap();

        let html = fetcher.fetch(&url).unwrap();

        assert_eq!(html, "<html><h1>Hi</h1></html>");
        let request = requests.recv().unwrap().to_lowercase();
        assert!(request.starts_with("get /rooms/1 "));
        assert!(request.contains("user-agent: mozilla/5.0"));
        assert!(request.contains("accept-language: en-gb"));
    }

    #[test]
    fn non_success_status_is_a_fetch_failure() {
        let (url, _requests) = serve_once("404 Not Found", "gone");
        let fetcher = HttpFetcher::new(&direct_config()).unwrap();

        let err = fetcher.fetch(&url).unwrap_err();

        assert!(err.is_fetch_failure());
        assert!(matches!(err, ScrapeError::Status { status: 404, .. }));
    }

    #[test]
    fn unreachable_host_is_a_fetch_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fetcher = HttpFetcher::new(&direct_config()).unwrap();

        let err = fetcher.fetch(&format!("http://{addr}/rooms/1")).unwrap_err();

        assert!(matches!(err, ScrapeError::Request { .. }));
    }

    #[test]
    fn rejects_invalid_header_values() {
        let config = ScrapeConfig {
            accept_language: "en\nGB".to_string(),
            ..direct_config()
        };

        let err = HttpFetcher::new(&config).err().unwrap();

        assert!(matches!(
            err,
            ScrapeError::InvalidHeader {
                name: "accept-language",
                ..
            }
        ));
    }

    #[test]
    fn silent_server_times_out() {
        // Connections queue in the backlog but nothing ever answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ScrapeConfig {
            timeout: Some(Duration::from_secs(1)),
            ..direct_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();

        let err = fetcher.fetch(&format!("http://{addr}/rooms/1")).unwrap_err();

        assert!(err.is_fetch_failure());
        match err {
            ScrapeError::Request { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected a request timeout, got {other}"),
        }
        drop(listener);
    }
}
