//! Page fetching.
//!
//! The crawler only needs "give me the HTML at this URL, or nothing". Every
//! failure mode (timeout, DNS, non-2xx, redirect loop, oversized body) is
//! logged and collapsed into `None`, which the frontier treats as a page
//! with no outgoing links.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use sitetriage_shared::{CrawlConfig, Result, TriageError};

/// Source of page markup for the crawl frontier.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return its body, or `None` on any failure.
    async fn fetch(&self, url: &str) -> Option<String>;
}

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// `reqwest`-backed fetcher with timeout, redirect and size limits.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Build a fetcher from the crawl config's HTTP policy.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .build()
            .map_err(|e| TriageError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    async fn try_fetch(&self, url: &str) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes {
                return Err(format!(
                    "response too large ({len} bytes, max {})",
                    self.max_body_bytes
                ));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("body read failed: {e}"))?;

        if body.len() as u64 > self.max_body_bytes {
            return Err(format!("response too large ({} bytes)", body.len()));
        }

        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => Some(body),
            Err(error) => {
                debug!(%url, %error, "fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> CrawlConfig {
        CrawlConfig {
            allow_private_hosts: true,
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn fetches_body_with_identifying_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header(
                "user-agent",
                "Mozilla/5.0 (compatible; ADA Compliance Triage Scanner)",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config()).unwrap();
        let body = fetcher.fetch(&server.uri()).await;
        assert_eq!(body.as_deref(), Some("<html>hi</html>"));
    }

    #[tokio::test]
    async fn non_success_status_is_none() {
        let server = MockServer::start().await;
        Mock::given(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config()).unwrap();
        assert!(fetcher.fetch(&format!("{}/missing", server.uri())).await.is_none());
    }

    #[tokio::test]
    async fn timeout_is_none() {
        let server = MockServer::start().await;
        Mock::given(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig {
            timeout: Duration::from_millis(100),
            ..config()
        })
        .unwrap();
        assert!(fetcher.fetch(&format!("{}/slow", server.uri())).await.is_none());
    }

    #[tokio::test]
    async fn redirect_loop_is_none() {
        let server = MockServer::start().await;
        Mock::given(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config()).unwrap();
        assert!(fetcher.fetch(&format!("{}/loop", server.uri())).await.is_none());
    }

    #[tokio::test]
    async fn oversized_body_is_none() {
        let server = MockServer::start().await;
        Mock::given(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(2048)))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig {
            max_body_bytes: 1024,
            ..config()
        })
        .unwrap();
        assert!(fetcher.fetch(&format!("{}/big", server.uri())).await.is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_none() {
        let fetcher = HttpFetcher::new(&CrawlConfig {
            timeout: Duration::from_millis(500),
            ..config()
        })
        .unwrap();
        // Port 9 (discard) on loopback is closed in test environments.
        assert!(fetcher.fetch("http://127.0.0.1:9/").await.is_none());
    }
}
