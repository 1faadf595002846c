//! Bounded breadth-first crawl engine.
//!
//! The crawler starts from a seed URL, walks same-site links breadth first,
//! and records every page and PDF it meets. It stops when the frontier
//! drains or the resource cap is reached. Fetches for a batch run
//! concurrently, but crawl state is only ever mutated here, in FIFO order,
//! so the discovered list is identical to a sequential BFS.

use std::collections::{HashMap, HashSet, VecDeque};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use sitetriage_shared::{CrawlConfig, InputError, Resource, ResourceKind, Result, TriageError};

use crate::fetch::{Fetcher, HttpFetcher};
use crate::links::extract_links;
use crate::normalize::{Scope, canonicalize, kind_of};

// ---------------------------------------------------------------------------
// CrawlOutcome
// ---------------------------------------------------------------------------

/// Everything a completed crawl produced.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Discovered resources in discovery (BFS) order.
    pub resources: Vec<Resource>,
    /// Pages whose markup was fetched successfully.
    pub pages_fetched: usize,
    /// Pages whose fetch failed or was blocked.
    pub fetch_failures: usize,
    /// Candidate links dropped as off-site or unusable.
    pub links_rejected: usize,
    /// Whether the resource cap cut the crawl short.
    pub capped: bool,
    /// Total duration of the crawl.
    pub duration: Duration,
}

/// Progress callbacks for long crawls.
pub trait CrawlObserver: Send + Sync {
    /// A resource was added to the discovered list.
    fn resource_discovered(&self, resource: &Resource, total: usize);
    /// A page fetch finished.
    fn page_fetched(&self, url: &str, ok: bool);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl CrawlObserver for SilentObserver {
    fn resource_discovered(&self, _resource: &Resource, _total: usize) {}
    fn page_fetched(&self, _url: &str, _ok: bool) {}
}

// ---------------------------------------------------------------------------
// CrawlState
// ---------------------------------------------------------------------------

/// Per-crawl frontier, visited set and discovered list.
struct CrawlState {
    visited: HashSet<String>,
    frontier: VecDeque<(String, u32)>,
    discovered: Vec<Resource>,
    max_resources: usize,
}

impl CrawlState {
    fn new(max_resources: usize) -> Self {
        Self {
            visited: HashSet::new(),
            frontier: VecDeque::new(),
            discovered: Vec::new(),
            max_resources,
        }
    }

    fn is_full(&self) -> bool {
        self.discovered.len() >= self.max_resources
    }

    /// Mark visited and append. Refuses duplicates and anything past the cap.
    fn record(&mut self, resource: Resource) -> bool {
        if self.is_full() || self.visited.contains(&resource.url) {
            return false;
        }
        self.visited.insert(resource.url.clone());
        self.discovered.push(resource);
        true
    }
}

// ---------------------------------------------------------------------------
// InFlight
// ---------------------------------------------------------------------------

/// Fetch tasks started for one batch, keyed by URL.
///
/// Dropping it aborts whatever is still running, so a crawl cancelled
/// mid-batch (scan budget expired, cap reached) leaves no stray requests.
#[derive(Default)]
struct InFlight(HashMap<String, JoinHandle<Option<String>>>);

impl InFlight {
    /// Wait for the fetch of `url`, if one was started.
    ///
    /// The handle stays in the map while awaited so cancellation still
    /// reaches it.
    async fn take(
        &mut self,
        url: &str,
    ) -> Option<std::result::Result<Option<String>, tokio::task::JoinError>> {
        let joined = (self.0.get_mut(url)?).await;
        self.0.remove(url);
        Some(joined)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        for handle in self.0.values() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Crawler
// ---------------------------------------------------------------------------

/// Breadth-first same-site crawler.
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Crawler {
    /// Create a crawler that fetches over HTTP.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a crawler around any [`Fetcher`].
    pub fn with_fetcher(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Crawl from `seed`, returning every discovered resource.
    ///
    /// Per-page fetch failures never fail the crawl; the only errors are a
    /// seed without a host and a fetch task that panicked.
    #[instrument(skip_all, fields(seed = %seed, max_depth = self.config.max_depth))]
    pub async fn crawl(&self, seed: &Url, observer: &dyn CrawlObserver) -> Result<CrawlOutcome> {
        let start_time = Instant::now();

        let scope = Scope::from_seed(seed).ok_or(InputError::InvalidUrl)?;
        let max_depth = self.config.max_depth;
        let batch_size = self.config.concurrency.max(1) as usize;

        let mut state = CrawlState::new(self.config.max_resources);
        state.frontier.push_back((canonicalize(seed), 0));

        let mut pages_fetched = 0usize;
        let mut fetch_failures = 0usize;
        let mut links_rejected = 0usize;

        info!(
            host = scope.host(),
            max_resources = self.config.max_resources,
            concurrency = batch_size,
            "starting crawl"
        );

        while !state.frontier.is_empty() && !state.is_full() {
            let batch: Vec<(String, u32)> = {
                let drain_count = state.frontier.len().min(batch_size);
                state.frontier.drain(..drain_count).collect()
            };

            // Start fetches for every batch entry that will need one.
            let mut handles = InFlight::default();
            for (url, depth) in &batch {
                if state.visited.contains(url)
                    || handles.0.contains_key(url)
                    || *depth >= max_depth
                    || kind_of(url) == ResourceKind::Pdf
                {
                    continue;
                }
                if !self.config.allow_private_hosts && is_private_target(url) {
                    warn!(%url, "private network target, not fetching");
                    continue;
                }

                let fetcher = self.fetcher.clone();
                let rate_limit = self.config.rate_limit_ms;
                let target = url.clone();

                handles.0.insert(
                    url.clone(),
                    tokio::spawn(async move {
                        if rate_limit > 0 {
                            tokio::time::sleep(Duration::from_millis(rate_limit)).await;
                        }
                        debug!(url = %target, "fetching page");
                        fetcher.fetch(&target).await
                    }),
                );
            }

            // Apply results strictly in queue order.
            for (url, depth) in batch {
                if depth > max_depth || state.visited.contains(&url) {
                    continue;
                }

                let kind = kind_of(&url);
                if !state.record(Resource::new(url.clone(), depth, kind)) {
                    break;
                }
                if let Some(resource) = state.discovered.last() {
                    observer.resource_discovered(resource, state.discovered.len());
                }

                if kind == ResourceKind::Pdf || depth >= max_depth {
                    continue;
                }

                let body = match handles.take(&url).await {
                    Some(joined) => {
                        joined.map_err(|e| TriageError::internal(format!("fetch task failed: {e}")))?
                    }
                    None => None,
                };

                let Some(html) = body else {
                    fetch_failures += 1;
                    observer.page_fetched(&url, false);
                    continue;
                };
                pages_fetched += 1;
                observer.page_fetched(&url, true);

                let Ok(page_url) = Url::parse(&url) else {
                    warn!(%url, "canonical URL no longer parses, skipping its links");
                    continue;
                };

                let links = extract_links(&html, &page_url, &scope);
                links_rejected += links.rejected.len();
                debug!(
                    %url,
                    pages = links.pages.len(),
                    pdfs = links.pdfs.len(),
                    rejected = links.rejected.len(),
                    "extracted links"
                );

                // PDFs are leaves: record them now, never enqueue.
                for pdf in links.pdfs {
                    if state.visited.contains(&pdf) {
                        continue;
                    }
                    if state.record(Resource::new(pdf, depth + 1, ResourceKind::Pdf)) {
                        if let Some(resource) = state.discovered.last() {
                            observer.resource_discovered(resource, state.discovered.len());
                        }
                    }
                }

                for page in links.pages {
                    if !state.visited.contains(&page) && !state.is_full() {
                        state.frontier.push_back((page, depth + 1));
                    }
                }
            }
        }

        let outcome = CrawlOutcome {
            capped: state.is_full(),
            resources: state.discovered,
            pages_fetched,
            fetch_failures,
            links_rejected,
            duration: start_time.elapsed(),
        };

        info!(
            resources = outcome.resources.len(),
            pages_fetched = outcome.pages_fetched,
            fetch_failures = outcome.fetch_failures,
            links_rejected = outcome.links_rejected,
            capped = outcome.capped,
            duration_ms = outcome.duration.as_millis(),
            "crawl completed"
        );

        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Private-network guard
// ---------------------------------------------------------------------------

/// Check if a URL targets loopback, private or otherwise internal hosts.
fn is_private_target(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return true;
    };

    match url.host() {
        Some(url::Host::Ipv4(v4)) => is_private_ip(&IpAddr::V4(v4)),
        Some(url::Host::Ipv6(v6)) => is_private_ip(&IpAddr::V6(v6)),
        Some(url::Host::Domain(host)) => {
            host == "localhost"
                || host.ends_with(".localhost")
                || host.ends_with(".local")
                || host.ends_with(".internal")
        }
        None => true,
    }
}

/// Check if an IP is in a private/reserved range.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                // 100.64.0.0/10 (Carrier-grade NAT)
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                // fe80::/10 link local
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}
