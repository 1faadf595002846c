//! End-to-end scan pipeline: request → validate → crawl → classify → report.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::{info, instrument};
use url::Url;
use uuid::Uuid;

use sitetriage_crawler::{CrawlObserver, Crawler, Fetcher, HttpFetcher};
use sitetriage_shared::{AppConfig, CrawlConfig, InputError, MAX_CRAWL_DEPTH, Result, TriageError};
use sitetriage_triage::{AnalyticsProvider, TriageReport, aggregate, provider_from_config, triage};

/// A scan as requested by a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Seed URL; bare domains are accepted.
    #[serde(default)]
    pub url: Option<String>,
    /// Crawl depth, at most 7. Defaults to the configured depth.
    ///
    /// Kept as a raw JSON number so that oversized or fractional values are
    /// judged by [`validate`] instead of failing deserialization.
    #[serde(default)]
    pub max_depth: Option<Number>,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>, max_depth: Option<u32>) -> Self {
        Self {
            url: Some(url.into()),
            max_depth: max_depth.map(Number::from),
        }
    }
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedScan {
    pub seed: Url,
    pub max_depth: u32,
}

/// Check a request the way the HTTP contract demands: URL present, URL
/// parseable (after prefixing `https://` to bare domains), depth ≤ 7.
pub fn validate(request: &ScanRequest, default_depth: u32) -> Result<ValidatedScan> {
    let raw = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(InputError::MissingUrl)?;

    let seed = parse_seed(raw).ok_or(InputError::InvalidUrl)?;

    let max_depth = match &request.max_depth {
        Some(depth) => parse_depth(depth)?,
        None => default_depth,
    };

    Ok(ValidatedScan { seed, max_depth })
}

/// Anything numerically above 7 is too deep; below that the value must be a
/// non-negative whole number (`3` or `3.0`).
fn parse_depth(depth: &Number) -> Result<u32> {
    if let Some(n) = depth.as_u64() {
        return match u32::try_from(n) {
            Ok(n) if n <= MAX_CRAWL_DEPTH => Ok(n),
            _ => Err(InputError::DepthTooLarge.into()),
        };
    }

    let Some(n) = depth.as_f64() else {
        return Err(InputError::MalformedBody.into());
    };
    if n > f64::from(MAX_CRAWL_DEPTH) {
        return Err(InputError::DepthTooLarge.into());
    }
    if n < 0.0 || n.fract() != 0.0 {
        return Err(InputError::MalformedBody.into());
    }
    // 0.0..=7.0 and whole, checked above.
    Ok(n as u32)
}

fn parse_seed(raw: &str) -> Option<Url> {
    let candidate = if has_scheme(raw) {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = Url::parse(&candidate).ok()?;
    let usable = matches!(url.scheme(), "http" | "https") && url.host_str().is_some();
    usable.then_some(url)
}

/// True when `raw` starts with `<scheme>://`, in any letter case.
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Long-lived scan service: owns the HTTP client and analytics provider and
/// runs one independent crawl per request.
#[derive(Clone)]
pub struct Scanner {
    crawl: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    analytics: Arc<dyn AnalyticsProvider>,
    budget: Duration,
}

impl Scanner {
    /// Build a scanner with an HTTP fetcher.
    pub fn new(
        crawl: CrawlConfig,
        analytics: Arc<dyn AnalyticsProvider>,
        budget: Duration,
    ) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&crawl)?);
        Ok(Self {
            crawl,
            fetcher,
            analytics,
            budget,
        })
    }

    /// Build a scanner from the loaded application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let analytics = provider_from_config(&config.analytics)?;
        Self::new(
            CrawlConfig::from(config),
            analytics,
            Duration::from_secs(config.server.scan_budget_secs),
        )
    }

    /// Replace the page source (tests, offline fixtures).
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replace the wall-clock budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Validate, crawl, classify and sort.
    ///
    /// Input problems fail fast with [`TriageError::Validation`]. A crawl
    /// that outlives the budget fails with [`TriageError::Timeout`] and
    /// returns nothing.
    #[instrument(skip_all, fields(scan_id = %Uuid::now_v7()))]
    pub async fn scan(
        &self,
        request: &ScanRequest,
        observer: &dyn CrawlObserver,
    ) -> Result<TriageReport> {
        let scan = validate(request, self.crawl.max_depth)?;

        info!(seed = %scan.seed, max_depth = scan.max_depth, "scan accepted");

        let crawler = Crawler::with_fetcher(
            self.crawl.clone().with_max_depth(scan.max_depth),
            self.fetcher.clone(),
        );

        let outcome = tokio::time::timeout(self.budget, crawler.crawl(&scan.seed, observer))
            .await
            .map_err(|_| TriageError::Timeout {
                secs: self.budget.as_secs(),
            })??;

        let records = outcome
            .resources
            .iter()
            .map(|resource| triage(resource, self.analytics.as_ref()))
            .collect();
        let report = aggregate(records);

        info!(count = report.count, "scan completed");
        Ok(report)
    }
}
