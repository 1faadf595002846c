//! Analytics signal providers.
//!
//! Classification depends on how much traffic a resource gets and how
//! accessible it already is. Those numbers come from an external analytics
//! system; this module defines the seam and the providers that ship with
//! SiteTriage.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use sitetriage_shared::{AnalyticsSection, Result, Signal, TriageError};

/// Upper bound (exclusive) of simulated view counts.
const SIMULATED_MAX_VIEWS: u64 = 10_000;

/// Upper bound (exclusive) of simulated accessibility scores.
const SIMULATED_MAX_SCORE: u64 = 100;

/// Source of per-URL traffic and accessibility numbers.
pub trait AnalyticsProvider: Send + Sync {
    /// Views over the provider's reporting window.
    fn view_count(&self, url: &str) -> u64;

    /// Accessibility score, 0–100.
    fn accessibility_score(&self, url: &str) -> u32;

    /// Both numbers for `url`.
    fn signal(&self, url: &str) -> Signal {
        Signal {
            view_count: self.view_count(url),
            accessibility_score: self.accessibility_score(url),
        }
    }
}

/// Build the provider named in the `[analytics]` config section.
pub fn provider_from_config(section: &AnalyticsSection) -> Result<Arc<dyn AnalyticsProvider>> {
    match section.provider.as_str() {
        "simulated" => Ok(Arc::new(SimulatedAnalytics::new(section.seed.clone()))),
        other => Err(TriageError::config(format!(
            "unknown analytics provider '{other}': expected 'simulated'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// FixedAnalytics
// ---------------------------------------------------------------------------

/// Table-driven provider with a fallback for unknown URLs.
#[derive(Debug, Clone, Default)]
pub struct FixedAnalytics {
    views: HashMap<String, u64>,
    scores: HashMap<String, u32>,
    default_views: u64,
    default_score: u32,
}

impl FixedAnalytics {
    pub fn new(default_views: u64, default_score: u32) -> Self {
        Self {
            default_views,
            default_score,
            ..Self::default()
        }
    }

    pub fn with_views(mut self, url: impl Into<String>, views: u64) -> Self {
        self.views.insert(url.into(), views);
        self
    }

    pub fn with_score(mut self, url: impl Into<String>, score: u32) -> Self {
        self.scores.insert(url.into(), score);
        self
    }
}

impl AnalyticsProvider for FixedAnalytics {
    fn view_count(&self, url: &str) -> u64 {
        self.views.get(url).copied().unwrap_or(self.default_views)
    }

    fn accessibility_score(&self, url: &str) -> u32 {
        self.scores.get(url).copied().unwrap_or(self.default_score)
    }
}

// ---------------------------------------------------------------------------
// SimulatedAnalytics
// ---------------------------------------------------------------------------

/// Stand-in for a real analytics backend.
///
/// Values look random (views in `0..10000`, scores in `0..100`) but are a
/// hash of the seed and URL, so repeated scans of the same site agree.
#[derive(Debug, Clone)]
pub struct SimulatedAnalytics {
    seed: String,
}

impl SimulatedAnalytics {
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    fn draw(&self, metric: &str, url: &str, bound: u64) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update([0]);
        hasher.update(metric.as_bytes());
        hasher.update([0]);
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head) % bound
    }
}

impl AnalyticsProvider for SimulatedAnalytics {
    fn view_count(&self, url: &str) -> u64 {
        self.draw("views", url, SIMULATED_MAX_VIEWS)
    }

    fn accessibility_score(&self, url: &str) -> u32 {
        // Bounded by SIMULATED_MAX_SCORE, always fits.
        self.draw("accessibility", url, SIMULATED_MAX_SCORE) as u32
    }
}
