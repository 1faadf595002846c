//! Triage scoring for crawled resources.
//!
//! - [`analytics`] — the [`AnalyticsProvider`] seam and bundled providers
//! - [`classifier`] — the archive / convert / priority rule table
//! - [`aggregate`] — report ordering, summaries and views

pub mod aggregate;
pub mod analytics;
pub mod classifier;

pub use aggregate::{TriageReport, TriageSummary, TriageView, aggregate};
pub use analytics::{AnalyticsProvider, FixedAnalytics, SimulatedAnalytics, provider_from_config};
pub use classifier::{classify, triage};
