//! Same-site crawler: URL normalization, link extraction, fetching, and the
//! bounded BFS frontier.
//!
//! This crate provides:
//! - [`normalize`] — canonical URLs, scope checks, PDF detection
//! - [`links`] — tolerant `href` extraction from untrusted markup
//! - [`fetch`] — the [`Fetcher`] seam and its `reqwest` implementation
//! - [`engine`] — the depth/volume-bounded [`Crawler`]

pub mod engine;
pub mod fetch;
pub mod links;
pub mod normalize;

pub use engine::{CrawlObserver, CrawlOutcome, Crawler, SilentObserver};
pub use fetch::{Fetcher, HttpFetcher};
pub use links::{ExtractedLinks, extract_links};
pub use normalize::{Candidate, Rejection, Scope, canonicalize, kind_of, normalize};
