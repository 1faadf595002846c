//! Shared types, error model, and configuration for SiteTriage.
//!
//! This crate is the foundation depended on by all other SiteTriage crates.
//! It provides:
//! - [`TriageError`] — the unified error type
//! - Domain types ([`Resource`], [`TriageRecord`], [`Recommendation`])
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnalyticsSection, AppConfig, CrawlConfig, CrawlSection, DEFAULT_USER_AGENT, ServerSection,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{InputError, Result, TriageError};
pub use types::{
    MAX_CRAWL_DEPTH, MAX_RESOURCES, Recommendation, RemediationPriority, Resource, ResourceKind,
    Signal, TriageRecord,
};
