//! Scan orchestration for SiteTriage.
//!
//! This crate ties together request validation, crawling and triage into the
//! single end-to-end workflow behind every surface ([`Scanner::scan`]).

pub mod pipeline;

pub use pipeline::{ScanRequest, Scanner, ValidatedScan, validate};
