//! Core domain types for crawl resources and triage verdicts.

use serde::{Deserialize, Serialize};

/// Hard ceiling on crawl depth, regardless of config or request.
pub const MAX_CRAWL_DEPTH: u32 = 7;

/// Hard ceiling on the number of resources a single crawl may discover.
pub const MAX_RESOURCES: usize = 1000;

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// What a discovered URL points at, decided syntactically from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Page,
    Pdf,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page or PDF found during a crawl, keyed by its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Canonical URL (no fragment, no trailing slash).
    pub url: String,
    /// Link hops from the seed.
    pub depth: u32,
    /// Page or PDF.
    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(url: impl Into<String>, depth: u32, kind: ResourceKind) -> Self {
        Self {
            url: url.into(),
            depth,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

/// Analytics inputs for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signal {
    pub view_count: u64,
    pub accessibility_score: u32,
}

/// How urgently a resource needs accessibility remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemediationPriority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl RemediationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The independent archive / convert / priority verdicts for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub archive: bool,
    #[serde(rename = "convertToHTML")]
    pub convert_to_html: bool,
    pub remediation_priority: RemediationPriority,
    /// Rationale of the last rule that fired; empty when none did.
    pub reason: String,
}

/// One classified resource as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageRecord {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub depth: u32,
    pub view_count: u64,
    pub accessibility_score: u32,
    #[serde(rename = "recommendations")]
    pub recommendation: Recommendation,
}
