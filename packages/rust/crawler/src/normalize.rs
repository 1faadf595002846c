//! URL canonicalization and same-site scoping.
//!
//! Every URL that enters the crawl is reduced to a canonical string: resolved
//! against its page, fragment removed, one trailing slash removed. The
//! canonical string is the crawl-node identity.

use sitetriage_shared::ResourceKind;
use url::Url;

/// Why a candidate link was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `#anchor` links point back into the same page.
    Fragment,
    /// `javascript:`, `mailto:`, `tel:`, `ftp:` and friends.
    UnsupportedScheme,
    /// Could not be resolved into a URL with a host.
    Malformed,
    /// Host is neither the seed host nor one of its subdomains.
    OutOfScope,
}

/// A link that survived normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical URL string.
    pub url: String,
    pub kind: ResourceKind,
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The set of hosts a crawl may touch: the seed host and its subdomains.
#[derive(Debug, Clone)]
pub struct Scope {
    host: String,
}

impl Scope {
    /// Scope anchored at the seed's host. `None` for host-less URLs.
    pub fn from_seed(seed: &Url) -> Option<Self> {
        seed.host_str().map(|host| Self {
            host: host.to_ascii_lowercase(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `host == seed || host.ends_with("." + seed)`.
    pub fn contains(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        host == self.host
            || host
                .strip_suffix(self.host.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Resolve `raw` against `base`, reject anything unusable, and canonicalize.
pub fn normalize(raw: &str, base: &Url, scope: &Scope) -> Result<Candidate, Rejection> {
    let raw = raw.trim();

    if raw.starts_with('#') {
        return Err(Rejection::Fragment);
    }

    let resolved = base.join(raw).map_err(|_| Rejection::Malformed)?;

    if !is_http(&resolved) {
        return Err(Rejection::UnsupportedScheme);
    }
    if resolved.host_str().is_none() {
        return Err(Rejection::Malformed);
    }
    if !scope.contains(&resolved) {
        return Err(Rejection::OutOfScope);
    }

    let url = canonicalize(&resolved);
    let kind = kind_of(&url);
    Ok(Candidate { url, kind })
}

/// Canonical string form: fragment stripped, single trailing slash stripped.
pub fn canonicalize(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    let mut s = String::from(url);
    if s.ends_with('/') {
        s.pop();
    }
    s
}

/// Syntactic PDF detection on a canonical URL.
///
/// The path (or, for download endpoints, the whole URL) ending in `.pdf`
/// marks a PDF. No content-type sniffing happens, so a `.pdf` path serving
/// HTML is still treated as a leaf.
pub fn kind_of(canonical: &str) -> ResourceKind {
    let lower = canonical.to_ascii_lowercase();
    let path_is_pdf = Url::parse(&lower)
        .map(|u| u.path().trim_end_matches('/').ends_with(".pdf"))
        .unwrap_or(false);

    if path_is_pdf || lower.ends_with(".pdf") {
        ResourceKind::Pdf
    } else {
        ResourceKind::Page
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
