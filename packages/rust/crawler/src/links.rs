//! Fault-tolerant link extraction from untrusted markup.
//!
//! Crawl targets are third-party pages that may be arbitrarily broken, so
//! instead of building a DOM we scan for `href="…"` attributes. A page that
//! cannot be understood simply yields fewer links.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use sitetriage_shared::ResourceKind;
use tracing::debug;
use url::Url;

use crate::normalize::{Rejection, Scope, normalize};

/// `href = "…"` or `href='…'`, any case, attribute value without quotes.
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']+)["']"#).expect("href pattern compiles")
});

/// Same-site links found on one page, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Canonical URLs of HTML pages.
    pub pages: Vec<String>,
    /// Canonical URLs of PDF documents.
    pub pdfs: Vec<String>,
    /// Why each dropped candidate was dropped, in markup order.
    pub rejected: Vec<Rejection>,
}

impl ExtractedLinks {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.pdfs.is_empty()
    }
}

/// Extract and classify every in-scope link from `markup`.
pub fn extract_links(markup: &str, page_url: &Url, scope: &Scope) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();
    let mut seen = HashSet::new();

    for caps in HREF_RE.captures_iter(markup) {
        let raw = decode_entities(&caps[1]);

        let candidate = match normalize(&raw, page_url, scope) {
            Ok(c) => c,
            Err(rejection) => {
                debug!(?rejection, %raw, page = %page_url, "dropped link");
                links.rejected.push(rejection);
                continue;
            }
        };

        if !seen.insert(candidate.url.clone()) {
            continue;
        }

        match candidate.kind {
            ResourceKind::Pdf => links.pdfs.push(candidate.url),
            ResourceKind::Page => links.pages.push(candidate.url),
        }
    }

    links
}

/// Undo the entity escaping commonly found inside attribute values.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&amp;", "&")
        .replace("&#38;", "&")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/start").unwrap()
    }

    fn scope() -> Scope {
        Scope::from_seed(&Url::parse("https://example.com").unwrap()).unwrap()
    }

    #[test]
    fn splits_pages_and_pdfs() {
        let html = r#"<a href="/doc.pdf">Doc</a> <a href="https://other.com/x">Off</a>
            <a href="/about">About</a>"#;
        let links = extract_links(html, &base(), &scope());

        assert_eq!(links.pdfs, vec!["https://example.com/doc.pdf"]);
        assert_eq!(links.pages, vec!["https://example.com/about"]);
        assert_eq!(links.rejected, vec![Rejection::OutOfScope]);
    }

    #[test]
    fn dedups_within_a_page() {
        let html = r#"<a href="/a">1</a><a href="/a/">2</a><a href="/a#x">3</a>
            <A HREF='/b'>4</A><a href = "/a">5</a>"#;
        let links = extract_links(html, &base(), &scope());
        assert_eq!(
            links.pages,
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn drops_special_schemes_silently() {
        let html = r##"<a href="javascript:alert(1)">x</a><a href="mailto:a@b.c">m</a>
            <a href="tel:123">t</a><a href="#top">top</a>"##;
        let links = extract_links(html, &base(), &scope());
        assert!(links.is_empty());
        assert_eq!(
            links.rejected,
            vec![
                Rejection::UnsupportedScheme,
                Rejection::UnsupportedScheme,
                Rejection::UnsupportedScheme,
                Rejection::Fragment,
            ]
        );
    }

    #[test]
    fn keeps_the_reason_for_each_dropped_link() {
        let html = r#"<a href="https://elsewhere.org/">p</a><a href="ftp://example.com/f">f</a>
            <a href="http://[::1">bad</a><a href="/kept">k</a>"#;
        let links = extract_links(html, &base(), &scope());

        assert_eq!(links.pages, vec!["https://example.com/kept"]);
        assert_eq!(
            links.rejected,
            vec![
                Rejection::OutOfScope,
                Rejection::UnsupportedScheme,
                Rejection::Malformed,
            ]
        );
    }

    #[test]
    fn tolerates_broken_markup() {
        let html = r#"<div><a href="/ok">ok</a><p <<< href="/also-ok" <a href=">
            <a href="/unterminated"#;
        let links = extract_links(html, &base(), &scope());
        assert!(links.pages.contains(&"https://example.com/ok".to_string()));
        assert!(links.pages.contains(&"https://example.com/also-ok".to_string()));
    }

    #[test]
    fn picks_up_non_anchor_hrefs() {
        // <link> and <area> count too; the scan is attribute-based.
        let html = r#"<link rel="alternate" href="/feed"><area href="/map.PDF">"#;
        let links = extract_links(html, &base(), &scope());
        assert_eq!(links.pages, vec!["https://example.com/feed"]);
        assert_eq!(links.pdfs, vec!["https://example.com/map.PDF"]);
    }

    #[test]
    fn decodes_ampersands_in_queries() {
        let html = r#"<a href="/search?q=a&amp;page=2">next</a>"#;
        let links = extract_links(html, &base(), &scope());
        assert_eq!(links.pages, vec!["https://example.com/search?q=a&page=2"]);
    }

    #[test]
    fn empty_markup_yields_nothing() {
        let links = extract_links("", &base(), &scope());
        assert_eq!(links, ExtractedLinks::default());
    }
}
