//! Rule table turning a resource and its analytics signal into a
//! recommendation.
//!
//! The three verdicts are independent. `reason` is a single string that
//! each firing rule overwrites, in the order archive, convert, priority.

use sitetriage_shared::{
    Recommendation, RemediationPriority, Resource, ResourceKind, Signal, TriageRecord,
};

use crate::analytics::AnalyticsProvider;

/// Resources nested deeper than this are archive candidates.
const ARCHIVE_DEPTH: u32 = 5;
/// Resources with fewer views than this are archive candidates.
const ARCHIVE_MIN_VIEWS: u64 = 10;
/// PDFs above this many views should become HTML; also the Medium threshold.
const MODERATE_VIEWS: u64 = 100;
const PDF_HIGH_VIEWS: u64 = 500;
const PAGE_HIGH_VIEWS: u64 = 1000;

/// Classify one resource. Pure: same inputs, same output.
pub fn classify(resource: &Resource, signal: Signal) -> Recommendation {
    let views = signal.view_count;
    let depth = resource.depth;
    let mut rec = Recommendation::default();

    if depth > ARCHIVE_DEPTH || views < ARCHIVE_MIN_VIEWS {
        rec.archive = true;
        rec.reason = format!(
            "Low view count ({views}) and deep nesting (depth {depth}). Consider archiving."
        );
    }

    if resource.kind == ResourceKind::Pdf && views > MODERATE_VIEWS {
        rec.convert_to_html = true;
        rec.reason = format!(
            "High view count ({views}). Consider converting to HTML for better accessibility."
        );
    }

    match resource.kind {
        ResourceKind::Pdf => {
            if views > PDF_HIGH_VIEWS {
                rec.remediation_priority = RemediationPriority::High;
                rec.reason =
                    format!("High view count ({views}). High priority for PDF remediation.");
            } else if views > MODERATE_VIEWS {
                rec.remediation_priority = RemediationPriority::Medium;
                rec.reason =
                    format!("Moderate view count ({views}). Medium priority for PDF remediation.");
            } else {
                rec.remediation_priority = RemediationPriority::Low;
                rec.reason =
                    format!("Lower view count ({views}). Lower priority for PDF remediation.");
            }
        }
        ResourceKind::Page => {
            if views > PAGE_HIGH_VIEWS {
                rec.remediation_priority = RemediationPriority::High;
                rec.reason =
                    format!("Very high view count ({views}). High priority for page remediation.");
            } else if views > MODERATE_VIEWS {
                rec.remediation_priority = RemediationPriority::Medium;
                rec.reason = format!(
                    "Moderate view count ({views}). Medium priority for page remediation."
                );
            }
        }
    }

    rec
}

/// Look up the signal for `resource` and build its full record.
pub fn triage(resource: &Resource, analytics: &dyn AnalyticsProvider) -> TriageRecord {
    let signal = analytics.signal(&resource.url);
    TriageRecord {
        url: resource.url.clone(),
        kind: resource.kind,
        depth: resource.depth,
        view_count: signal.view_count,
        accessibility_score: signal.accessibility_score,
        recommendation: classify(resource, signal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::FixedAnalytics;

    fn page(depth: u32) -> Resource {
        Resource::new("https://example.com/p", depth, ResourceKind::Page)
    }

    fn pdf(depth: u32) -> Resource {
        Resource::new("https://example.com/d.pdf", depth, ResourceKind::Pdf)
    }

    fn views(n: u64) -> Signal {
        Signal {
            view_count: n,
            accessibility_score: 0,
        }
    }

    #[test]
    fn very_popular_page_is_high_priority() {
        let rec = classify(&page(1), views(5000));
        assert_eq!(rec.remediation_priority, RemediationPriority::High);
        assert!(!rec.archive);
        assert!(!rec.convert_to_html);
        assert_eq!(
            rec.reason,
            "Very high view count (5000). High priority for page remediation."
        );
    }

    #[test]
    fn modest_page_has_no_priority_and_archives_only_when_deep() {
        let shallow = classify(&page(2), views(50));
        assert_eq!(shallow.remediation_priority, RemediationPriority::None);
        assert!(!shallow.archive);
        assert_eq!(shallow.reason, "");

        let deep = classify(&page(6), views(50));
        assert_eq!(deep.remediation_priority, RemediationPriority::None);
        assert!(deep.archive);
        assert!(deep.reason.starts_with("Low view count (50) and deep nesting (depth 6)"));
    }

    #[test]
    fn page_thresholds_are_strict() {
        assert_eq!(classify(&page(0), views(1000)).remediation_priority, RemediationPriority::Medium);
        assert_eq!(classify(&page(0), views(1001)).remediation_priority, RemediationPriority::High);
        assert_eq!(classify(&page(0), views(100)).remediation_priority, RemediationPriority::None);
        assert_eq!(classify(&page(0), views(101)).remediation_priority, RemediationPriority::Medium);
    }

    #[test]
    fn unvisited_resources_are_archived() {
        assert!(classify(&page(0), views(9)).archive);
        assert!(!classify(&page(0), views(10)).archive);
        assert!(classify(&page(5), views(0)).archive);
        assert!(!classify(&page(5), views(5000)).archive);
    }

    #[test]
    fn pdf_priority_ladder() {
        let high = classify(&pdf(1), views(501));
        assert_eq!(high.remediation_priority, RemediationPriority::High);
        assert!(high.convert_to_html);

        let medium = classify(&pdf(1), views(500));
        assert_eq!(medium.remediation_priority, RemediationPriority::Medium);
        assert!(medium.convert_to_html);

        let low = classify(&pdf(1), views(100));
        assert_eq!(low.remediation_priority, RemediationPriority::Low);
        assert!(!low.convert_to_html);
    }

    #[test]
    fn last_rule_owns_the_reason() {
        // Deep, heavily viewed PDF: archive, convert and priority all fire.
        let rec = classify(&pdf(7), views(800));
        assert!(rec.archive);
        assert!(rec.convert_to_html);
        assert_eq!(rec.remediation_priority, RemediationPriority::High);
        assert_eq!(rec.reason, "High view count (800). High priority for PDF remediation.");

        // A rarely viewed PDF still gets the low-priority reason, not archive's.
        let rec = classify(&pdf(1), views(3));
        assert!(rec.archive);
        assert_eq!(rec.reason, "Lower view count (3). Lower priority for PDF remediation.");
    }

    #[test]
    fn classify_is_pure() {
        for n in [0, 9, 10, 100, 101, 500, 501, 1000, 1001, 9999] {
            for r in [page(0), page(6), pdf(1), pdf(7)] {
                assert_eq!(classify(&r, views(n)), classify(&r, views(n)));
            }
        }
    }

    #[test]
    fn triage_copies_signal_into_record() {
        let analytics = FixedAnalytics::new(0, 0)
            .with_views("https://example.com/d.pdf", 200)
            .with_score("https://example.com/d.pdf", 61);
        let record = triage(&pdf(2), &analytics);

        assert_eq!(record.url, "https://example.com/d.pdf");
        assert_eq!(record.kind, ResourceKind::Pdf);
        assert_eq!(record.depth, 2);
        assert_eq!(record.view_count, 200);
        assert_eq!(record.accessibility_score, 61);
        assert_eq!(record.recommendation.remediation_priority, RemediationPriority::Medium);
    }
}
