//! Ordering, counting and filtering of triage records.

use serde::{Deserialize, Serialize};
use sitetriage_shared::{RemediationPriority, TriageRecord};

/// Sorted records plus their count, as returned by a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageReport {
    pub results: Vec<TriageRecord>,
    pub count: usize,
}

/// Sort by view count, most viewed first. Ties keep discovery order.
pub fn aggregate(mut records: Vec<TriageRecord>) -> TriageReport {
    // `sort_by` is stable, which is what keeps ties in discovery order.
    records.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    let count = records.len();
    TriageReport {
        results: records,
        count,
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Headline counters for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageSummary {
    pub total: usize,
    pub archive: usize,
    pub convert: usize,
    pub high_priority: usize,
}

impl TriageSummary {
    pub fn from_records(records: &[TriageRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut acc, r| {
                let rec = &r.recommendation;
                acc.archive += usize::from(rec.archive);
                acc.convert += usize::from(rec.convert_to_html);
                acc.high_priority +=
                    usize::from(rec.remediation_priority == RemediationPriority::High);
                acc
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Subsets of a report a reviewer typically works through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageView {
    #[default]
    All,
    Archive,
    Convert,
    Remediate,
}

impl TriageView {
    pub fn matches(&self, record: &TriageRecord) -> bool {
        let rec = &record.recommendation;
        match self {
            Self::All => true,
            Self::Archive => rec.archive,
            Self::Convert => rec.convert_to_html,
            Self::Remediate => rec.remediation_priority != RemediationPriority::None,
        }
    }

    /// Records of `report` in this view, order preserved.
    pub fn filter<'a>(&self, report: &'a TriageReport) -> Vec<&'a TriageRecord> {
        report.results.iter().filter(|r| self.matches(r)).collect()
    }
}

impl std::str::FromStr for TriageView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "archive" => Ok(Self::Archive),
            "convert" => Ok(Self::Convert),
            "remediate" => Ok(Self::Remediate),
            other => Err(format!(
                "unknown view '{other}': expected all, archive, convert, or remediate"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitetriage_shared::{Recommendation, ResourceKind};

    fn record(url: &str, views: u64, rec: Recommendation) -> TriageRecord {
        TriageRecord {
            url: url.into(),
            kind: ResourceKind::Page,
            depth: 1,
            view_count: views,
            accessibility_score: 80,
            recommendation: rec,
        }
    }

    fn plain(url: &str, views: u64) -> TriageRecord {
        record(url, views, Recommendation::default())
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let report = aggregate(vec![
            plain("a", 10),
            plain("b", 500),
            plain("c", 10),
            plain("d", 500),
            plain("e", 0),
        ]);

        let order: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c", "e"]);
        assert_eq!(report.count, 5);
    }

    #[test]
    fn empty_input_gives_empty_report() {
        assert_eq!(aggregate(Vec::new()), TriageReport::default());
    }

    #[test]
    fn report_serializes_results_and_count() {
        let json = serde_json::to_value(aggregate(vec![plain("a", 1)])).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["results"][0]["url"], "a");
    }

    #[test]
    fn summary_and_views() {
        let report = aggregate(vec![
            record(
                "archive-me",
                1,
                Recommendation {
                    archive: true,
                    ..Recommendation::default()
                },
            ),
            record(
                "convert-me",
                900,
                Recommendation {
                    convert_to_html: true,
                    remediation_priority: RemediationPriority::High,
                    ..Recommendation::default()
                },
            ),
            record(
                "fix-me",
                300,
                Recommendation {
                    remediation_priority: RemediationPriority::Medium,
                    ..Recommendation::default()
                },
            ),
            plain("fine", 50),
        ]);

        let summary = TriageSummary::from_records(&report.results);
        assert_eq!(
            summary,
            TriageSummary {
                total: 4,
                archive: 1,
                convert: 1,
                high_priority: 1,
            }
        );

        let urls = |view: TriageView| -> Vec<String> {
            view.filter(&report).iter().map(|r| r.url.clone()).collect()
        };
        assert_eq!(urls(TriageView::All).len(), 4);
        assert_eq!(urls(TriageView::Archive), vec!["archive-me"]);
        assert_eq!(urls(TriageView::Convert), vec!["convert-me"]);
        assert_eq!(urls(TriageView::Remediate), vec!["convert-me", "fix-me"]);
    }

    #[test]
    fn view_parses_case_insensitively() {
        assert_eq!("Remediate".parse::<TriageView>(), Ok(TriageView::Remediate));
        assert!("everything".parse::<TriageView>().is_err());
    }
}
