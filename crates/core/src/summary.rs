use serde::Serialize;

use crate::domain::intent::IssueType;
use crate::domain::record::Record;
use crate::rules::columns;
use crate::validation::{DateRange, ReportParameters};

pub const METRICS_SAMPLE_SIZE: usize = 10;
pub const ISSUE_SAMPLE_SIZE: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredResult {
    Metrics(MetricsSummary),
    Issue(IssueSummary),
}

impl StructuredResult {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Metrics(summary) => summary.row_count == 0,
            Self::Issue(summary) => summary.count == 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub measures: Vec<String>,
    pub groupings: Vec<String>,
    pub window_days: u32,
    pub date_range: DateRange,
    pub row_count: usize,
    pub sample_rows: Vec<Record>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub issue_type: IssueType,
    pub count: usize,
    pub sample_urls: Vec<String>,
    pub partitions_scanned: usize,
}

pub fn summarize_metrics(params: &ReportParameters, rows: &[Record]) -> MetricsSummary {
    MetricsSummary {
        measures: params.measures.clone(),
        groupings: params.groupings.clone(),
        window_days: params.window_days,
        date_range: params.date_range.clone(),
        row_count: rows.len(),
        sample_rows: rows.iter().take(METRICS_SAMPLE_SIZE).cloned().collect(),
    }
}

/// `matches` must already be in traversal order; the first
/// [`ISSUE_SAMPLE_SIZE`] addresses become the sample.
pub fn summarize_issues(
    issue_type: IssueType,
    matches: &[&Record],
    partitions_scanned: usize,
) -> IssueSummary {
    IssueSummary {
        issue_type,
        count: matches.len(),
        sample_urls: matches
            .iter()
            .take(ISSUE_SAMPLE_SIZE)
            .map(|record| {
                record.text(columns::ADDRESS).map(|value| value.into_owned()).unwrap_or_default()
            })
            .collect(),
        partitions_scanned,
    }
}

#[cfg(test)]
mod tests {
    use super::{summarize_issues, summarize_metrics, StructuredResult};
    use crate::domain::intent::{IssueType, MetricsIntent};
    use crate::domain::record::Record;
    use crate::validation::validate;

    #[test]
    fn metrics_summary_caps_sample_at_ten() {
        let params = validate(&MetricsIntent::fallback()).expect("valid");
        let rows = (0..25)
            .map(|day| Record::from_pairs([("date", format!("202401{day:02}"))]))
            .collect::<Vec<_>>();

        let summary = summarize_metrics(&params, &rows);
        assert_eq!(summary.row_count, 25);
        assert_eq!(summary.sample_rows.len(), 10);
        assert_eq!(summary.sample_rows[0], rows[0]);
        assert_eq!(summary.date_range.start, "14daysAgo");
        assert!(!StructuredResult::Metrics(summary).is_empty());
    }

    #[test]
    fn issue_summary_samples_first_eight_addresses() {
        let records = (0..12)
            .map(|index| Record::from_pairs([("Address", format!("https://a.test/{index}"))]))
            .collect::<Vec<_>>();
        let matches = records.iter().collect::<Vec<_>>();

        let summary = summarize_issues(IssueType::MissingH1, &matches, 3);
        assert_eq!(summary.count, 12);
        assert_eq!(summary.sample_urls.len(), 8);
        assert_eq!(summary.sample_urls[7], "https://a.test/7");
        assert_eq!(summary.partitions_scanned, 3);
    }

    #[test]
    fn zero_matches_is_empty() {
        let summary = summarize_issues(IssueType::Unknown, &[], 2);
        let result = StructuredResult::Issue(summary);
        assert!(result.is_empty());

        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["count"], 0);
        assert_eq!(value["issue_type"], "unknown");
        assert_eq!(value["partitions_scanned"], 2);
    }
}
