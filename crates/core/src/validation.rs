//! Allow-list projection of a metrics intent onto parameters the reporting
//! source accepts.

use serde::{Deserialize, Serialize};

use crate::domain::intent::MetricsIntent;
use crate::errors::PipelineFailure;

pub const ALLOWED_MEASURES: [&str; 4] = ["activeUsers", "totalUsers", "screenPageViews", "sessions"];
pub const ALLOWED_GROUPINGS: [&str; 4] = ["date", "pagePath", "country", "deviceCategory"];

pub const RANGE_END: &str = "today";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn trailing_days(days: u32) -> Self {
        Self { start: format!("{days}daysAgo"), end: RANGE_END.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParameters {
    pub measures: Vec<String>,
    pub groupings: Vec<String>,
    pub window_days: u32,
    pub date_range: DateRange,
}

/// Drops every measure and grouping outside the allow-lists. Order is kept and
/// repeats collapse to their first occurrence. An empty measure list means the
/// request must not reach the source.
pub fn validate(intent: &MetricsIntent) -> Result<ReportParameters, PipelineFailure> {
    let measures = project(&intent.measures, &ALLOWED_MEASURES);
    if measures.is_empty() {
        return Err(PipelineFailure::NoValidParameters);
    }

    Ok(ReportParameters {
        measures,
        groupings: project(&intent.groupings, &ALLOWED_GROUPINGS),
        window_days: intent.window_days,
        date_range: DateRange::trailing_days(intent.window_days),
    })
}

fn project(candidates: &[String], allowed: &[&str]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for candidate in candidates {
        if allowed.contains(&candidate.as_str()) && !kept.contains(candidate) {
            kept.push(candidate.clone());
        }
    }
    kept
}
