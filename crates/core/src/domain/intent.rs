use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_DAYS: u32 = 14;
pub const FALLBACK_MEASURES: [&str; 2] = ["screenPageViews", "activeUsers"];
pub const FALLBACK_GROUPINGS: [&str; 1] = ["date"];

/// Structured reading of a query. Each pipeline produces exactly one shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Metrics(MetricsIntent),
    Issue(IssueIntent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsIntent {
    pub measures: Vec<String>,
    pub groupings: Vec<String>,
    pub window_days: u32,
}

impl MetricsIntent {
    /// Deterministic intent used whenever the model cannot be consulted or its
    /// output cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            measures: FALLBACK_MEASURES.iter().map(ToString::to_string).collect(),
            groupings: FALLBACK_GROUPINGS.iter().map(ToString::to_string).collect(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueIntent {
    pub issue_type: IssueType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingMeta,
    LowWordCount,
    NonIndexable,
    ErrorPages,
    MissingH1,
    MissingCanonical,
    Unknown,
}

/// Keyword table in priority order. The first row with any keyword contained
/// in the lowercased text wins, so "meta ... error" always resolves to
/// `MissingMeta`.
pub const ISSUE_KEYWORDS: [(&[&str], IssueType); 6] = [
    (&["meta"], IssueType::MissingMeta),
    (&["word", "thin"], IssueType::LowWordCount),
    (&["index"], IssueType::NonIndexable),
    (&["error", "4xx", "5xx"], IssueType::ErrorPages),
    (&["h1"], IssueType::MissingH1),
    (&["canonical"], IssueType::MissingCanonical),
];

impl IssueType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingMeta => "missing_meta",
            Self::LowWordCount => "low_word_count",
            Self::NonIndexable => "non_indexable",
            Self::ErrorPages => "error_pages",
            Self::MissingH1 => "missing_h1",
            Self::MissingCanonical => "missing_canonical",
            Self::Unknown => "unknown",
        }
    }

    /// Matches `text` against [`ISSUE_KEYWORDS`].
    pub fn from_keywords(text: &str) -> Option<Self> {
        let normalized = text.to_lowercase();
        ISSUE_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| normalized.contains(keyword)))
            .map(|(_, issue_type)| *issue_type)
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
