use thiserror::Error;

use crate::domain::envelope::AgentKind;

/// Anything that goes wrong at the data-source boundary. Pipelines collapse
/// every variant into [`PipelineFailure::SourceUnavailable`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("source is not configured: {0}")]
    NotConfigured(String),
    #[error("source request failed: {0}")]
    Request(String),
    #[error("source responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("source payload could not be decoded: {0}")]
    Decode(String),
}

/// Failures that end a pipeline with a `failed` envelope.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineFailure {
    #[error("no valid parameters inferred")]
    NoValidParameters,
    #[error("data source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),
    #[error("data source not configured")]
    NotConfigured,
}

impl PipelineFailure {
    /// Machine-readable reason placed in `data.reason`.
    pub fn reason(&self, agent: AgentKind) -> String {
        match self {
            Self::NoValidParameters => "no valid parameters inferred".to_string(),
            Self::SourceUnavailable(_) => {
                format!("{} source not configured or inaccessible", agent.as_str())
            }
            Self::NotConfigured => format!("{} source not configured", agent.as_str()),
        }
    }

    /// Human-readable answer. Never carries error detail.
    pub fn user_message(&self, agent: AgentKind) -> &'static str {
        match (self, agent) {
            (Self::NoValidParameters, _) => {
                "I could not identify valid analytics metrics from your query."
            }
            (Self::SourceUnavailable(_), AgentKind::Analytics) => {
                "I attempted to fetch analytics data, but the analytics property is not accessible or not fully configured."
            }
            (Self::SourceUnavailable(_), AgentKind::Seo) => {
                "I attempted to read the site audit data, but the crawl export is not accessible or not fully configured."
            }
            (Self::NotConfigured, AgentKind::Analytics) => "Analytics reporting is not configured.",
            (Self::NotConfigured, AgentKind::Seo) => "SEO spreadsheet is not configured.",
        }
    }

    pub fn next_step(&self, agent: AgentKind) -> Option<&'static str> {
        match (self, agent) {
            (Self::NoValidParameters, _) => None,
            (Self::SourceUnavailable(_), AgentKind::Analytics)
            | (Self::NotConfigured, AgentKind::Analytics) => {
                Some("Set analytics.access_token and send a valid propertyId")
            }
            (Self::SourceUnavailable(_), AgentKind::Seo) | (Self::NotConfigured, AgentKind::Seo) => {
                Some("Share the crawl export with the service account and set seo.spreadsheet_id")
            }
        }
    }

    /// Diagnostic text for `data.details`.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::SourceUnavailable(source) => Some(source.to_string()),
            Self::NoValidParameters | Self::NotConfigured => None,
        }
    }
}
