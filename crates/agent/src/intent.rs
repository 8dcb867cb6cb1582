//! Free text to structured intent.
//!
//! The metrics extractor asks the model for a strict JSON object and falls
//! back to [`MetricsIntent::fallback`] on any failure. The issue extractor
//! matches keywords first and only consults the model when nothing matches.

use std::sync::Arc;

use serde::Deserialize;
use siteline_core::domain::intent::DEFAULT_WINDOW_DAYS;
use siteline_core::{IssueIntent, IssueType, MetricsIntent};
use tracing::debug;

use crate::llm::{complete_once, LlmClient, LlmOutcome};

/// The only keyword a model classification reply is checked for.
const MODEL_REPLY_KEYWORD: &str = "meta";

/// Longest window a model-proposed day count may request.
pub const MAX_WINDOW_DAYS: u32 = 3650;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentOrigin {
    Model,
    Keyword,
    Fallback,
}

impl IntentOrigin {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Keyword => "keyword",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extracted<T> {
    pub intent: T,
    pub origin: IntentOrigin,
}

#[derive(Clone)]
pub struct MetricsIntentExtractor {
    llm: Arc<dyn LlmClient>,
}

impl MetricsIntentExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, query: &str) -> Extracted<MetricsIntent> {
        let completion = match complete_once(self.llm.as_ref(), &metrics_prompt(query), "intent").await
        {
            LlmOutcome::Completed(text) => text,
            LlmOutcome::Unavailable => return fallback(),
        };

        match parse_metrics_intent(&completion) {
            Some(intent) => Extracted { intent, origin: IntentOrigin::Model },
            None => {
                debug!(
                    event_name = "agent.intent.unparsable",
                    completion_len = completion.len(),
                    "model output did not contain a usable intent object"
                );
                fallback()
            }
        }
    }
}

fn fallback() -> Extracted<MetricsIntent> {
    Extracted { intent: MetricsIntent::fallback(), origin: IntentOrigin::Fallback }
}

fn metrics_prompt(query: &str) -> String {
    format!(
        r#"You are an analytics query parser.

Convert the user query into STRICT JSON with this schema:
{{
  "measures": [string],
  "groupings": [string],
  "window_days": number
}}

Rules:
- Use Google Analytics 4 metric names for measures (for example screenPageViews, activeUsers, sessions)
- Use Google Analytics 4 dimension names for groupings (for example date, pagePath, country)
- If no time range is mentioned, use {DEFAULT_WINDOW_DAYS} days
- Output ONLY the JSON object, no explanation

User query:
"{query}""#
    )
}

#[derive(Deserialize)]
struct RawMetricsIntent {
    #[serde(default, alias = "metrics")]
    measures: Vec<String>,
    #[serde(default, alias = "dimensions")]
    groupings: Vec<String>,
    #[serde(default, alias = "days")]
    window_days: Option<f64>,
}

/// Parses the first balanced `{...}` span of `completion`.
pub fn parse_metrics_intent(completion: &str) -> Option<MetricsIntent> {
    let span = first_json_object(completion)?;
    let raw: RawMetricsIntent = serde_json::from_str(span).ok()?;

    Some(MetricsIntent {
        measures: raw.measures.into_iter().map(|m| m.trim().to_string()).collect(),
        groupings: raw.groupings.into_iter().map(|g| g.trim().to_string()).collect(),
        window_days: window_days(raw.window_days),
    })
}

fn window_days(raw: Option<f64>) -> u32 {
    match raw {
        Some(days) if days.is_finite() && days >= 1.0 => {
            (days.round() as u32).clamp(1, MAX_WINDOW_DAYS)
        }
        _ => DEFAULT_WINDOW_DAYS,
    }
}

/// Finds the first balanced brace span, ignoring braces inside JSON strings.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Clone)]
pub struct IssueIntentExtractor {
    llm: Arc<dyn LlmClient>,
}

impl IssueIntentExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, query: &str) -> Extracted<IssueIntent> {
        if let Some(issue_type) = IssueType::from_keywords(query) {
            return Extracted { intent: IssueIntent { issue_type }, origin: IntentOrigin::Keyword };
        }

        let completion = match complete_once(self.llm.as_ref(), &issue_prompt(query), "intent").await
        {
            LlmOutcome::Completed(text) => text,
            LlmOutcome::Unavailable => String::new(),
        };

        if completion.to_lowercase().contains(MODEL_REPLY_KEYWORD) {
            Extracted {
                intent: IssueIntent { issue_type: IssueType::MissingMeta },
                origin: IntentOrigin::Model,
            }
        } else {
            Extracted {
                intent: IssueIntent { issue_type: IssueType::Unknown },
                origin: IntentOrigin::Fallback,
            }
        }
    }
}

fn issue_prompt(query: &str) -> String {
    format!(
        r#"Does this website audit question ask about pages missing a meta description?
Reply "missing_meta" if it does, otherwise reply "none".

Question:
"{query}""#
    )
}
