use std::sync::Arc;

use siteline_core::{IssueSummary, MetricsSummary, Record, StructuredResult};
use tracing::warn;

use crate::guardrails::{AnswerGuardrail, GuardrailDecision};
use crate::llm::{complete_once, LlmClient, LlmOutcome};

/// Sample addresses shown to the model for issue answers.
pub const ISSUE_PROMPT_SAMPLE: usize = 5;

pub const NO_ISSUES_ANSWER: &str = "I analyzed your website and did not find any pages affected by this SEO issue. \
This suggests that your site is currently healthy in this area.";

pub const METRICS_UNAVAILABLE_ANSWER: &str = "I analyzed the analytics data successfully, but could not generate \
a detailed explanation at this moment.";

pub const ISSUES_UNAVAILABLE_ANSWER: &str = "I analyzed the SEO data and identified issues that may impact search \
performance, but I could not generate a detailed explanation at this moment.";

pub fn zero_traffic_answer(window_days: u32) -> String {
    format!(
        "I checked your Google Analytics data for the last {window_days} days, but there is currently \
no recorded traffic available. Once your website or app starts receiving users, \
this agent will provide daily page views and user trends."
    )
}

#[derive(Clone)]
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmClient>,
    guardrail: AnswerGuardrail,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, guardrail: AnswerGuardrail) -> Self {
        Self { llm, guardrail }
    }

    /// Empty results never reach the model.
    pub async fn synthesize(&self, query: &str, result: &StructuredResult) -> String {
        if result.is_empty() {
            return empty_answer(result);
        }

        let prompt = match result {
            StructuredResult::Metrics(summary) => metrics_prompt(query, summary),
            StructuredResult::Issue(summary) => issue_prompt(query, summary),
        };

        match complete_once(self.llm.as_ref(), &prompt, "synthesis").await {
            LlmOutcome::Completed(answer) => match self.guardrail.evaluate(&answer) {
                GuardrailDecision::Allow => answer,
                GuardrailDecision::Degrade { reason_code, fallback_path } => {
                    warn!(
                        event_name = "agent.synthesis.degraded",
                        reason_code,
                        fallback_path,
                        "model answer rejected by guardrail"
                    );
                    unavailable_answer(result).to_string()
                }
            },
            LlmOutcome::Unavailable => unavailable_answer(result).to_string(),
        }
    }
}

fn empty_answer(result: &StructuredResult) -> String {
    match result {
        StructuredResult::Metrics(summary) => zero_traffic_answer(summary.window_days),
        StructuredResult::Issue(_) => NO_ISSUES_ANSWER.to_string(),
    }
}

fn unavailable_answer(result: &StructuredResult) -> &'static str {
    match result {
        StructuredResult::Metrics(_) => METRICS_UNAVAILABLE_ANSWER,
        StructuredResult::Issue(_) => ISSUES_UNAVAILABLE_ANSWER,
    }
}

fn metrics_prompt(query: &str, summary: &MetricsSummary) -> String {
    let rows = summary.sample_rows.iter().map(render_row).collect::<Vec<_>>().join("\n");
    format!(
        r#"You are an analytics assistant.

User question:
"{query}"

Analytics result:
- Metrics: {measures}
- Broken down by: {groupings}
- Period: last {days} days
- Rows returned: {row_count}
- First rows:
{rows}

Write a clear, concise, natural language answer.
Explain insights in plain English.
Do NOT mention APIs, JSON, or code."#,
        measures = summary.measures.join(", "),
        groupings = if summary.groupings.is_empty() {
            "nothing".to_string()
        } else {
            summary.groupings.join(", ")
        },
        days = summary.window_days,
        row_count = summary.row_count,
    )
}

fn issue_prompt(query: &str, summary: &IssueSummary) -> String {
    let examples = summary
        .sample_urls
        .iter()
        .take(ISSUE_PROMPT_SAMPLE)
        .map(|url| format!("  - {url}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"You are a professional SEO consultant.

User question:
"{query}"

SEO analysis summary:
- Issue detected: {issue}
- Total affected pages: {count}
- Example affected URLs:
{examples}

Explain clearly in plain English:
1. What this SEO issue means
2. Why it matters for search visibility
3. What actions should be taken to fix it

Keep the explanation concise, professional, and actionable.
Do NOT mention spreadsheets, APIs, code, or JSON."#,
        issue = summary.issue_type,
        count = summary.count,
    )
}

fn render_row(record: &Record) -> String {
    let cells = record
        .fields
        .iter()
        .map(|(name, value)| format!("{name}={}", value.as_text()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("  - {cells}")
}
