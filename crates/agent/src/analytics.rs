//! Metrics pipeline: intent → allow-list validation → report → summary →
//! answer.

use std::sync::Arc;

use siteline_core::summary::summarize_metrics;
use siteline_core::validation::validate;
use siteline_core::{AgentKind, Intent, PipelineFailure, ResponseEnvelope, StructuredResult};
use tracing::{info, warn};

use crate::intent::MetricsIntentExtractor;
use crate::sources::ReportSource;
use crate::synthesis::AnswerSynthesizer;

#[derive(Clone)]
pub struct AnalyticsAgent {
    extractor: MetricsIntentExtractor,
    source: Arc<dyn ReportSource>,
    synthesizer: AnswerSynthesizer,
}

impl AnalyticsAgent {
    pub fn new(
        extractor: MetricsIntentExtractor,
        source: Arc<dyn ReportSource>,
        synthesizer: AnswerSynthesizer,
    ) -> Self {
        Self { extractor, source, synthesizer }
    }

    pub async fn handle(&self, query: &str, property_id: &str, correlation_id: &str) -> ResponseEnvelope {
        let extracted = self.extractor.extract(query).await;
        info!(
            event_name = "agent.analytics.intent",
            correlation_id,
            origin = extracted.origin.as_str(),
            measures = ?extracted.intent.measures,
            groupings = ?extracted.intent.groupings,
            window_days = extracted.intent.window_days,
            "metrics intent extracted"
        );

        let params = match validate(&extracted.intent) {
            Ok(params) => params,
            Err(failure) => {
                warn!(
                    event_name = "agent.analytics.no_valid_parameters",
                    correlation_id,
                    "no allow-listed measures left, source not contacted"
                );
                return ResponseEnvelope::failed(
                    AgentKind::Analytics,
                    &failure,
                    Some(Intent::Metrics(extracted.intent)),
                );
            }
        };

        let rows = match self.source.run_report(property_id, &params).await {
            Ok(rows) => rows,
            Err(error) => {
                warn!(
                    event_name = "agent.analytics.source_unavailable",
                    correlation_id,
                    error = %error,
                    "report request failed"
                );
                return ResponseEnvelope::failed(
                    AgentKind::Analytics,
                    &PipelineFailure::SourceUnavailable(error),
                    Some(Intent::Metrics(extracted.intent)),
                );
            }
        };

        let result = StructuredResult::Metrics(summarize_metrics(&params, &rows));
        let answer = self.synthesizer.synthesize(query, &result).await;
        info!(
            event_name = "agent.analytics.answered",
            correlation_id,
            row_count = rows.len(),
            "analytics answer ready"
        );
        ResponseEnvelope::answered(AgentKind::Analytics, answer, result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use siteline_core::{EnvelopeData, Record, SourceError, StructuredResult};

    use super::AnalyticsAgent;
    use crate::guardrails::AnswerGuardrail;
    use crate::intent::MetricsIntentExtractor;
    use crate::synthesis::{AnswerSynthesizer, METRICS_UNAVAILABLE_ANSWER};
    use crate::testing::{FakeLlm, FakeReports};

    fn agent(llm: std::sync::Arc<FakeLlm>, reports: std::sync::Arc<FakeReports>) -> AnalyticsAgent {
        AnalyticsAgent::new(
            MetricsIntentExtractor::new(llm.clone()),
            reports,
            AnswerSynthesizer::new(llm, AnswerGuardrail::default()),
        )
    }

    #[tokio::test]
    async fn no_allow_listed_measure_never_contacts_the_source() {
        let llm = FakeLlm::replying("{\"measures\":[\"bounceRate\"],\"groupings\":[\"date\"]}");
        let reports = FakeReports::returning(Vec::new());

        let envelope = agent(llm, reports.clone()).handle("bounce rate?", "12345", "corr-1").await;

        assert_eq!(reports.calls.load(Ordering::SeqCst), 0);
        assert_eq!(envelope.answer, "I could not identify valid analytics metrics from your query.");
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["data"]["status"], "failed");
        assert_eq!(value["data"]["intent"]["measures"], serde_json::json!(["bounceRate"]));
    }

    #[tokio::test]
    async fn only_validated_parameters_reach_the_source() {
        let llm = FakeLlm::replying(
            "{\"measures\":[\"sessions\",\"revenue\"],\"groupings\":[\"country\",\"browser\"],\"window_days\":30}",
        );
        let reports = FakeReports::returning(vec![Record::from_pairs([
            ("country", "NL"),
            ("sessions", "12"),
        ])]);

        let envelope = agent(llm, reports.clone()).handle("sessions by country", "12345", "corr-2").await;

        let params = reports.last_params().expect("source called");
        assert_eq!(params.measures, vec!["sessions"]);
        assert_eq!(params.groupings, vec!["country"]);
        assert_eq!(params.date_range.start, "30daysAgo");
        assert_eq!(params.date_range.end, "today");
        assert!(matches!(envelope.data, EnvelopeData::Result(StructuredResult::Metrics(_))));
    }

    #[tokio::test]
    async fn source_error_becomes_failed_envelope() {
        let llm = FakeLlm::failing();
        let reports = FakeReports::failing(SourceError::Status {
            status: 403,
            message: "permission denied".to_string(),
        });

        let envelope = agent(llm, reports).handle("users", "12345", "corr-3").await;

        assert!(envelope.is_failed());
        assert!(envelope.answer.starts_with("I attempted to fetch analytics data"));
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert!(value["data"]["details"].as_str().unwrap_or_default().contains("403"));
    }

    #[tokio::test]
    async fn guarded_answer_falls_back_to_template() {
        let llm = FakeLlm::replying("Here is the API response: {\"rows\": 3}");
        let reports = FakeReports::returning(vec![Record::from_pairs([
            ("date", "20240101"),
            ("screenPageViews", "3"),
        ])]);

        let envelope = agent(llm, reports).handle("page views", "12345", "corr-4").await;
        assert_eq!(envelope.answer, METRICS_UNAVAILABLE_ANSWER);
    }
}
