use std::sync::Arc;

use anyhow::{Context, Result};
use siteline_core::config::{AppConfig, LlmProvider};
use siteline_core::{AgentKind, Query, ResponseEnvelope};
use tracing::info;
use uuid::Uuid;

use crate::analytics::AnalyticsAgent;
use crate::guardrails::AnswerGuardrail;
use crate::intent::{IssueIntentExtractor, MetricsIntentExtractor};
use crate::llm::{DisabledLlm, HttpLlmClient, LlmClient};
use crate::seo::{SeoAgent, SeoSource};
use crate::sources::{AnalyticsDataClient, PartitionSource, ReportSource, SheetsClient};
use crate::synthesis::AnswerSynthesizer;

/// Picks the pipeline for a query. A non-blank source id selects analytics.
pub fn select_agent(query: &Query) -> AgentKind {
    match query.discriminator() {
        Some(_) => AgentKind::Analytics,
        None => AgentKind::Seo,
    }
}

#[derive(Clone)]
pub struct AgentRuntime {
    analytics: AnalyticsAgent,
    seo: SeoAgent,
}

impl AgentRuntime {
    pub fn new(analytics: AnalyticsAgent, seo: SeoAgent) -> Self {
        Self { analytics, seo }
    }

    /// Wires every pipeline from one model client and the two data sources.
    pub fn assemble(
        llm: Arc<dyn LlmClient>,
        report_source: Arc<dyn ReportSource>,
        seo_source: Option<SeoSource>,
        guardrail: AnswerGuardrail,
    ) -> Self {
        let synthesizer = AnswerSynthesizer::new(llm.clone(), guardrail);
        Self {
            analytics: AnalyticsAgent::new(
                MetricsIntentExtractor::new(llm.clone()),
                report_source,
                synthesizer.clone(),
            ),
            seo: SeoAgent::new(IssueIntentExtractor::new(llm), seo_source, synthesizer),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = match config.llm.provider {
            LlmProvider::Disabled => Arc::new(DisabledLlm),
            _ => Arc::new(HttpLlmClient::from_config(&config.llm)?),
        };

        let report_source: Arc<dyn ReportSource> = Arc::new(
            AnalyticsDataClient::from_config(&config.analytics)
                .context("failed to build analytics client")?,
        );

        let seo_source = match &config.seo.spreadsheet_id {
            Some(spreadsheet_id) => {
                let client: Arc<dyn PartitionSource> = Arc::new(
                    SheetsClient::from_config(&config.seo).context("failed to build sheets client")?,
                );
                Some(SeoSource { source_id: spreadsheet_id.clone(), client })
            }
            None => None,
        };

        Ok(Self::assemble(llm, report_source, seo_source, AnswerGuardrail::default()))
    }

    pub fn seo_configured(&self) -> bool {
        self.seo.is_configured()
    }

    /// Always yields an envelope; every failure below is already mapped.
    pub async fn handle(&self, query: &Query) -> ResponseEnvelope {
        let correlation_id = Uuid::new_v4().to_string();
        let agent = select_agent(query);
        info!(
            event_name = "agent.runtime.routed",
            correlation_id = %correlation_id,
            agent = agent.as_str(),
            "query routed"
        );

        match (agent, query.discriminator()) {
            (AgentKind::Analytics, Some(property_id)) => {
                self.analytics.handle(&query.text, property_id, &correlation_id).await
            }
            _ => self.seo.handle(&query.text, &correlation_id).await,
        }
    }
}
