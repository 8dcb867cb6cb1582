//! Issue-rule pipeline over a partitioned crawl export.

use std::sync::Arc;

use futures::future::try_join_all;
use siteline_core::rules::evaluate;
use siteline_core::summary::summarize_issues;
use siteline_core::{
    AgentKind, Intent, IssueIntent, PipelineFailure, Record, ResponseEnvelope, SourceError,
    StructuredResult,
};
use tracing::{info, warn};

use crate::intent::IssueIntentExtractor;
use crate::sources::PartitionSource;
use crate::synthesis::AnswerSynthesizer;

#[derive(Clone)]
pub struct SeoAgent {
    extractor: IssueIntentExtractor,
    source: Option<SeoSource>,
    synthesizer: AnswerSynthesizer,
}

/// A partition source bound to the export it reads.
#[derive(Clone)]
pub struct SeoSource {
    pub source_id: String,
    pub client: Arc<dyn PartitionSource>,
}

impl SeoAgent {
    pub fn new(
        extractor: IssueIntentExtractor,
        source: Option<SeoSource>,
        synthesizer: AnswerSynthesizer,
    ) -> Self {
        Self { extractor, source, synthesizer }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    pub async fn handle(&self, query: &str, correlation_id: &str) -> ResponseEnvelope {
        let Some(source) = &self.source else {
            warn!(event_name = "agent.seo.not_configured", correlation_id, "no crawl export configured");
            return ResponseEnvelope::failed(AgentKind::Seo, &PipelineFailure::NotConfigured, None);
        };

        let extracted = self.extractor.extract(query).await;
        let IssueIntent { issue_type } = extracted.intent;
        info!(
            event_name = "agent.seo.intent",
            correlation_id,
            origin = extracted.origin.as_str(),
            issue_type = issue_type.as_str(),
            "issue intent extracted"
        );

        let (partitions, records) = match load_partitions(source).await {
            Ok(loaded) => loaded,
            Err(error) => {
                warn!(
                    event_name = "agent.seo.source_unavailable",
                    correlation_id,
                    error = %error,
                    "crawl export could not be read"
                );
                return ResponseEnvelope::failed(
                    AgentKind::Seo,
                    &PipelineFailure::SourceUnavailable(error),
                    Some(Intent::Issue(extracted.intent)),
                );
            }
        };

        let matches = evaluate(&records, issue_type);
        let result =
            StructuredResult::Issue(summarize_issues(issue_type, &matches, partitions));
        info!(
            event_name = "agent.seo.evaluated",
            correlation_id,
            partitions,
            records = records.len(),
            matches = matches.len(),
            "issue rules evaluated"
        );

        let answer = self.synthesizer.synthesize(query, &result).await;
        ResponseEnvelope::answered(AgentKind::Seo, answer, result)
    }
}

/// Fetches every partition concurrently. Records come back concatenated in
/// enumeration order whatever order the fetches finish in.
async fn load_partitions(source: &SeoSource) -> Result<(usize, Vec<Record>), SourceError> {
    let names = source.client.list_partitions(&source.source_id).await?;
    let fetches = names
        .iter()
        .map(|name| source.client.fetch_partition(&source.source_id, name));
    let partitions = try_join_all(fetches).await?;

    let records = partitions
        .into_iter()
        .zip(&names)
        .flat_map(|(records, name)| {
            records.into_iter().map(move |record| record.with_partition(name.clone()))
        })
        .collect();
    Ok((names.len(), records))
}
