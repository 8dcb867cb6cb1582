use serde::{Deserialize, Serialize};

use crate::domain::intent::Intent;
use crate::errors::PipelineFailure;
use crate::summary::StructuredResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Analytics,
    Seo,
}

impl AgentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Analytics => "analytics",
            Self::Seo => "seo",
        }
    }
}

/// The only artifact a caller sees.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub agent: AgentKind,
    pub answer: String,
    pub data: EnvelopeData,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeData {
    Result(StructuredResult),
    Failed(FailureData),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureData {
    pub status: &'static str,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<&'static str>,
}

pub const FAILED_STATUS: &str = "failed";

impl ResponseEnvelope {
    pub fn answered(agent: AgentKind, answer: String, result: StructuredResult) -> Self {
        Self { agent, answer, data: EnvelopeData::Result(result) }
    }

    pub fn failed(agent: AgentKind, failure: &PipelineFailure, intent: Option<Intent>) -> Self {
        Self {
            agent,
            answer: failure.user_message(agent).to_string(),
            data: EnvelopeData::Failed(FailureData {
                status: FAILED_STATUS,
                reason: failure.reason(agent),
                details: failure.details(),
                intent,
                next_step: failure.next_step(agent),
            }),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.data, EnvelopeData::Failed(_))
    }
}
