//! Query routing and the two answering pipelines.
//!
//! A query carrying a source id goes to the metrics pipeline; everything
//! else goes to the issue pipeline over the crawl export.
//!
//! - [`analytics`]: intent → allow-list validation → report → summary → answer
//! - [`seo`]: keyword intent → partitioned fetch → rules → summary → answer
//! - [`runtime`]: routing and assembly from configuration
//!
//! The model only translates text into intents and summaries into prose.
//! Validation, rule evaluation and summaries are deterministic.

pub mod analytics;
pub mod guardrails;
pub mod intent;
pub mod llm;
pub mod runtime;
pub mod seo;
pub mod sources;
pub mod synthesis;

#[cfg(test)]
pub(crate) mod testing;

pub use runtime::{select_agent, AgentRuntime};
