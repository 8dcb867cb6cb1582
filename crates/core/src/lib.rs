pub mod config;
pub mod domain;
pub mod errors;
pub mod rules;
pub mod summary;
pub mod validation;

pub use domain::envelope::{AgentKind, EnvelopeData, FailureData, ResponseEnvelope};
pub use domain::intent::{Intent, IssueIntent, IssueType, MetricsIntent};
pub use domain::query::Query;
pub use domain::record::{records_from_rows, FieldValue, Record};
pub use errors::{PipelineFailure, SourceError};
pub use summary::{IssueSummary, MetricsSummary, StructuredResult};
pub use validation::{DateRange, ReportParameters};
