//! Data-source boundary consumed by the pipelines.

pub mod analytics_data;
pub mod sheets;

use async_trait::async_trait;
use siteline_core::{Record, ReportParameters, SourceError};

pub use analytics_data::AnalyticsDataClient;
pub use sheets::SheetsClient;

/// Parameterized report source for the metrics pipeline.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn run_report(
        &self,
        source_id: &str,
        params: &ReportParameters,
    ) -> Result<Vec<Record>, SourceError>;
}

/// Partitioned tabular source for the issue pipeline.
#[async_trait]
pub trait PartitionSource: Send + Sync {
    async fn list_partitions(&self, source_id: &str) -> Result<Vec<String>, SourceError>;

    async fn fetch_partition(
        &self,
        source_id: &str,
        partition: &str,
    ) -> Result<Vec<Record>, SourceError>;
}

pub(crate) fn request_error(error: reqwest::Error) -> SourceError {
    SourceError::Request(error.to_string())
}

pub(crate) async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SourceError::Status { status: status.as_u16(), message: truncate(&message, 200) })
}

fn truncate(message: &str, limit: usize) -> String {
    match message.char_indices().nth(limit) {
        Some((index, _)) => format!("{}…", &message[..index]),
        None => message.to_string(),
    }
}
