use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use siteline_core::config::AnalyticsConfig;
use siteline_core::{FieldValue, Record, ReportParameters, SourceError};

use super::{error_for_status, request_error, ReportSource};

/// `runReport` client for the analytics reporting service.
pub struct AnalyticsDataClient {
    client: Client,
    base_url: String,
    access_token: Option<SecretString>,
}

impl AnalyticsDataClient {
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(request_error)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn report_url(&self, property_id: &str) -> String {
        format!("{}/properties/{}:runReport", self.base_url, property_id.trim())
    }
}

#[async_trait]
impl ReportSource for AnalyticsDataClient {
    async fn run_report(
        &self,
        source_id: &str,
        params: &ReportParameters,
    ) -> Result<Vec<Record>, SourceError> {
        let access_token = self.access_token.as_ref().ok_or_else(|| {
            SourceError::NotConfigured("analytics.access_token is not set".to_string())
        })?;

        let response = self
            .client
            .post(self.report_url(source_id))
            .bearer_auth(access_token.expose_secret())
            .json(&RunReportRequest::from(params))
            .send()
            .await
            .map_err(request_error)?;
        let response = error_for_status(response).await?;

        let body: RunReportResponse =
            response.json().await.map_err(|error| SourceError::Decode(error.to_string()))?;
        Ok(body.into_records(params))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReportRequest<'a> {
    date_ranges: [WireDateRange<'a>; 1],
    metrics: Vec<Named<'a>>,
    dimensions: Vec<Named<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDateRange<'a> {
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Serialize)]
struct Named<'a> {
    name: &'a str,
}

impl<'a> From<&'a ReportParameters> for RunReportRequest<'a> {
    fn from(params: &'a ReportParameters) -> Self {
        Self {
            date_ranges: [WireDateRange {
                start_date: &params.date_range.start,
                end_date: &params.date_range.end,
            }],
            metrics: params.measures.iter().map(|name| Named { name }).collect(),
            dimensions: params.groupings.iter().map(|name| Named { name }).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RunReportResponse {
    #[serde(default)]
    rows: Vec<ReportRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRow {
    #[serde(default)]
    dimension_values: Vec<CellValue>,
    #[serde(default)]
    metric_values: Vec<CellValue>,
}

#[derive(Deserialize)]
struct CellValue {
    #[serde(default)]
    value: String,
}

impl RunReportResponse {
    // Values arrive positionally in request order.
    fn into_records(self, params: &ReportParameters) -> Vec<Record> {
        self.rows
            .into_iter()
            .map(|row| {
                let dimensions = params.groupings.iter().zip(row.dimension_values);
                let metrics = params.measures.iter().zip(row.metric_values);
                Record {
                    fields: dimensions
                        .chain(metrics)
                        .map(|(name, cell)| (name.clone(), FieldValue::Text(cell.value)))
                        .collect(),
                    partition: None,
                }
            })
            .collect()
    }
}
