use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use siteline_core::config::SeoConfig;
use siteline_core::{records_from_rows, FieldValue, Record, SourceError};

use super::{error_for_status, request_error, PartitionSource};

/// Reads a crawl export where every sheet (tab) is one partition.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    access_token: Option<SecretString>,
    api_key: Option<SecretString>,
}

impl SheetsClient {
    pub fn from_config(config: &SeoConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|error| SourceError::NotConfigured(format!("seo.base_url: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::NotConfigured(
                "seo.base_url must be a hierarchical URL".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(request_error)?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn spreadsheet_url(&self, spreadsheet_id: &str, tail: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("spreadsheets").push(spreadsheet_id).extend(tail);
        }
        url
    }

    fn authorized(&self, url: Url) -> Result<RequestBuilder, SourceError> {
        match (&self.access_token, &self.api_key) {
            (Some(token), _) => Ok(self.client.get(url).bearer_auth(token.expose_secret())),
            (None, Some(key)) => Ok(self.client.get(url).query(&[("key", key.expose_secret())])),
            (None, None) => Err(SourceError::NotConfigured(
                "seo.access_token or seo.api_key must be set".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PartitionSource for SheetsClient {
    async fn list_partitions(&self, source_id: &str) -> Result<Vec<String>, SourceError> {
        let request = self
            .authorized(self.spreadsheet_url(source_id, &[]))?
            .query(&[("fields", "sheets.properties.title")]);
        let response = error_for_status(request.send().await.map_err(request_error)?).await?;

        let body: SpreadsheetMetadata =
            response.json().await.map_err(|error| SourceError::Decode(error.to_string()))?;
        Ok(body.sheets.into_iter().map(|sheet| sheet.properties.title).collect())
    }

    async fn fetch_partition(
        &self,
        source_id: &str,
        partition: &str,
    ) -> Result<Vec<Record>, SourceError> {
        let request = self.authorized(self.spreadsheet_url(source_id, &["values", partition]))?;
        let response = error_for_status(request.send().await.map_err(request_error)?).await?;

        let body: ValueRange =
            response.json().await.map_err(|error| SourceError::Decode(error.to_string()))?;
        Ok(records_from_rows(body.values, partition))
    }
}

#[derive(Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<FieldValue>>,
}
