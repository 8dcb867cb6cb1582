//! In-memory doubles for pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use siteline_core::{Record, ReportParameters, SourceError};

use crate::llm::LlmClient;
use crate::sources::{PartitionSource, ReportSource};

pub(crate) struct FakeLlm {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: Some(reply.to_string()), calls: AtomicUsize::new(0) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { reply: None, calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => bail!("model offline"),
        }
    }
}

pub(crate) struct FakeReports {
    rows: Result<Vec<Record>, SourceError>,
    pub calls: AtomicUsize,
    last: Mutex<Option<(String, ReportParameters)>>,
}

impl FakeReports {
    pub fn returning(rows: Vec<Record>) -> Arc<Self> {
        Arc::new(Self { rows: Ok(rows), calls: AtomicUsize::new(0), last: Mutex::new(None) })
    }

    pub fn failing(error: SourceError) -> Arc<Self> {
        Arc::new(Self { rows: Err(error), calls: AtomicUsize::new(0), last: Mutex::new(None) })
    }

    pub fn last_property(&self) -> Option<String> {
        self.last.lock().expect("lock").as_ref().map(|(property, _)| property.clone())
    }

    pub fn last_params(&self) -> Option<ReportParameters> {
        self.last.lock().expect("lock").as_ref().map(|(_, params)| params.clone())
    }
}

#[async_trait]
impl ReportSource for FakeReports {
    async fn run_report(
        &self,
        source_id: &str,
        params: &ReportParameters,
    ) -> Result<Vec<Record>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().expect("lock") = Some((source_id.to_string(), params.clone()));
        self.rows.clone()
    }
}

/// Partitions keyed by name. Earlier partitions answer more slowly so
/// completion order differs from enumeration order.
pub(crate) struct FakePartitions {
    partitions: Result<Vec<(String, Vec<Record>)>, SourceError>,
    pub fetches: AtomicUsize,
}

impl FakePartitions {
    pub fn with(partitions: Vec<(String, Vec<Record>)>) -> Arc<Self> {
        Arc::new(Self { partitions: Ok(partitions), fetches: AtomicUsize::new(0) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            partitions: Err(SourceError::Status {
                status: 403,
                message: "caller does not have permission".to_string(),
            }),
            fetches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PartitionSource for FakePartitions {
    async fn list_partitions(&self, _source_id: &str) -> Result<Vec<String>, SourceError> {
        let partitions = self.partitions.as_ref().map_err(Clone::clone)?;
        Ok(partitions.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn fetch_partition(
        &self,
        _source_id: &str,
        partition: &str,
    ) -> Result<Vec<Record>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let partitions = self.partitions.as_ref().map_err(Clone::clone)?;
        let position = partitions
            .iter()
            .position(|(name, _)| name == partition)
            .ok_or_else(|| SourceError::Status { status: 400, message: format!("no sheet {partition}") })?;
        let delay = (partitions.len() - position) as u64 * 5;
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(partitions[position].1.clone())
    }
}

pub(crate) fn html_page(address: &str, meta: &str) -> Record {
    Record::from_pairs([
        ("Address", address.to_string()),
        ("Content Type", "text/html; charset=utf-8".to_string()),
        ("Meta Description 1", meta.to_string()),
        ("Word Count", "640".to_string()),
        ("H1-1", "Heading".to_string()),
        ("Status Code", "200".to_string()),
        ("Canonical Link Element 1", address.to_string()),
    ])
}

/// Three partitions, fifty HTML pages, four without a meta description.
pub(crate) fn crawl_fixture() -> Vec<(String, Vec<Record>)> {
    let missing = [3, 17, 18, 41];
    let mut partitions = vec![
        ("Internal".to_string(), Vec::new()),
        ("Blog".to_string(), Vec::new()),
        ("Docs".to_string(), Vec::new()),
    ];
    for index in 0..50 {
        let address = format!("https://example.com/page-{index}");
        let meta = if missing.contains(&index) { "" } else { "A page worth reading." };
        partitions[index % 3].1.push(html_page(&address, meta));
    }
    partitions[1].1.push(Record::from_pairs([
        ("Address", "https://example.com/logo.png"),
        ("Content Type", "image/png"),
    ]));
    partitions
}
