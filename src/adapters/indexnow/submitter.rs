//! Notification submitter
//!
//! Chunks a URL list into capped batches and POSTs each batch as
//! `{ host, key, keyLocation, urlList }`. The key must be retrievable
//! at `https://<host>/<key>.txt` — that file-based ownership proof is
//! part of the external contract, served by the HTTP layer.
//!
//! No retries here: failed batches are reported and callers decide
//! whether to re-trigger.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;

use crate::application::timeout::deadline;
use crate::config::IndexNowSection;
use crate::domain::provider::{ProviderSpec, RequestDraft};
use crate::ports::transport::Transport;

pub const DEFAULT_BATCH_LIMIT: usize = 500;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one submission run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmitReport {
    pub batches: usize,
    /// URLs in batches that were accepted upstream
    pub submitted: usize,
    pub batch_sizes: Vec<usize>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Zero-based batch index
    pub batch: usize,
    pub detail: String,
}

pub struct IndexNowSubmitter {
    transport: Arc<dyn Transport>,
    spec: ProviderSpec,
    host: String,
    key: String,
    batch_limit: usize,
}

impl IndexNowSubmitter {
    pub fn new(transport: Arc<dyn Transport>, section: &IndexNowSection) -> Self {
        Self::with_params(
            transport,
            &section.endpoint,
            &section.host,
            &section.key,
            section.batch_limit,
        )
    }

    pub fn with_params(
        transport: Arc<dyn Transport>,
        endpoint: &str,
        host: &str,
        key: &str,
        batch_limit: usize,
    ) -> Self {
        Self {
            transport,
            spec: ProviderSpec::new("indexnow", endpoint).with_timeout(SUBMIT_TIMEOUT),
            host: host.to_string(),
            key: key.to_string(),
            batch_limit: batch_limit.max(1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ownership-proof URL the indexing service will fetch
    pub fn key_location(&self) -> String {
        format!("https://{}/{}.txt", self.host, self.key)
    }

    /// Submit every URL, chunked to the batch cap
    pub async fn submit_all(&self, urls: &[String]) -> SubmitReport {
        let mut report = SubmitReport::default();
        for (index, chunk) in urls.chunks(self.batch_limit).enumerate() {
            report.batches += 1;
            report.batch_sizes.push(chunk.len());

            let body = json!({
                "host": self.host,
                "key": self.key,
                "keyLocation": self.key_location(),
                "urlList": chunk,
            });
            let draft = RequestDraft::post("", body);
            let outcome = deadline(
                self.spec.timeout,
                self.transport.execute(draft.into_prepared(&self.spec)),
            )
            .await;

            match outcome {
                Ok(response) if response.is_success() => {
                    tracing::info!(batch = index, urls = chunk.len(), "index batch accepted");
                    report.submitted += chunk.len();
                }
                Ok(response) => {
                    tracing::warn!(batch = index, status = response.status, "index batch rejected");
                    report.failures.push(BatchFailure {
                        batch: index,
                        detail: format!("status {}", response.status),
                    });
                }
                Err(err) => {
                    tracing::warn!(batch = index, error = %err, "index batch failed");
                    report.failures.push(BatchFailure {
                        batch: index,
                        detail: err.to_string(),
                    });
                }
            }
        }
        report
    }
}
