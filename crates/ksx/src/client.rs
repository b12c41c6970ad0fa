//! 🚪 The front desk: `Client::put_record` / `Client::put_records`.
//!
//! 🎬 *[a load script hands over a JSON object with `Data`, `PartitionKey`, `StreamName`.]*
//! *[it does not care about shards. it does not care about retries. it wants a receipt.]*
//!
//! This is the only surface a host (a load script, the CLI supervisor, your integration test)
//! needs. Inputs come in the host's PascalCase shape, get encoded, run through the
//! coordinator over a governed backend, and come back as a [`Report`].
//!
//! Raised: validation failures, local throttling before anything was sent, auth aborts.
//! Everything else, partial failure included, is data inside the report.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::backends::{BackendConfig, Operation, StreamBackend};
use crate::classifier::{ClassifierConfig, ErrorClassifier};
use crate::common::{BatchOutcome, Record};
use crate::coordinator::{BatchCoordinator, RetryConfig, RetryPolicy, SubmitContext};
use crate::encoder::{encode, encode_batch};
use crate::errors::{IngestError, ValidationError};
use crate::governor::{GovernedClient, GovernorConfig, RateGovernor};
use crate::reporter::{MetricsCollector, Report, SubmissionEvent, TracingCollector};

/// 🔧 Where to send records. Passed through to the backend untouched.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// 🔧 How hard to try, how fast to go, and what counts as worth another try.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub governor: GovernorConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// ⏰ Applied to every submission that does not bring its own deadline.
    #[serde(default)]
    pub submission_timeout_ms: Option<u64>,
}

/// 📦 Record payload as the host sends it: an array of bytes, or a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Bytes(Vec<u8>),
    Text(String),
}

impl Payload {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Bytes(bytes) => bytes,
            Payload::Text(text) => text.into_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordInput {
    pub data: Payload,
    pub partition_key: String,
    pub stream_name: String,
    #[serde(default)]
    pub explicit_hash_key: Option<String>,
}

impl PutRecordInput {
    pub fn new(stream_name: impl Into<String>, data: impl Into<Vec<u8>>, partition_key: impl Into<String>) -> Self {
        Self {
            data: Payload::Bytes(data.into()),
            partition_key: partition_key.into(),
            stream_name: stream_name.into(),
            explicit_hash_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordsEntry {
    pub data: Payload,
    pub partition_key: String,
    #[serde(default)]
    pub explicit_hash_key: Option<String>,
}

impl PutRecordsEntry {
    pub fn new(data: impl Into<Vec<u8>>, partition_key: impl Into<String>) -> Self {
        Self {
            data: Payload::Bytes(data.into()),
            partition_key: partition_key.into(),
            explicit_hash_key: None,
        }
    }

    fn into_record(self) -> Record {
        Record {
            data: self.data.into_bytes(),
            partition_key: self.partition_key,
            explicit_hash_key: self.explicit_hash_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRecordsInput {
    pub records: Vec<PutRecordsEntry>,
    pub stream_name: String,
}

type EngineCoordinator = BatchCoordinator<GovernedClient<StreamBackend>>;

/// 📡 The client. Cheap to clone; clones share the governor, the backend's
/// connection pool, and the metrics collector.
#[derive(Debug, Clone)]
pub struct Client {
    coordinator: Arc<EngineCoordinator>,
    collector: Arc<dyn MetricsCollector>,
    submission_timeout: Option<Duration>,
}

impl Client {
    /// 🏗️ Build the backend from config, then wire it into the engine.
    pub async fn from_config(client_config: &ClientConfig, engine: &EngineConfig) -> Result<Self> {
        let classifier = ErrorClassifier::new(&engine.classifier);
        let backend = StreamBackend::from_config(&client_config.backend, classifier).await?;
        Ok(Self::with_backend(backend, engine))
    }

    pub fn with_backend(backend: StreamBackend, engine: &EngineConfig) -> Self {
        let governed = GovernedClient::new(backend, RateGovernor::new(engine.governor.clone()));
        let coordinator = BatchCoordinator::new(
            governed,
            RetryPolicy::new(&engine.retry),
            ErrorClassifier::new(&engine.classifier),
        );
        Self {
            coordinator: Arc::new(coordinator),
            collector: Arc::new(TracingCollector),
            submission_timeout: engine.submission_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn with_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.collector = collector;
        self
    }

    pub fn governor(&self) -> &RateGovernor {
        self.coordinator.client().governor()
    }

    pub async fn put_record(&self, input: PutRecordInput) -> Result<Report, IngestError> {
        self.put_record_with(input, SubmitContext::new()).await
    }

    /// 📄 One record, with the caller's own cancellation/deadline.
    pub async fn put_record_with(&self, input: PutRecordInput, ctx: SubmitContext) -> Result<Report, IngestError> {
        let started = Instant::now();
        let ctx = self.bounded(ctx);
        let PutRecordInput {
            data,
            partition_key,
            stream_name: stream,
            explicit_hash_key,
        } = input;
        let attempt: Result<(BatchOutcome, usize), IngestError> = async {
            if stream.is_empty() {
                return Err(IngestError::Validation(ValidationError::EmptyStreamName));
            }
            let record = encode(Record {
                data: data.into_bytes(),
                partition_key,
                explicit_hash_key,
            })?;
            let outcome = self.coordinator.submit_single(&stream, &record, &ctx).await?;
            Ok((outcome, record.size_bytes()))
        }
        .await;
        self.finish(&stream, Operation::PutRecord, 1, started, attempt)
    }

    pub async fn put_records(&self, input: PutRecordsInput) -> Result<Report, IngestError> {
        self.put_records_with(input, SubmitContext::new()).await
    }

    /// 📦 A batch, with the caller's own cancellation/deadline.
    pub async fn put_records_with(&self, input: PutRecordsInput, ctx: SubmitContext) -> Result<Report, IngestError> {
        let started = Instant::now();
        let ctx = self.bounded(ctx);
        let PutRecordsInput {
            records,
            stream_name: stream,
        } = input;
        let record_count = records.len();
        let attempt: Result<(BatchOutcome, usize), IngestError> = async {
            let records = records.into_iter().map(PutRecordsEntry::into_record).collect();
            let request = encode_batch(stream.as_str(), records)?;
            let outcome = self.coordinator.submit(&request, &ctx).await?;
            Ok((outcome, request.total_bytes()))
        }
        .await;
        self.finish(&stream, Operation::PutRecords, record_count, started, attempt)
    }

    /// 🚀 Fire-and-collect-later: the submission runs as its own task.
    pub fn spawn_put_record(&self, input: PutRecordInput) -> JoinHandle<Result<Report, IngestError>> {
        let client = self.clone();
        tokio::spawn(async move { client.put_record(input).await })
    }

    pub fn spawn_put_records(&self, input: PutRecordsInput) -> JoinHandle<Result<Report, IngestError>> {
        let client = self.clone();
        tokio::spawn(async move { client.put_records(input).await })
    }

    fn bounded(&self, ctx: SubmitContext) -> SubmitContext {
        match (ctx.deadline(), self.submission_timeout) {
            (None, Some(timeout)) => ctx.with_timeout(timeout),
            _ => ctx,
        }
    }

    /// 🧾 Build the report, tell the collector, raise what must be raised.
    fn finish(
        &self,
        stream: &str,
        operation: Operation,
        record_count: usize,
        started: Instant,
        attempt: Result<(BatchOutcome, usize), IngestError>,
    ) -> Result<Report, IngestError> {
        let elapsed = started.elapsed();
        match attempt {
            Ok((outcome, total_bytes)) => {
                let fatal = outcome.fatal.clone();
                let report = Report::from_outcome(stream, operation, outcome, elapsed);
                let mut event = SubmissionEvent::from_report(&report, total_bytes);
                if let Some(ref reason) = fatal {
                    event.error = Some(reason.to_string());
                }
                self.collector.record(&event);
                match fatal {
                    Some(reason) => Err(IngestError::Auth {
                        code: reason.code,
                        message: reason.message.unwrap_or_default(),
                    }),
                    None => Ok(report),
                }
            }
            Err(err) => {
                self.collector
                    .record(&SubmissionEvent::from_error(stream, operation, record_count, elapsed, &err));
                Err(err)
            }
        }
    }
}
