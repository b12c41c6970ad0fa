//! 🔌 Backends: where the real I/O happens.
//!
//! 🚰 A `StreamClient` takes encoded records and throws them at a stream. One call,
//! one network attempt, one honest answer. No retries. No backoff. No feelings.
//! Those live one floor up in the coordinator, where they can be tested without a network.
//!
//! 🧠 Knowledge graph:
//! - Pattern: trait → concrete impls (`KinesisStreamClient`, `InMemoryStreamClient`) → `StreamBackend` enum
//! - `put_records` returns one `RecordResult` per input record, in order. A 200 OK with
//!   17 failed records inside is a perfectly normal Tuesday.
//! - The governor wraps whatever lives here (see `governor::GovernedClient`).
//!
//! 🦆 The duck is here because every file must have one. This is law. Do not question the duck.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classifier::ErrorClassifier;
use crate::common::{EncodedRecord, RecordResult};
use crate::coordinator::SubmitContext;
use crate::errors::ClientError;

pub mod in_mem;
pub mod kinesis;

pub use in_mem::{InMemoryConfig, InMemoryStreamClient, RecordedCall, ScriptedResponse};
pub use kinesis::{KinesisConfig, KinesisStreamClient};

/// 🏷️ Which of the two APIs a call (or a whole submission) used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    PutRecord,
    PutRecords,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::PutRecord => write!(f, "PutRecord"),
            Operation::PutRecords => write!(f, "PutRecords"),
        }
    }
}

/// 📡 A client that can put records on a stream.
///
/// # Contract
/// - `put_record`: one attempt for one record.
/// - `put_records`: one attempt for the whole slice. On `Ok`, the vector has exactly
///   `records.len()` entries, position `i` describing `records[i]`.
/// - `Err` means the call as a whole produced no per-record answer.
/// - Must be safe to call from many tasks at once without serializing unrelated calls.
/// - The `_within` variants may stop waiting *before* the call once `ctx` is done, with
///   `ClientError::Cancelled`. A call already on the wire always lands. Clients with
///   nothing to wait for keep the defaults, which just make the call.
#[async_trait]
pub trait StreamClient: std::fmt::Debug + Send + Sync {
    async fn put_record(&self, stream: &str, record: &EncodedRecord) -> Result<RecordResult, ClientError>;

    async fn put_records(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
    ) -> Result<Vec<RecordResult>, ClientError>;

    async fn put_record_within(
        &self,
        stream: &str,
        record: &EncodedRecord,
        _ctx: &SubmitContext,
    ) -> Result<RecordResult, ClientError> {
        self.put_record(stream, record).await
    }

    async fn put_records_within(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
        _ctx: &SubmitContext,
    ) -> Result<Vec<RecordResult>, ClientError> {
        self.put_records(stream, records).await
    }
}

/// 🔧 Backend selection, externally tagged the way TOML likes it:
///
/// ```toml
/// [client.backend.Kinesis]
/// endpoint_url = "http://localhost:4566"
/// ```
///
/// Env vars arrive lowercased (`KSX_CLIENT__BACKEND__INMEMORY__SHARD_COUNT`), hence the aliases.
#[derive(Debug, Deserialize, Clone)]
pub enum BackendConfig {
    #[serde(alias = "kinesis")]
    Kinesis(KinesisConfig),
    #[serde(alias = "inmemory", alias = "in_memory")]
    InMemory(InMemoryConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Kinesis(KinesisConfig::default())
    }
}

/// 🎭 The many faces of a stream client. The coordinator never needs to know which one it got.
#[derive(Debug, Clone)]
pub enum StreamBackend {
    Kinesis(KinesisStreamClient),
    InMemory(InMemoryStreamClient),
}

impl StreamBackend {
    /// 🏗️ Resolve a backend from config. The Kinesis arm talks to the credential chain,
    /// which is why this is async and why it can fail.
    pub async fn from_config(config: &BackendConfig, classifier: ErrorClassifier) -> Result<Self> {
        match config {
            BackendConfig::Kinesis(kinesis_config) => {
                let client = KinesisStreamClient::new(kinesis_config, classifier)
                    .await
                    .context("💀 Could not stand up the Kinesis client. Check region, credentials and endpoint_url.")?;
                Ok(StreamBackend::Kinesis(client))
            }
            BackendConfig::InMemory(in_mem_config) => {
                Ok(StreamBackend::InMemory(InMemoryStreamClient::new(in_mem_config)))
            }
        }
    }
}

#[async_trait]
impl StreamClient for StreamBackend {
    async fn put_record(&self, stream: &str, record: &EncodedRecord) -> Result<RecordResult, ClientError> {
        match self {
            StreamBackend::Kinesis(client) => client.put_record(stream, record).await,
            StreamBackend::InMemory(client) => client.put_record(stream, record).await,
        }
    }

    async fn put_records(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
    ) -> Result<Vec<RecordResult>, ClientError> {
        match self {
            StreamBackend::Kinesis(client) => client.put_records(stream, records).await,
            StreamBackend::InMemory(client) => client.put_records(stream, records).await,
        }
    }
}
