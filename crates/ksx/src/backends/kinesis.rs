//! # 📡 THE KINESIS BACKEND
//!
//! 🎬 COLD OPEN. INT. SERVER ROOM, 3:47 AM
//!
//! The load test is at 4,000 records per second. The stream has two shards.
//! Somebody did the math on a napkin, and the napkin was wrong.
//! `ProvisionedThroughputExceededException` scrolls by like movie credits.
//!
//! 🚀 This module is the only place in ksx that knows the AWS SDK exists.
//! It turns `EncodedRecord`s into SDK request entries, fires exactly one call,
//! and translates whatever comes back into `RecordResult`s or a `ClientError`.
//!
//! ⚠️ The SDK's own retry layer is switched off on purpose. Retries belong to the
//! coordinator, which knows which records already made it. The SDK does not.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_kinesis::config::Region;
use aws_sdk_kinesis::config::retry::RetryConfig;
use aws_sdk_kinesis::config::timeout::TimeoutConfig;
use aws_sdk_kinesis::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::backends::StreamClient;
use crate::classifier::ErrorClassifier;
use crate::common::{EncodedRecord, FailureReason, RecordResult};
use crate::errors::ClientError;

/// 🧾 The code we report when the SDK refuses to even build the request.
const REQUEST_CONSTRUCTION_CODE: &str = "ValidationException";

/// 🔧 Connection settings. Everything optional falls through to the SDK's default chain
/// (env vars → profile → IMDS → hope), same as any other AWS tool on the box.
#[derive(Debug, Deserialize, Clone)]
pub struct KinesisConfig {
    /// 📡 Override the endpoint. LocalStack lives at `http://localhost:4566`.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// 🌎 Override the region. `None` means "whatever the environment says".
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

// 🐢 a 500-record, 5 MiB PutRecords over a sad hotel wifi deserves some patience
fn default_operation_timeout_ms() -> u64 {
    30_000
}

impl Default for KinesisConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

/// 📡 The AWS SDK client, wrapped. Cheap to clone: the SDK client is an `Arc` inside
/// and owns the shared connection pool every virtual user rides on.
#[derive(Debug, Clone)]
pub struct KinesisStreamClient {
    client: aws_sdk_kinesis::Client,
    classifier: ErrorClassifier,
}

impl KinesisStreamClient {
    /// 🚀 Resolve credentials and region, apply the endpoint override, disable SDK retries.
    pub async fn new(config: &KinesisConfig, classifier: ErrorClassifier) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(ref endpoint_url) = config.endpoint_url {
            debug!("📡 Kinesis endpoint overridden to {}", endpoint_url);
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;

        let timeouts = TimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .operation_timeout(Duration::from_millis(config.operation_timeout_ms))
            .build();
        let kinesis_config = aws_sdk_kinesis::config::Builder::from(&sdk_config)
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeouts)
            .build();

        Ok(Self {
            client: aws_sdk_kinesis::Client::from_conf(kinesis_config),
            classifier,
        })
    }

    /// 🔍 SDK error → `ClientError`. Service errors keep their code; everything that
    /// never got a proper service answer is transport.
    fn map_sdk_error<E, R>(&self, err: SdkError<E, R>) -> ClientError
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        match err {
            SdkError::ServiceError(context) => {
                let service_err = context.err();
                let code = service_err.code().unwrap_or("UnknownError").to_string();
                let message = service_err.message().unwrap_or_default().to_string();
                if self.classifier.is_auth_code(&code) {
                    ClientError::Auth { code, message }
                } else {
                    ClientError::Service { code, message }
                }
            }
            SdkError::ConstructionFailure(_) => ClientError::Service {
                code: REQUEST_CONSTRUCTION_CODE.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            },
            other => ClientError::Transport(DisplayErrorContext(&other).to_string()),
        }
    }
}

fn request_entry(record: &EncodedRecord) -> Result<PutRecordsRequestEntry, ClientError> {
    PutRecordsRequestEntry::builder()
        .data(Blob::new(record.data().to_vec()))
        .partition_key(record.partition_key())
        .set_explicit_hash_key(record.explicit_hash_key().map(String::from))
        .build()
        .map_err(|err| ClientError::Service {
            code: REQUEST_CONSTRUCTION_CODE.to_string(),
            message: err.to_string(),
        })
}

#[async_trait]
impl StreamClient for KinesisStreamClient {
    async fn put_record(&self, stream: &str, record: &EncodedRecord) -> Result<RecordResult, ClientError> {
        trace!("📡 PutRecord → {} ({} bytes)", stream, record.size_bytes());
        let output = self
            .client
            .put_record()
            .stream_name(stream)
            .data(Blob::new(record.data().to_vec()))
            .partition_key(record.partition_key())
            .set_explicit_hash_key(record.explicit_hash_key().map(String::from))
            .send()
            .await
            .map_err(|err| self.map_sdk_error(err))?;

        Ok(RecordResult::Succeeded {
            sequence_number: output.sequence_number().to_string(),
            shard_id: output.shard_id().to_string(),
        })
    }

    async fn put_records(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
    ) -> Result<Vec<RecordResult>, ClientError> {
        let entries = records
            .iter()
            .map(|record| request_entry(record))
            .collect::<Result<Vec<_>, _>>()?;
        trace!("📡 PutRecords → {} ({} records)", stream, entries.len());

        let output = self
            .client
            .put_records()
            .stream_name(stream)
            .set_records(Some(entries))
            .send()
            .await
            .map_err(|err| self.map_sdk_error(err))?;

        let entries = output.records();
        if entries.len() != records.len() {
            return Err(ClientError::MalformedResponse(format!(
                "sent {} records, got {} result entries back",
                records.len(),
                entries.len()
            )));
        }

        Ok(entries
            .iter()
            .map(|entry| {
                to_record_result(
                    entry.error_code(),
                    entry.error_message(),
                    entry.sequence_number(),
                    entry.shard_id(),
                )
            })
            .collect())
    }
}

/// 🧩 One result entry → one `RecordResult`. An entry with an error code failed,
/// an entry without one must carry a sequence number and shard id or it is malformed.
fn to_record_result(
    error_code: Option<&str>,
    error_message: Option<&str>,
    sequence_number: Option<&str>,
    shard_id: Option<&str>,
) -> RecordResult {
    match (error_code, sequence_number, shard_id) {
        (Some(code), _, _) => RecordResult::Failed(FailureReason::new(code, error_message.map(String::from))),
        (None, Some(sequence_number), Some(shard_id)) => RecordResult::Succeeded {
            sequence_number: sequence_number.to_string(),
            shard_id: shard_id.to_string(),
        },
        (None, _, _) => RecordResult::Failed(FailureReason::malformed(
            "result entry has neither an error code nor a sequence number",
        )),
    }
}
