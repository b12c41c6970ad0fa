//! # Previously, on ksx...
//!
//! 🎬 The stream was four hundred milliseconds away, behind a VPN, a credential chain,
//! and a LocalStack container someone forgot to start. The tests could not wait.
//! The tests never wait. Someone had to build a stream that lives entirely in RAM.
//!
//! That someone was this module.
//!
//! `InMemoryStreamClient` is a scripted, recording [`StreamClient`]:
//! - each call pops the next [`ScriptedResponse`] off a queue (empty queue = everybody wins),
//! - every call is written down in a [`RecordedCall`] so tests can count retries,
//! - successes get monotonically increasing sequence numbers and a shard derived from the key.
//!
//! ⚠️ This is NOT a Kinesis emulator. It does not enforce shard limits. It does not store
//! payloads. It is a very convincing cardboard cutout of one. 🦆

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::trace;

use crate::backends::{Operation, StreamClient};
use crate::common::{EncodedRecord, FailureReason, RecordResult};
use crate::errors::ClientError;

/// 🔧 How many pretend shards to spread keys over.
#[derive(Debug, Deserialize, Clone)]
pub struct InMemoryConfig {
    #[serde(default = "default_shard_count")]
    pub shard_count: u32,
}

fn default_shard_count() -> u32 {
    4
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            shard_count: default_shard_count(),
        }
    }
}

/// 🎭 What the next call should experience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    /// ✅ Every record lands.
    AllSucceed,
    /// 💥 Records at these positions (within the call, not the original request) fail with `code`.
    FailPositions { positions: BTreeSet<usize>, code: String },
    /// 💀 The whole call blows up.
    CallError(ClientError),
}

impl ScriptedResponse {
    /// 🎯 Shorthand for the most common script line in the test suite.
    pub fn fail_positions(positions: impl IntoIterator<Item = usize>, code: impl Into<String>) -> Self {
        ScriptedResponse::FailPositions {
            positions: positions.into_iter().collect(),
            code: code.into(),
        }
    }
}

/// 📝 One call, as the in-memory stream saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub stream: String,
    pub operation: Operation,
    pub partition_keys: Vec<String>,
}

impl RecordedCall {
    pub fn record_count(&self) -> usize {
        self.partition_keys.len()
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    calls: Vec<RecordedCall>,
    next_sequence: u64,
}

/// 🧪 The stream that lives in your heap.
///
/// Clones share state and script, so hand one to the coordinator and keep one for assertions.
#[derive(Debug, Clone)]
pub struct InMemoryStreamClient {
    state: Arc<Mutex<InMemoryState>>,
    // -- std mutex so the script can be written from sync code; never held across an .await
    script: Arc<std::sync::Mutex<VecDeque<ScriptedResponse>>>,
    shard_count: u32,
}

impl InMemoryStreamClient {
    pub fn new(config: &InMemoryConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState::default())),
            script: Arc::new(std::sync::Mutex::new(VecDeque::new())),
            // -- 🛡️ zero shards would be a modulo by zero wearing a config costume
            shard_count: config.shard_count.max(1),
        }
    }

    /// 🎬 Append to the script. Calls beyond the script succeed.
    pub fn with_script(self, responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(responses);
        self
    }

    fn next_response(&self) -> ScriptedResponse {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(ScriptedResponse::AllSucceed)
    }

    /// 📋 Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// 🔢 FNV-1a over the key, modulo the shard count. Same key, same shard, every time.
    fn shard_for(&self, record: &EncodedRecord) -> String {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in record.partition_key().bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        format!("shardId-{:012}", hash % u64::from(self.shard_count))
    }

    /// 🎯 Write the call down, pop the script, decide every record's fate.
    async fn respond(
        &self,
        stream: &str,
        operation: Operation,
        records: &[&EncodedRecord],
    ) -> Result<Vec<RecordResult>, ClientError> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall {
            stream: stream.to_string(),
            operation,
            partition_keys: records.iter().map(|r| r.partition_key().to_string()).collect(),
        });
        let response = self.next_response();
        trace!("🧪 in-memory {} on '{}' → {:?}", operation, stream, response);

        let failed_positions = match response {
            ScriptedResponse::CallError(err) => return Err(err),
            ScriptedResponse::AllSucceed => None,
            ScriptedResponse::FailPositions { positions, code } => Some((positions, code)),
        };

        let mut results = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let result = match failed_positions {
                Some((ref positions, ref code)) if positions.contains(&position) => {
                    RecordResult::Failed(FailureReason::new(
                        code.clone(),
                        Some(format!("scripted failure at position {position}")),
                    ))
                }
                _ => {
                    state.next_sequence += 1;
                    RecordResult::Succeeded {
                        sequence_number: format!("{:020}", state.next_sequence),
                        shard_id: self.shard_for(record),
                    }
                }
            };
            results.push(result);
        }
        Ok(results)
    }
}

#[async_trait]
impl StreamClient for InMemoryStreamClient {
    /// 🎯 A scripted per-position failure on a single put surfaces as a whole-call
    /// service error, because that is how the real PutRecord reports it.
    async fn put_record(&self, stream: &str, record: &EncodedRecord) -> Result<RecordResult, ClientError> {
        let mut results = self.respond(stream, Operation::PutRecord, &[record]).await?;
        match results.pop() {
            Some(RecordResult::Failed(reason)) => Err(ClientError::Service {
                code: reason.code,
                message: reason.message.unwrap_or_default(),
            }),
            Some(success) => Ok(success),
            None => Err(ClientError::MalformedResponse("in-memory stream lost a record".to_string())),
        }
    }

    async fn put_records(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
    ) -> Result<Vec<RecordResult>, ClientError> {
        self.respond(stream, Operation::PutRecords, records).await
    }
}
