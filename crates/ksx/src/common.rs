//! 📦 Common data structures: the building blocks of ksx
//!
//! 🎬 COLD OPEN. INT. LOAD TEST WAR ROOM, 2:12 AM
//!
//! Two hundred virtual users are hammering one stream. The dashboard says
//! "FailedRecordCount: 17". Not zero. Not five hundred. Seventeen.
//! Somebody has to remember which seventeen. That somebody is `original_index`.
//!
//! This module defines the structs that ferry records from the caller to the shard
//! and the outcomes that ferry the verdict back. They do not retry. They do not throttle.
//! They carry. They are the postal workers of this codebase. Please tip your postal workers. 🦆

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

/// 📥 A caller-supplied record, before anyone has judged it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub data: Vec<u8>,
    pub partition_key: String,
    /// 🔢 Decimal string of a u128. Overrides the partition-key hash when present.
    pub explicit_hash_key: Option<String>,
}

impl Record {
    pub fn new(data: impl Into<Vec<u8>>, partition_key: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            partition_key: partition_key.into(),
            explicit_hash_key: None,
        }
    }

    pub fn with_explicit_hash_key(mut self, explicit_hash_key: impl Into<String>) -> Self {
        self.explicit_hash_key = Some(explicit_hash_key.into());
        self
    }
}

/// ✅ A record that passed the encoder. Ready for the wire, immutable from here on.
///
/// Only the encoder builds these, so holding one means the limits were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    pub(crate) data: Vec<u8>,
    pub(crate) partition_key: String,
    pub(crate) explicit_hash_key: Option<String>,
    pub(crate) size_bytes: usize,
}

impl EncodedRecord {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn explicit_hash_key(&self) -> Option<&str> {
        self.explicit_hash_key.as_deref()
    }

    /// 📏 Data bytes plus partition key bytes. The service counts both, so we do too.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

/// 📦 A validated batch bound for one stream. 1..=500 records, at most 5 MiB.
///
/// Built via [`crate::encoder::encode_batch`]. There is no other door in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub(crate) stream_name: String,
    pub(crate) records: Vec<EncodedRecord>,
    pub(crate) total_bytes: usize,
}

impl BatchRequest {
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    pub fn records(&self) -> &[EncodedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 📊 Sum of every record's `size_bytes`. Computed once at construction, trusted after.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}

/// 🧾 Why a record (or a whole call) did not make it.
///
/// `code` is either the service's error code or one of the local codes below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    pub code: String,
    pub message: Option<String>,
}

impl FailureReason {
    pub const TRANSPORT_ERROR: &'static str = "TransportError";
    pub const THROTTLED_LOCALLY: &'static str = "ThrottledLocally";
    pub const MALFORMED_RESPONSE: &'static str = "MalformedResponse";

    pub fn new(code: impl Into<String>, message: Option<String>) -> Self {
        Self {
            code: code.into(),
            message,
        }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::new(Self::TRANSPORT_ERROR, Some(message.into()))
    }

    pub(crate) fn throttled_locally(message: impl Into<String>) -> Self {
        Self::new(Self::THROTTLED_LOCALLY, Some(message.into()))
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::new(Self::MALFORMED_RESPONSE, Some(message.into()))
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

/// 📡 What a stream client says about one record in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordResult {
    Succeeded {
        sequence_number: String,
        shard_id: String,
    },
    Failed(FailureReason),
}

/// 🎯 The terminal verdict for one record. Exactly one per input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason")]
pub enum RecordStatus {
    Succeeded,
    Failed(FailureReason),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub original_index: usize,
    pub status: RecordStatus,
    pub sequence_number: Option<String>,
    pub shard_id: Option<String>,
}

impl RecordOutcome {
    pub(crate) fn succeeded(original_index: usize, sequence_number: String, shard_id: String) -> Self {
        Self {
            original_index,
            status: RecordStatus::Succeeded,
            sequence_number: Some(sequence_number),
            shard_id: Some(shard_id),
        }
    }

    pub(crate) fn failed(original_index: usize, reason: FailureReason) -> Self {
        Self {
            original_index,
            status: RecordStatus::Failed(reason),
            sequence_number: None,
            shard_id: None,
        }
    }

    pub(crate) fn cancelled(original_index: usize) -> Self {
        Self {
            original_index,
            status: RecordStatus::Cancelled,
            sequence_number: None,
            shard_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, RecordStatus::Succeeded)
    }
}

/// 🔄 One trip to the service and back. Diagnostics and retry bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// 1-based.
    pub attempt_number: u32,
    pub record_indices: BTreeSet<usize>,
    pub elapsed: Duration,
    /// Whole-call error code, when the call itself failed.
    pub service_error_code: Option<String>,
}

/// 📚 Everything that happened to one submission, in order.
///
/// `outcomes` always lines up one-to-one with the original request. Always.
/// If it doesn't, something has gone deeply wrong and the tests will tell you.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct BatchOutcome {
    pub attempts: Vec<AttemptRecord>,
    pub outcomes: Vec<RecordOutcome>,
    /// 🔒 Set when the submission was aborted (auth failure). The host raises it.
    pub fatal: Option<FailureReason>,
}

impl BatchOutcome {
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }
}
