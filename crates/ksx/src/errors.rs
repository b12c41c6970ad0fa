//! 💀 Errors: the taxonomy of everything that can go sideways between a caller and a shard.
//!
//! 🧠 Knowledge graph:
//! - `ValidationError`: pre-flight. Never touches the network. Raised straight to the caller.
//! - `ClientError`: what a `StreamClient` hands back for a whole call. The coordinator
//!   eats these and turns them into per-record outcomes (or an abort).
//! - `GovernorError`: the local bouncer said no before the request even left the building.
//! - `IngestError`: the only thing the host ever sees raised. Everything else is data.
//!
//! ⚠️ Per-record failures (throughput exceeded, internal failure, access denied on ONE record)
//! are NOT errors here. They live inside `RecordOutcome` because a batch can half-succeed,
//! and an exception cannot half-happen. 🦆

use std::time::Duration;

use thiserror::Error;

use crate::common::FailureReason;

/// 🚫 A record or batch failed the pre-flight checks. Nothing was sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record data must be between {min} and {max} bytes, got {actual}")]
    DataSize { actual: usize, min: usize, max: usize },

    #[error("partition key must be between {min} and {max} characters, got {actual}")]
    PartitionKeyLength { actual: usize, min: usize, max: usize },

    #[error("explicit hash key '{0}' is not a decimal 128-bit unsigned integer")]
    ExplicitHashKey(String),

    #[error("stream name must not be empty")]
    EmptyStreamName,

    #[error("a batch must carry between 1 and {max} records, got {actual}")]
    BatchCount { actual: usize, max: usize },

    #[error("a batch may carry at most {max} bytes, got {actual}")]
    BatchBytes { actual: usize, max: usize },

    /// 📍 Wraps a record-level failure with the index that caused it,
    /// so nobody has to binary-search a 500-record batch at 3am.
    #[error("record {index} rejected: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// 📡 Whole-call failures reported by a `StreamClient`.
///
/// A `put_records` call that returns `Ok` may still contain failed records.
/// These variants are for the cases where the call itself did not produce a result set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// 🔌 Connection refused, DNS sulking, timeouts, unparseable bytes. Retryable per attempt.
    #[error("transport failure: {0}")]
    Transport(String),

    /// 🔒 Credentials rejected. Fatal for the whole submission.
    #[error("authentication failed ({code}): {message}")]
    Auth { code: String, message: String },

    /// 🧾 The service answered with an error for the whole call. Retryability decided by code.
    #[error("service error ({code}): {message}")]
    Service { code: String, message: String },

    /// 🚦 The local governor ran out of patience before the request was sent.
    #[error("throttled locally on stream '{stream}' after waiting {waited:?}")]
    ThrottledLocally { stream: String, waited: Duration },

    /// 🧩 The service answered, but the answer did not line up with the question.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// ✂️ The caller gave up while the call was still waiting for capacity. Nothing was sent.
    #[error("cancelled while waiting for capacity on stream '{stream}'")]
    Cancelled { stream: String },
}

impl ClientError {
    /// 🏷️ The code this failure goes by in attempt logs and failure reasons.
    pub fn code(&self) -> &str {
        match self {
            ClientError::Transport(_) => FailureReason::TRANSPORT_ERROR,
            ClientError::Auth { code, .. } | ClientError::Service { code, .. } => code,
            ClientError::ThrottledLocally { .. } => FailureReason::THROTTLED_LOCALLY,
            ClientError::MalformedResponse(_) => FailureReason::MALFORMED_RESPONSE,
            ClientError::Cancelled { .. } => "Cancelled",
        }
    }
}

/// 🚦 The governor could not grant capacity in time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GovernorError {
    #[error("throttled locally on stream '{stream}' after waiting {waited:?}")]
    ThrottledLocally { stream: String, waited: Duration },

    #[error("cancelled after waiting {waited:?} for capacity on stream '{stream}'")]
    Cancelled { stream: String, waited: Duration },
}

impl From<GovernorError> for ClientError {
    fn from(err: GovernorError) -> Self {
        match err {
            GovernorError::ThrottledLocally { stream, waited } => {
                ClientError::ThrottledLocally { stream, waited }
            }
            GovernorError::Cancelled { stream, .. } => ClientError::Cancelled { stream },
        }
    }
}

/// 🎯 The errors a host caller can actually receive from `put_record` / `put_records`.
///
/// Retries are invisible. Transport hiccups are invisible. Partial failures are data.
/// What's left is the stuff that makes the whole operation meaningless.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("throttled locally on stream '{stream}' after waiting {waited:?}")]
    ThrottledLocally { stream: String, waited: Duration },

    #[error("submission aborted, authentication failed ({code}): {message}")]
    Auth { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_record_index_survives_the_wrapping() {
        let the_error = ValidationError::Record {
            index: 7,
            source: Box::new(ValidationError::DataSize {
                actual: 0,
                min: 1,
                max: 1_048_576,
            }),
        };
        let the_message = the_error.to_string();
        assert!(the_message.contains("record 7"), "{the_message}");
        assert!(the_message.contains("got 0"), "{the_message}");
    }

    #[test]
    fn the_one_where_governor_denial_becomes_a_client_error() {
        let the_denial = GovernorError::ThrottledLocally {
            stream: "orders".to_string(),
            waited: Duration::from_millis(250),
        };
        assert_eq!(
            ClientError::from(the_denial),
            ClientError::ThrottledLocally {
                stream: "orders".to_string(),
                waited: Duration::from_millis(250),
            }
        );
    }
}
