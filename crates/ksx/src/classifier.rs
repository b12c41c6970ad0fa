//! 🧭 Error classification: which service error codes deserve a second chance.
//!
//! The stream service adds new transient error codes whenever it feels like it,
//! so the lists live in config instead of a `match` somebody has to remember to update.
//!
//! 🧠 Knowledge graph:
//! - per-record codes: retryable or terminal-for-that-record. Never an abort.
//! - whole-call codes: retryable, terminal, or auth (abort the submission).
//! - local codes (`TransportError`) are always retryable, whatever the config says.

use std::collections::HashSet;

use serde::Deserialize;

use crate::common::FailureReason;

/// 🔧 The knobs. Defaults cover the codes the Kinesis API documents today.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    #[serde(default = "default_retryable_codes")]
    pub retryable_codes: Vec<String>,
    #[serde(default = "default_auth_codes")]
    pub auth_codes: Vec<String>,
}

fn default_retryable_codes() -> Vec<String> {
    [
        "ProvisionedThroughputExceededException",
        "InternalFailure",
        "ServiceUnavailable",
        "ServiceUnavailableException",
        "ThrottlingException",
        "LimitExceededException",
        "KMSThrottlingException",
        "RequestTimeout",
        "RequestTimeoutException",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_auth_codes() -> Vec<String> {
    [
        "AccessDeniedException",
        "UnrecognizedClientException",
        "InvalidSignatureException",
        "IncompleteSignature",
        "MissingAuthenticationToken",
        "ExpiredTokenException",
        "InvalidClientTokenId",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            retryable_codes: default_retryable_codes(),
            auth_codes: default_auth_codes(),
        }
    }
}

/// 🎯 Verdict for a failure attached to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFailureKind {
    Retryable,
    Terminal,
}

/// 🎯 Verdict for a failure of a whole call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallFailureKind {
    Retryable,
    Terminal,
    Auth,
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    retryable: HashSet<String>,
    auth: HashSet<String>,
}

impl ErrorClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            retryable: config.retryable_codes.iter().cloned().collect(),
            auth: config.auth_codes.iter().cloned().collect(),
        }
    }

    /// 🔍 Per-record: access denied on one record fails that record, nothing more.
    pub fn classify_record(&self, reason: &FailureReason) -> RecordFailureKind {
        if reason.code == FailureReason::TRANSPORT_ERROR || self.retryable.contains(&reason.code) {
            RecordFailureKind::Retryable
        } else {
            RecordFailureKind::Terminal
        }
    }

    /// 🔍 Whole call: auth codes abort the submission.
    pub fn classify_call(&self, code: &str) -> CallFailureKind {
        if self.auth.contains(code) {
            CallFailureKind::Auth
        } else if code == FailureReason::TRANSPORT_ERROR || self.retryable.contains(code) {
            CallFailureKind::Retryable
        } else {
            CallFailureKind::Terminal
        }
    }

    pub fn is_auth_code(&self, code: &str) -> bool {
        self.auth.contains(code)
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
