//! # 🔄 THE BATCH RETRY COORDINATOR
//!
//! 🎬 COLD OPEN. INT. SHARD 0001, THE THIRD RETRY
//!
//! Five hundred records went out. Four hundred eighty-three came back with sequence numbers.
//! Seventeen came back with `ProvisionedThroughputExceededException` and a look of betrayal.
//! We do not resend the four hundred eighty-three. We are not animals.
//! We wait, with jitter, and resend the seventeen. Still under their original indices.
//!
//! ## The loop
//! ```text
//! Submitting ──► Evaluating ──► Done
//!     ▲              │
//!     └── backoff ◄──┘ (retryable left, attempts left)
//! ```
//! - succeeded records are final, forever, no matter what later attempts do
//! - retryable failures go round again, alone
//! - terminal per-record failures stop for that record only
//! - a transport hiccup makes the whole working set retryable, not dead
//! - an auth failure ends everything, right now
//! - cancellation is checked before each attempt, during each backoff, and while an attempt
//!   waits at the governor; a call already on the wire is allowed to land
//!
//! 🧠 The client underneath is usually a `GovernedClient`, so every attempt pays the governor.

use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backends::{Operation, StreamClient};
use crate::classifier::{CallFailureKind, ErrorClassifier, RecordFailureKind};
use crate::common::{
    AttemptRecord, BatchOutcome, BatchRequest, EncodedRecord, FailureReason, RecordOutcome, RecordResult,
};
use crate::errors::{ClientError, IngestError};

pub mod backoff;

pub use backoff::{RetryConfig, RetryPolicy};

/// ✂️ The caller's way to say "enough": a cancellation token and/or a deadline.
#[derive(Debug, Clone, Default)]
pub struct SubmitContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl SubmitContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// ⏰ Resolves once cancelled or past the deadline.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }
}

/// 📒 Per-submission bookkeeping. Owned by one `run`, dropped when it returns.
struct Ledger {
    resolved: Vec<Option<RecordOutcome>>,
    last_reason: Vec<Option<FailureReason>>,
    attempts: Vec<AttemptRecord>,
    fatal: Option<FailureReason>,
}

impl Ledger {
    fn new(len: usize) -> Self {
        Self {
            resolved: vec![None; len],
            last_reason: vec![None; len],
            attempts: Vec::new(),
            fatal: None,
        }
    }

    fn fail_all(&mut self, indices: &[usize], reason: &FailureReason) {
        for &index in indices {
            self.resolved[index] = Some(RecordOutcome::failed(index, reason.clone()));
        }
    }

    /// 💀 Retries ran out: each record keeps the last thing the service said about it.
    fn fail_with_last_reason(&mut self, indices: &[usize]) {
        for &index in indices {
            let reason = self.last_reason[index]
                .take()
                .unwrap_or_else(|| FailureReason::new("RetriesExhausted", None));
            self.resolved[index] = Some(RecordOutcome::failed(index, reason));
        }
    }

    fn cancel_all(&mut self, indices: &[usize]) {
        for &index in indices {
            self.resolved[index] = Some(RecordOutcome::cancelled(index));
        }
    }

    fn into_outcome(self) -> BatchOutcome {
        let outcomes = self
            .resolved
            .into_iter()
            .enumerate()
            // -- every index is resolved by the time the loop exits; cancelled is the honest fallback
            .map(|(index, outcome)| outcome.unwrap_or_else(|| RecordOutcome::cancelled(index)))
            .collect();
        BatchOutcome {
            attempts: self.attempts,
            outcomes,
            fatal: self.fatal,
        }
    }
}

/// 🎯 What one attempt decided about the working set.
enum Verdict {
    /// These indices go round again.
    Retry(Vec<usize>),
    /// Nothing left to do.
    Settled,
    /// Auth failure, stop everything.
    Abort,
}

/// 🔄 Runs submissions against a `StreamClient`, retrying only what deserves it.
#[derive(Debug, Clone)]
pub struct BatchCoordinator<C> {
    client: C,
    policy: RetryPolicy,
    classifier: ErrorClassifier,
}

impl<C: StreamClient> BatchCoordinator<C> {
    pub fn new(client: C, policy: RetryPolicy, classifier: ErrorClassifier) -> Self {
        Self {
            client,
            policy,
            classifier,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 📦 Submit a validated batch through `put_records`.
    pub async fn submit(&self, request: &BatchRequest, ctx: &SubmitContext) -> Result<BatchOutcome, IngestError> {
        self.run(request.stream_name(), request.records(), Operation::PutRecords, ctx)
            .await
    }

    /// 📄 Submit one record through `put_record`. Same loop, batch of one.
    pub async fn submit_single(
        &self,
        stream: &str,
        record: &EncodedRecord,
        ctx: &SubmitContext,
    ) -> Result<BatchOutcome, IngestError> {
        self.run(stream, std::slice::from_ref(record), Operation::PutRecord, ctx)
            .await
    }

    async fn dispatch(
        &self,
        stream: &str,
        operation: Operation,
        batch: &[&EncodedRecord],
        ctx: &SubmitContext,
    ) -> Result<Vec<RecordResult>, ClientError> {
        match (operation, batch) {
            (Operation::PutRecord, [record]) => Ok(vec![self.client.put_record_within(stream, record, ctx).await?]),
            _ => self.client.put_records_within(stream, batch, ctx).await,
        }
    }

    async fn run(
        &self,
        stream: &str,
        records: &[EncodedRecord],
        operation: Operation,
        ctx: &SubmitContext,
    ) -> Result<BatchOutcome, IngestError> {
        let mut ledger = Ledger::new(records.len());
        let mut working: Vec<usize> = (0..records.len()).collect();
        let mut attempt: u32 = 0;

        loop {
            if ctx.is_done() {
                debug!("✂️ '{}' cancelled before attempt {}", stream, attempt + 1);
                ledger.cancel_all(&working);
                break;
            }

            attempt += 1;
            let batch: Vec<&EncodedRecord> = working.iter().map(|&index| &records[index]).collect();
            let started = Instant::now();
            let call = match self.dispatch(stream, operation, &batch, ctx).await {
                Err(ClientError::Cancelled { .. }) => {
                    // -- ✂️ gave up at the governor; this attempt never reached the wire
                    debug!("✂️ '{}' cancelled while attempt {} waited for capacity", stream, attempt);
                    ledger.cancel_all(&working);
                    break;
                }
                call => call,
            };
            let elapsed = started.elapsed();
            debug!(
                "📡 {} attempt {} on '{}': {} records in {:?}",
                operation,
                attempt,
                stream,
                batch.len(),
                elapsed
            );

            ledger.attempts.push(AttemptRecord {
                attempt_number: attempt,
                record_indices: working.iter().copied().collect(),
                elapsed,
                service_error_code: call.as_ref().err().map(|err| err.code().to_string()),
            });

            let verdict = match call {
                Ok(results) => self.evaluate(&mut ledger, &working, results),
                Err(ClientError::ThrottledLocally { stream, waited }) if attempt == 1 => {
                    // -- 🚦 nothing ever left the building; the caller gets the denial itself
                    return Err(IngestError::ThrottledLocally { stream, waited });
                }
                Err(err) => self.evaluate_call_failure(&mut ledger, &working, err),
            };

            let retryable = match verdict {
                Verdict::Settled => break,
                Verdict::Abort => break,
                Verdict::Retry(retryable) => retryable,
            };

            if attempt >= self.policy.max_attempts() {
                warn!(
                    "💀 '{}': {} records still failing after {} attempts",
                    stream,
                    retryable.len(),
                    attempt
                );
                ledger.fail_with_last_reason(&retryable);
                break;
            }

            let delay = self.policy.backoff(attempt);
            warn!(
                "🔄 '{}': retrying {} of {} records in {:?}",
                stream,
                retryable.len(),
                records.len(),
                delay
            );
            tokio::select! {
                _ = sleep(delay) => {}
                _ = ctx.done() => {
                    debug!("✂️ '{}' cancelled during backoff after attempt {}", stream, attempt);
                    ledger.cancel_all(&retryable);
                    break;
                }
            }
            working = retryable;
        }

        Ok(ledger.into_outcome())
    }

    /// 🔍 Sort one call's per-record results into final and retry-again.
    fn evaluate(&self, ledger: &mut Ledger, working: &[usize], results: Vec<RecordResult>) -> Verdict {
        if results.len() != working.len() {
            let reason = FailureReason::malformed(format!(
                "sent {} records, got {} results",
                working.len(),
                results.len()
            ));
            ledger.fail_all(working, &reason);
            return Verdict::Settled;
        }

        let mut retryable = Vec::new();
        for (&index, result) in working.iter().zip(results) {
            match result {
                RecordResult::Succeeded {
                    sequence_number,
                    shard_id,
                } => {
                    ledger.resolved[index] = Some(RecordOutcome::succeeded(index, sequence_number, shard_id));
                }
                RecordResult::Failed(reason) => match self.classifier.classify_record(&reason) {
                    RecordFailureKind::Retryable => {
                        ledger.last_reason[index] = Some(reason);
                        retryable.push(index);
                    }
                    RecordFailureKind::Terminal => {
                        ledger.resolved[index] = Some(RecordOutcome::failed(index, reason));
                    }
                },
            }
        }

        if retryable.is_empty() {
            Verdict::Settled
        } else {
            Verdict::Retry(retryable)
        }
    }

    /// 💥 The whole call failed. Decide for the whole working set at once.
    fn evaluate_call_failure(&self, ledger: &mut Ledger, working: &[usize], err: ClientError) -> Verdict {
        let (kind, reason) = match err {
            ClientError::Cancelled { .. } => {
                ledger.cancel_all(working);
                return Verdict::Settled;
            }
            ClientError::Transport(message) => (CallFailureKind::Retryable, FailureReason::transport(message)),
            ClientError::Auth { code, message } => (CallFailureKind::Auth, FailureReason::new(code, Some(message))),
            ClientError::Service { code, message } => {
                (self.classifier.classify_call(&code), FailureReason::new(code, Some(message)))
            }
            ClientError::ThrottledLocally { stream, waited } => (
                CallFailureKind::Terminal,
                FailureReason::throttled_locally(format!("'{stream}' denied capacity after {waited:?}")),
            ),
            ClientError::MalformedResponse(message) => (CallFailureKind::Terminal, FailureReason::malformed(message)),
        };

        match kind {
            CallFailureKind::Retryable => {
                for &index in working {
                    ledger.last_reason[index] = Some(reason.clone());
                }
                Verdict::Retry(working.to_vec())
            }
            CallFailureKind::Terminal => {
                ledger.fail_all(working, &reason);
                Verdict::Settled
            }
            CallFailureKind::Auth => {
                warn!("🔒 aborting submission: {}", reason);
                // -- everything not yet succeeded is in the working set; earlier successes stay put
                ledger.fail_all(working, &reason);
                ledger.fatal = Some(reason);
                Verdict::Abort
            }
        }
    }
}
