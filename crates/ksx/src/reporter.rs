//! 📊 Result Reporter: turns a `BatchOutcome` into something a human (or a dashboard) can read.
//!
//! Pure transformation. It does not retry, it does not mutate, it does not judge.
//! Well. It counts. Counting is a mild form of judging.
//!
//! 🧠 Knowledge graph:
//! - `Report`: what the caller gets back (counts, first error, per-record outcomes, elapsed).
//! - `SubmissionEvent`: one per submission, handed to a `MetricsCollector`.
//! - `TracingCollector`: logs the event. `LoadMetrics`: aggregates for the CLI summary.
//! - `Collectors`: fan-out, so both can listen at once. 🦆

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::backends::Operation;
use crate::common::{BatchOutcome, FailureReason, RecordOutcome, RecordStatus};
use crate::errors::IngestError;

/// 🥇 The lowest-index failure in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstError {
    pub original_index: usize,
    pub reason: FailureReason,
}

/// 📋 The caller-facing result of one `put_record` / `put_records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub stream_name: String,
    pub operation: Operation,
    pub success_count: usize,
    pub failure_count: usize,
    pub cancelled_count: usize,
    pub first_error: Option<FirstError>,
    pub records: Vec<RecordOutcome>,
    pub attempt_count: usize,
    pub elapsed: Duration,
}

impl Report {
    pub fn from_outcome(stream_name: &str, operation: Operation, outcome: BatchOutcome, elapsed: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut cancelled_count = 0;
        let mut first_error = None;
        for record in &outcome.outcomes {
            match &record.status {
                RecordStatus::Succeeded => success_count += 1,
                RecordStatus::Cancelled => cancelled_count += 1,
                RecordStatus::Failed(reason) => {
                    failure_count += 1;
                    // -- outcomes are ordered by index, so the first one we see is the lowest
                    if first_error.is_none() {
                        first_error = Some(FirstError {
                            original_index: record.original_index,
                            reason: reason.clone(),
                        });
                    }
                }
            }
        }

        Self {
            stream_name: stream_name.to_string(),
            operation,
            success_count,
            failure_count,
            cancelled_count,
            first_error,
            attempt_count: outcome.attempts.len(),
            records: outcome.outcomes,
            elapsed,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.success_count == self.records.len()
    }

    /// 📄 Single puts only: the sequence number and shard of the one record.
    pub fn sequence_number(&self) -> Option<&str> {
        self.records.first().and_then(|r| r.sequence_number.as_deref())
    }

    pub fn shard_id(&self) -> Option<&str> {
        self.records.first().and_then(|r| r.shard_id.as_deref())
    }
}

/// 📡 What a metrics collector hears about each submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionEvent {
    pub stream_name: String,
    pub operation: Operation,
    pub record_count: usize,
    pub total_bytes: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub cancelled_count: usize,
    pub attempt_count: usize,
    pub elapsed: Duration,
    /// Set when the submission raised instead of reporting.
    pub error: Option<String>,
}

impl SubmissionEvent {
    pub fn from_report(report: &Report, total_bytes: usize) -> Self {
        Self {
            stream_name: report.stream_name.clone(),
            operation: report.operation,
            record_count: report.record_count(),
            total_bytes,
            success_count: report.success_count,
            failure_count: report.failure_count,
            cancelled_count: report.cancelled_count,
            attempt_count: report.attempt_count,
            elapsed: report.elapsed,
            error: None,
        }
    }

    /// 💀 The submission raised. Every record counts as failed for the metrics.
    pub fn from_error(
        stream_name: &str,
        operation: Operation,
        record_count: usize,
        elapsed: Duration,
        error: &IngestError,
    ) -> Self {
        Self {
            stream_name: stream_name.to_string(),
            operation,
            record_count,
            total_bytes: 0,
            success_count: 0,
            failure_count: record_count,
            cancelled_count: 0,
            attempt_count: 0,
            elapsed,
            error: Some(error.to_string()),
        }
    }
}

/// 📡 Somewhere to send submission events. Must not block; it is called on the hot path.
pub trait MetricsCollector: std::fmt::Debug + Send + Sync {
    fn record(&self, event: &SubmissionEvent);
}

/// 📝 Logs each submission as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCollector;

impl MetricsCollector for TracingCollector {
    fn record(&self, event: &SubmissionEvent) {
        info!(
            stream = %event.stream_name,
            operation = %event.operation,
            records = event.record_count,
            bytes = event.total_bytes,
            succeeded = event.success_count,
            failed = event.failure_count,
            cancelled = event.cancelled_count,
            attempts = event.attempt_count,
            elapsed_ms = event.elapsed.as_millis() as u64,
            error = event.error.as_deref().unwrap_or(""),
            "📊 submission finished"
        );
    }
}

/// 📣 Many listeners, one event.
#[derive(Debug, Default, Clone)]
pub struct Collectors(pub Vec<Arc<dyn MetricsCollector>>);

impl MetricsCollector for Collectors {
    fn record(&self, event: &SubmissionEvent) {
        for collector in &self.0 {
            collector.record(event);
        }
    }
}

// -- ⏱️ upper bounds of the latency buckets; anything slower lands in the overflow bucket
const LATENCY_BOUNDS_MS: [u64; 14] = [1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

/// 🪣 Fixed-size latency histogram. Memory stays flat however long the run goes.
#[derive(Debug, Clone, Copy, Default)]
struct LatencyHistogram {
    counts: [u64; LATENCY_BOUNDS_MS.len() + 1],
    total: u64,
    max: Duration,
}

impl LatencyHistogram {
    fn record(&mut self, elapsed: Duration) {
        let bucket = LATENCY_BOUNDS_MS
            .iter()
            .position(|&bound| elapsed <= Duration::from_millis(bound))
            .unwrap_or(LATENCY_BOUNDS_MS.len());
        self.counts[bucket] += 1;
        self.total += 1;
        self.max = self.max.max(elapsed);
    }

    /// 🎯 Nearest-rank, reported as the upper bound of the bucket the rank falls in,
    /// never above the slowest submission actually seen.
    fn percentile(&self, pct: f64) -> Duration {
        if self.total == 0 {
            return Duration::ZERO;
        }
        let rank = (((pct / 100.0) * self.total as f64).ceil() as u64).clamp(1, self.total);
        let mut seen = 0;
        for (bucket, &count) in self.counts.iter().enumerate() {
            seen += count;
            if seen >= rank {
                return LATENCY_BOUNDS_MS
                    .get(bucket)
                    .map_or(self.max, |&bound| Duration::from_millis(bound).min(self.max));
            }
        }
        self.max
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct LoadTotals {
    submissions: u64,
    errors: u64,
    records: u64,
    bytes: u64,
    succeeded: u64,
    failed: u64,
    cancelled: u64,
    attempts: u64,
    latency: LatencyHistogram,
}

/// 📸 A frozen copy of the load totals, with latency percentiles worked out.
///
/// Percentiles have bucket resolution (see `LATENCY_BOUNDS_MS`); `max` is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSnapshot {
    pub submissions: u64,
    pub errors: u64,
    pub records: u64,
    pub bytes: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub attempts: u64,
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub max: Duration,
}

/// 📈 Aggregates every submission of a load run. Shared by all virtual users.
#[derive(Debug, Default)]
pub struct LoadMetrics {
    totals: Mutex<LoadTotals>,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 📸 Copies the totals out and lets go of the lock before doing any math.
    pub fn snapshot(&self) -> LoadSnapshot {
        let totals = *self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        LoadSnapshot {
            submissions: totals.submissions,
            errors: totals.errors,
            records: totals.records,
            bytes: totals.bytes,
            succeeded: totals.succeeded,
            failed: totals.failed,
            cancelled: totals.cancelled,
            attempts: totals.attempts,
            p50: totals.latency.percentile(50.0),
            p95: totals.latency.percentile(95.0),
            p99: totals.latency.percentile(99.0),
            max: totals.latency.max,
        }
    }
}

impl MetricsCollector for LoadMetrics {
    fn record(&self, event: &SubmissionEvent) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.submissions += 1;
        if event.error.is_some() {
            totals.errors += 1;
        }
        totals.records += event.record_count as u64;
        totals.bytes += event.total_bytes as u64;
        totals.succeeded += event.success_count as u64;
        totals.failed += event.failure_count as u64;
        totals.cancelled += event.cancelled_count as u64;
        totals.attempts += event.attempt_count as u64;
        totals.latency.record(event.elapsed);
    }
}
