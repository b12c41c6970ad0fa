//! 🚦 The Rate/Concurrency Governor: the bouncer at the door of every stream.
//!
//! 🎬 *[two hundred virtual users arrive at once. the stream has two shards.]*
//! *[the bouncer looks at the list. the bouncer looks at the crowd. the bouncer sighs.]*
//!
//! Every network attempt, first try or fifth retry, asks the governor for capacity first.
//! Per stream there is a [`StreamBudget`] made of:
//! - an in-flight semaphore (how many requests may be on the wire at once),
//! - a records token bucket and a bytes token bucket (how fast we may push).
//!
//! Buckets refill continuously. Capacity and rate are config, never constants.
//! When capacity does not show up before `wait_timeout`, the caller gets
//! `ThrottledLocally`, which is us throttling ourselves, not the service throttling us.
//!
//! ✂️ The wait also watches the caller's `SubmitContext`. A cancelled or expired caller
//! stops waiting at once and sends nothing.
//!
//! ⚠️ Bucket state sits behind a std `Mutex` that is never held across an `.await`.
//! The waiting happens outside the lock, on the caller's own timer. Nobody else waits with you. 🦆

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, warn};

use crate::backends::StreamClient;
use crate::common::{EncodedRecord, RecordResult};
use crate::coordinator::SubmitContext;
use crate::errors::{ClientError, GovernorError};

// -- 🕐 never sleep for less than this, or float rounding turns the wait loop into a spin loop
const MIN_WAIT: Duration = Duration::from_millis(1);

/// 🔧 Limits for one stream. A burst of 0 switches that bucket off.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StreamLimits {
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    #[serde(default = "default_records_per_second")]
    pub records_per_second: f64,
    #[serde(default = "default_record_burst")]
    pub record_burst: f64,
    #[serde(default = "default_bytes_per_second")]
    pub bytes_per_second: f64,
    /// 📏 Defaults to 5 MiB so a maximum-size batch can ever get through.
    #[serde(default = "default_byte_burst")]
    pub byte_burst: f64,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

fn default_max_in_flight() -> usize {
    64
}

// -- 📡 one shard's worth of write throughput
fn default_records_per_second() -> f64 {
    1_000.0
}

fn default_record_burst() -> f64 {
    1_000.0
}

fn default_bytes_per_second() -> f64 {
    1024.0 * 1024.0
}

fn default_byte_burst() -> f64 {
    5.0 * 1024.0 * 1024.0
}

fn default_wait_timeout_ms() -> u64 {
    5_000
}

impl Default for StreamLimits {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            records_per_second: default_records_per_second(),
            record_burst: default_record_burst(),
            bytes_per_second: default_bytes_per_second(),
            byte_burst: default_byte_burst(),
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

/// 🔧 Defaults for every stream, plus overrides by stream name.
///
/// ```toml
/// [engine.governor.defaults]
/// records_per_second = 2000
///
/// [engine.governor.streams.clickstream]
/// max_in_flight = 8
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct GovernorConfig {
    #[serde(default)]
    pub defaults: StreamLimits,
    #[serde(default)]
    pub streams: HashMap<String, StreamLimits>,
}

impl GovernorConfig {
    pub fn limits_for(&self, stream: &str) -> &StreamLimits {
        self.streams.get(stream).unwrap_or(&self.defaults)
    }
}

/// 💰 What one network attempt costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireCost {
    pub records: usize,
    pub bytes: usize,
}

impl AcquireCost {
    pub fn records(records: usize) -> Self {
        Self { records, bytes: 0 }
    }

    pub fn of_record(record: &EncodedRecord) -> Self {
        Self {
            records: 1,
            bytes: record.size_bytes(),
        }
    }

    pub fn of_records(records: &[&EncodedRecord]) -> Self {
        Self {
            records: records.len(),
            bytes: records.iter().map(|r| r.size_bytes()).sum(),
        }
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// 🪣 Continuous-refill token bucket. Starts full.
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    rate: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    fn new(capacity: f64, rate: f64) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            capacity,
            rate: rate.max(0.0),
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// 🔒 A cost bigger than the whole bucket could never be paid, so it pays the whole bucket.
    fn clamp(&self, cost: f64) -> f64 {
        cost.min(self.capacity)
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_refill = now;
    }

    /// ⏳ How long until `cost` tokens exist. `None` means never (rate 0).
    fn eta(&self, state: &BucketState, cost: f64) -> Option<Duration> {
        let missing = cost - state.tokens;
        if missing <= 0.0 {
            Some(Duration::ZERO)
        } else if self.rate > 0.0 {
            Some(Duration::from_secs_f64(missing / self.rate).max(MIN_WAIT))
        } else {
            None
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refund(&self, cost: f64) {
        let mut state = self.lock();
        state.tokens = (state.tokens + cost).min(self.capacity);
    }

    fn available(&self) -> f64 {
        let mut state = self.lock();
        self.refill(&mut state, Instant::now());
        state.tokens
    }
}

/// 🎟️ Proof that capacity was granted. Holds an in-flight slot until dropped.
#[derive(Debug)]
pub struct GovernorPermit {
    _in_flight: OwnedSemaphorePermit,
}

/// 💰 Everything one stream is allowed to do. Shared by every caller on that stream.
#[derive(Debug)]
pub struct StreamBudget {
    stream: String,
    in_flight: Arc<Semaphore>,
    records: TokenBucket,
    bytes: TokenBucket,
    wait_timeout: Duration,
}

impl StreamBudget {
    pub fn new(stream: impl Into<String>, limits: &StreamLimits) -> Self {
        Self {
            stream: stream.into(),
            in_flight: Arc::new(Semaphore::new(limits.max_in_flight.max(1))),
            records: TokenBucket::new(limits.record_burst, limits.records_per_second),
            bytes: TokenBucket::new(limits.byte_burst, limits.bytes_per_second),
            wait_timeout: Duration::from_millis(limits.wait_timeout_ms),
        }
    }

    /// 🎯 Both buckets or neither. Locks are taken records-then-bytes, always.
    /// On shortfall, returns how long to wait (`None` = no refill is coming).
    fn try_take(&self, records: f64, bytes: f64) -> Result<(), Option<Duration>> {
        let now = Instant::now();
        let mut record_state = self.records.lock();
        let mut byte_state = self.bytes.lock();
        self.records.refill(&mut record_state, now);
        self.bytes.refill(&mut byte_state, now);

        let record_eta = self.records.eta(&record_state, records);
        let byte_eta = self.bytes.eta(&byte_state, bytes);
        match (record_eta, byte_eta) {
            (Some(a), Some(b)) if a.is_zero() && b.is_zero() => {
                record_state.tokens -= records;
                byte_state.tokens -= bytes;
                Ok(())
            }
            (Some(a), Some(b)) => Err(Some(a.max(b))),
            _ => Err(None),
        }
    }

    /// 🚦 Wait (on the caller's own timer) until tokens and an in-flight slot are both
    /// available, or fail with `ThrottledLocally` once `wait_timeout` is spent.
    pub async fn acquire(&self, cost: AcquireCost) -> Result<GovernorPermit, GovernorError> {
        self.acquire_within(cost, &SubmitContext::new()).await
    }

    /// ✂️ Same as [`acquire`](Self::acquire), but gives up with `Cancelled` as soon as
    /// `ctx` is cancelled or past its deadline. Tokens already taken go back to the bucket.
    pub async fn acquire_within(
        &self,
        cost: AcquireCost,
        ctx: &SubmitContext,
    ) -> Result<GovernorPermit, GovernorError> {
        let started = Instant::now();
        let deadline = started + self.wait_timeout;
        let records = self.records.clamp(cost.records as f64);
        let bytes = self.bytes.clamp(cost.bytes as f64);

        loop {
            match self.try_take(records, bytes) {
                Ok(()) => break,
                Err(eta) => {
                    let now = Instant::now();
                    if ctx.is_done() {
                        return Err(self.cancelled(started));
                    }
                    if now >= deadline {
                        return Err(self.throttled(started));
                    }
                    let wake = match eta {
                        Some(eta) => (now + eta).min(deadline),
                        None => deadline,
                    };
                    debug!("🚦 '{}' waiting {:?} for tokens", self.stream, wake - now);
                    tokio::select! {
                        _ = sleep_until(wake) => {}
                        _ = ctx.done() => return Err(self.cancelled(started)),
                    }
                }
            }
        }

        let slot = tokio::select! {
            slot = timeout_at(deadline, Arc::clone(&self.in_flight).acquire_owned()) => match slot {
                Ok(Ok(permit)) => Ok(permit),
                Ok(Err(_)) | Err(_) => Err(self.throttled(started)),
            },
            _ = ctx.done() => Err(self.cancelled(started)),
        };
        match slot {
            Ok(permit) => Ok(GovernorPermit { _in_flight: permit }),
            // -- 💸 got the tokens, never got a slot. give the tokens back.
            Err(err) => {
                self.records.refund(records);
                self.bytes.refund(bytes);
                Err(err)
            }
        }
    }

    fn cancelled(&self, started: Instant) -> GovernorError {
        let waited = started.elapsed();
        debug!("✂️ gave up waiting on '{}' after {:?}, the caller is gone", self.stream, waited);
        GovernorError::Cancelled {
            stream: self.stream.clone(),
            waited,
        }
    }

    fn throttled(&self, started: Instant) -> GovernorError {
        let waited = started.elapsed();
        warn!("🚦 throttled locally on '{}' after {:?}", self.stream, waited);
        GovernorError::ThrottledLocally {
            stream: self.stream.clone(),
            waited,
        }
    }

    pub fn available_records(&self) -> f64 {
        self.records.available()
    }

    pub fn available_bytes(&self) -> f64 {
        self.bytes.available()
    }

    pub fn available_in_flight(&self) -> usize {
        self.in_flight.available_permits()
    }
}

#[derive(Debug)]
struct GovernorInner {
    config: GovernorConfig,
    budgets: RwLock<HashMap<String, Arc<StreamBudget>>>,
}

/// 🗂️ The registry of budgets, one per stream name, created on first use and kept
/// for the life of the process. Clones share the registry.
#[derive(Debug, Clone)]
pub struct RateGovernor {
    inner: Arc<GovernorInner>,
}

impl RateGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            inner: Arc::new(GovernorInner {
                config,
                budgets: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// 🔍 Read-lock fast path, write-lock slow path on first sight of a stream.
    pub fn budget(&self, stream: &str) -> Arc<StreamBudget> {
        if let Some(budget) = self
            .inner
            .budgets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(stream)
        {
            return Arc::clone(budget);
        }

        let mut budgets = self.inner.budgets.write().unwrap_or_else(PoisonError::into_inner);
        let budget = budgets.entry(stream.to_string()).or_insert_with(|| {
            debug!("🆕 new budget for stream '{}'", stream);
            Arc::new(StreamBudget::new(stream, self.inner.config.limits_for(stream)))
        });
        Arc::clone(budget)
    }

    pub async fn acquire(&self, stream: &str, cost: AcquireCost) -> Result<GovernorPermit, GovernorError> {
        self.budget(stream).acquire(cost).await
    }

    pub async fn acquire_within(
        &self,
        stream: &str,
        cost: AcquireCost,
        ctx: &SubmitContext,
    ) -> Result<GovernorPermit, GovernorError> {
        self.budget(stream).acquire_within(cost, ctx).await
    }
}

/// 🎁 Wraps any `StreamClient` so every call, retries included, asks the governor first.
///
/// Only the wait for capacity is cancellable. Once the permit is in hand the call goes
/// out and is allowed to land.
#[derive(Debug, Clone)]
pub struct GovernedClient<C> {
    inner: C,
    governor: RateGovernor,
}

impl<C> GovernedClient<C> {
    pub fn new(inner: C, governor: RateGovernor) -> Self {
        Self { inner, governor }
    }

    pub fn governor(&self) -> &RateGovernor {
        &self.governor
    }
}

#[async_trait]
impl<C: StreamClient> StreamClient for GovernedClient<C> {
    async fn put_record(&self, stream: &str, record: &EncodedRecord) -> Result<RecordResult, ClientError> {
        self.put_record_within(stream, record, &SubmitContext::new()).await
    }

    async fn put_records(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
    ) -> Result<Vec<RecordResult>, ClientError> {
        self.put_records_within(stream, records, &SubmitContext::new()).await
    }

    async fn put_record_within(
        &self,
        stream: &str,
        record: &EncodedRecord,
        ctx: &SubmitContext,
    ) -> Result<RecordResult, ClientError> {
        let _permit = self
            .governor
            .acquire_within(stream, AcquireCost::of_record(record), ctx)
            .await?;
        self.inner.put_record(stream, record).await
    }

    async fn put_records_within(
        &self,
        stream: &str,
        records: &[&EncodedRecord],
        ctx: &SubmitContext,
    ) -> Result<Vec<RecordResult>, ClientError> {
        let _permit = self
            .governor
            .acquire_within(stream, AcquireCost::of_records(records), ctx)
            .await?;
        self.inner.put_records(stream, records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{InMemoryConfig, InMemoryStreamClient};
    use crate::common::Record;
    use crate::encoder::encode;
    use futures::future::join_all;
    use tokio_util::sync::CancellationToken;

    fn limits(record_burst: f64, records_per_second: f64) -> StreamLimits {
        StreamLimits {
            max_in_flight: 1_000,
            records_per_second,
            record_burst,
            bytes_per_second: 0.0,
            byte_burst: 0.0,
            wait_timeout_ms: 500,
        }
    }

    fn governor_with(defaults: StreamLimits) -> RateGovernor {
        RateGovernor::new(GovernorConfig {
            defaults,
            streams: HashMap::new(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_capacity_plus_one_means_one_sad_caller() {
        let the_governor = governor_with(limits(3.0, 0.0));
        let started = Instant::now();

        let results = join_all((0..4).map(|_| the_governor.acquire("orders", AcquireCost::records(1)))).await;

        let granted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(granted, 3);
        let denied: Vec<&GovernorError> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(denied.len(), 1);
        match denied[0] {
            GovernorError::ThrottledLocally { stream, waited } => {
                assert_eq!(stream, "orders");
                assert!(*waited >= Duration::from_millis(500), "waited only {waited:?}");
            }
            other => panic!("💀 expected local throttling, got {other:?}"),
        }
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_the_bucket_refills_while_you_wait() {
        let the_governor = governor_with(limits(2.0, 10.0));
        let _a = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("burst");
        let _b = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("burst");

        let started = Instant::now();
        let _c = the_governor
            .acquire("orders", AcquireCost::records(1))
            .await
            .expect("💀 10 tokens per second should refill one token well within 500ms");
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(100), "waited only {waited:?}");
        assert!(waited < Duration::from_millis(500), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_streams_do_not_share_a_wallet() {
        let the_governor = governor_with(limits(1.0, 0.0));
        let _orders = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("first on orders");
        assert!(the_governor.acquire("orders", AcquireCost::records(1)).await.is_err());

        let started = Instant::now();
        let _clicks = the_governor
            .acquire("clicks", AcquireCost::records(1))
            .await
            .expect("💀 an empty orders bucket must not starve clicks");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_in_flight_slots_run_out_and_tokens_come_home() {
        let the_governor = governor_with(StreamLimits {
            max_in_flight: 2,
            ..limits(10.0, 0.0)
        });
        let first = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("slot 1");
        let _second = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("slot 2");
        let the_budget = the_governor.budget("orders");
        assert_eq!(the_budget.available_in_flight(), 0);
        assert_eq!(the_budget.available_records(), 8.0);

        assert!(matches!(
            the_governor.acquire("orders", AcquireCost::records(3)).await,
            Err(GovernorError::ThrottledLocally { .. })
        ));
        // -- 💸 the 3 tokens taken before the slot wait timed out were refunded
        assert_eq!(the_budget.available_records(), 8.0);

        drop(first);
        assert!(the_governor.acquire("orders", AcquireCost::records(1)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_a_whale_of_a_batch_pays_the_whole_bucket_and_no_more() {
        let the_governor = governor_with(limits(100.0, 0.0));
        let _whale = the_governor
            .acquire("orders", AcquireCost::records(500))
            .await
            .expect("💀 oversized cost is clamped to capacity, not rejected forever");
        assert_eq!(the_governor.budget("orders").available_records(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_a_named_stream_gets_its_own_rules() {
        let mut the_config = GovernorConfig {
            defaults: limits(100.0, 0.0),
            streams: HashMap::new(),
        };
        the_config.streams.insert("tiny".to_string(), limits(1.0, 0.0));
        let the_governor = RateGovernor::new(the_config);

        let _one = the_governor.acquire("tiny", AcquireCost::records(1)).await.expect("first");
        assert!(the_governor.acquire("tiny", AcquireCost::records(1)).await.is_err());
        assert_eq!(the_governor.budget("roomy").available_records(), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_the_governed_client_never_bothers_the_stream() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default());
        let the_client = GovernedClient::new(the_stream.clone(), governor_with(limits(1.0, 0.0)));
        let the_record = encode(Record::new(b"hello".to_vec(), "k")).expect("valid record");

        assert!(the_client.put_record("orders", &the_record).await.is_ok());
        match the_client.put_record("orders", &the_record).await {
            Err(ClientError::ThrottledLocally { stream, .. }) => assert_eq!(stream, "orders"),
            other => panic!("💀 expected local throttling, got {other:?}"),
        }
        assert_eq!(the_stream.call_count().await, 1, "the denied call must never reach the stream");
    }
    #[tokio::test(start_paused = true)]
    async fn the_one_where_the_caller_walks_away_from_the_token_line() {
        let the_governor = governor_with(StreamLimits {
            wait_timeout_ms: 5_000,
            ..limits(1.0, 2.0)
        });
        let _first = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("burst");
        let the_token = CancellationToken::new();
        let the_ctx = SubmitContext::new().with_cancellation(the_token.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            the_token.cancel();
        });
        let started = Instant::now();

        let result = the_governor
            .acquire_within("orders", AcquireCost::records(1), &the_ctx)
            .await;

        assert!(matches!(result, Err(GovernorError::Cancelled { .. })), "got {result:?}");
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(100), "waited only {waited:?}");
        assert!(waited < Duration::from_millis(500), "sat out the refill anyway: {waited:?}");
        canceller.await.expect("canceller task");
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_a_deadline_gives_up_the_slot_wait_and_the_tokens_come_home() {
        let the_governor = governor_with(StreamLimits {
            max_in_flight: 1,
            wait_timeout_ms: 5_000,
            ..limits(10.0, 0.0)
        });
        let _hog = the_governor.acquire("orders", AcquireCost::records(1)).await.expect("the only slot");
        let the_ctx = SubmitContext::new().with_timeout(Duration::from_millis(250));
        let started = Instant::now();

        let result = the_governor
            .acquire_within("orders", AcquireCost::records(4), &the_ctx)
            .await;

        assert!(matches!(result, Err(GovernorError::Cancelled { .. })), "got {result:?}");
        assert!(started.elapsed() < Duration::from_millis(5_000));
        assert_eq!(the_governor.budget("orders").available_records(), 9.0);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_big_records_run_the_byte_bucket_dry() {
        let the_governor = governor_with(StreamLimits {
            byte_burst: 100.0,
            bytes_per_second: 50.0,
            wait_timeout_ms: 5_000,
            ..limits(100.0, 0.0)
        });
        let the_record = encode(Record::new(vec![b'x'; 79], "k")).expect("valid record");
        let the_cost = AcquireCost::of_record(&the_record);
        assert_eq!(the_cost.bytes, 80, "partition key bytes count too");

        let _first = the_governor.acquire("orders", the_cost).await.expect("fits the burst");
        assert_eq!(the_governor.budget("orders").available_bytes(), 20.0);

        let started = Instant::now();
        let _second = the_governor
            .acquire("orders", the_cost)
            .await
            .expect("💀 50 bytes per second refills 60 bytes well within 5s");
        // -- 60 missing bytes at 50 bytes per second
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(1_200), "waited only {waited:?}");
        assert!(waited < Duration::from_millis(1_300), "waited {waited:?}");
        assert_eq!(the_governor.budget("orders").available_records(), 98.0);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_a_cancelled_governed_call_never_reaches_the_stream() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default());
        let the_client = GovernedClient::new(
            the_stream.clone(),
            governor_with(StreamLimits {
                wait_timeout_ms: 5_000,
                ..limits(1.0, 1.0)
            }),
        );
        let the_record = encode(Record::new(b"hello".to_vec(), "k")).expect("valid record");
        let the_ctx = SubmitContext::new().with_timeout(Duration::from_millis(50));

        assert!(the_client.put_records_within("orders", &[&the_record], &the_ctx).await.is_ok());
        match the_client.put_records_within("orders", &[&the_record], &the_ctx).await {
            Err(ClientError::Cancelled { stream }) => assert_eq!(stream, "orders"),
            other => panic!("💀 expected cancellation, got {other:?}"),
        }
        assert_eq!(the_stream.call_count().await, 1);
    }
}
