//! 🎬 *[a virtual user wakes up. it has one job. it has had this job for 0.3 seconds.]*
//! *[it builds a batch. it sends the batch. it builds another batch.]*
//! *[it does not get tired. it does not get paid. it does not unionize. yet.]*
//!
//! 🏃 A `VirtualUser` loops `put_record` / `put_records` against one shared `Client`
//! until its iterations run out or the supervisor pulls the plug.
//!
//! - local throttling is expected under load: logged, counted, carry on
//! - an auth failure means every other user will hit the same wall: stop everyone
//! - a validation failure means the workload config is broken: stop everyone

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Worker;
use crate::client::{Client, PutRecordInput, PutRecordsEntry, PutRecordsInput};
use crate::coordinator::SubmitContext;
use crate::errors::IngestError;
use crate::supervisors::config::{WorkloadConfig, WorkloadMode};

#[derive(Debug)]
pub(crate) struct VirtualUser {
    id: usize,
    client: Client,
    workload: Arc<WorkloadConfig>,
    iterations: Option<u64>,
    stop: CancellationToken,
}

impl VirtualUser {
    pub(crate) fn new(
        id: usize,
        client: Client,
        workload: Arc<WorkloadConfig>,
        iterations: Option<u64>,
        stop: CancellationToken,
    ) -> Self {
        Self {
            id,
            client,
            workload,
            iterations,
            stop,
        }
    }

    /// 🧪 `[vu][iteration][sequence]` stamped at the front, filler to the configured size.
    fn payload(&self, iteration: u64, sequence: usize) -> Vec<u8> {
        let mut data = format!("vu={} it={} seq={} ", self.id, iteration, sequence).into_bytes();
        data.resize(self.workload.record_size_bytes.max(1), b'x');
        data
    }

    fn partition_key(&self) -> String {
        let key_count = self.workload.partition_key_count.max(1);
        format!("pk-{}", rand::rng().random_range(0..key_count))
    }

    async fn iterate(&self, iteration: u64) -> Result<(), IngestError> {
        let ctx = SubmitContext::new().with_cancellation(self.stop.clone());
        match self.workload.mode {
            WorkloadMode::PutRecord => {
                let input = PutRecordInput::new(
                    self.workload.stream_name.clone(),
                    self.payload(iteration, 0),
                    self.partition_key(),
                );
                self.client.put_record_with(input, ctx).await?;
            }
            WorkloadMode::PutRecords => {
                let records = (0..self.workload.batch_size)
                    .map(|sequence| PutRecordsEntry::new(self.payload(iteration, sequence), self.partition_key()))
                    .collect();
                let input = PutRecordsInput {
                    records,
                    stream_name: self.workload.stream_name.clone(),
                };
                self.client.put_records_with(input, ctx).await?;
            }
        }
        Ok(())
    }

    async fn run(self) -> Result<()> {
        debug!("🏃 virtual user {} reporting for duty", self.id);
        let think_time = Duration::from_millis(self.workload.think_time_ms);
        let mut iteration: u64 = 0;

        while !self.stop.is_cancelled() && self.iterations.is_none_or(|limit| iteration < limit) {
            match self.iterate(iteration).await {
                Ok(()) => {}
                Err(IngestError::ThrottledLocally { stream, waited }) => {
                    warn!("🚦 vu {}: throttled locally on '{}' after {:?}", self.id, stream, waited);
                }
                Err(fatal) => {
                    // -- 💀 everyone else is about to hit the same wall
                    self.stop.cancel();
                    return Err(fatal)
                        .with_context(|| format!("💀 virtual user {} gave up at iteration {}", self.id, iteration));
                }
            }
            iteration += 1;

            if !think_time.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(think_time) => {}
                    _ = self.stop.cancelled() => {}
                }
            }
        }

        debug!("🏁 virtual user {} done after {} iterations", self.id, iteration);
        Ok(())
    }
}

impl Worker for VirtualUser {
    fn start(self) -> JoinHandle<Result<()>> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{InMemoryConfig, InMemoryStreamClient, ScriptedResponse, StreamBackend};
    use crate::client::EngineConfig;
    use crate::errors::ClientError;

    fn workload(mode: WorkloadMode) -> Arc<WorkloadConfig> {
        Arc::new(WorkloadConfig {
            stream_name: "orders".to_string(),
            mode,
            batch_size: 5,
            record_size_bytes: 64,
            partition_key_count: 3,
            think_time_ms: 0,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_the_virtual_user_clocks_out_on_time() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default());
        let the_client = Client::with_backend(StreamBackend::InMemory(the_stream.clone()), &EngineConfig::default());
        let the_user = VirtualUser::new(0, the_client, workload(WorkloadMode::PutRecords), Some(3), CancellationToken::new());

        the_user.start().await.expect("💀 no panic").expect("💀 no error");

        let the_calls = the_stream.calls().await;
        assert_eq!(the_calls.len(), 3);
        assert!(the_calls.iter().all(|call| call.record_count() == 5));
        assert!(
            the_calls
                .iter()
                .flat_map(|call| call.partition_keys.iter())
                .all(|key| ["pk-0", "pk-1", "pk-2"].contains(&key.as_str()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_bad_credentials_send_everyone_home() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default()).with_script([
            ScriptedResponse::CallError(ClientError::Auth {
                code: "UnrecognizedClientException".to_string(),
                message: "invalid token".to_string(),
            }),
        ]);
        let the_client = Client::with_backend(StreamBackend::InMemory(the_stream.clone()), &EngineConfig::default());
        let the_stop = CancellationToken::new();
        let the_user = VirtualUser::new(7, the_client, workload(WorkloadMode::PutRecord), None, the_stop.clone());

        let result = the_user.start().await.expect("💀 no panic");

        assert!(result.is_err());
        assert!(the_stop.is_cancelled(), "a fatal error must stop the other virtual users too");
        assert_eq!(the_stream.call_count().await, 1);
    }

    #[test]
    fn the_one_where_payloads_are_exactly_as_big_as_promised() {
        let the_user = VirtualUser::new(
            3,
            Client::with_backend(
                StreamBackend::InMemory(InMemoryStreamClient::new(&InMemoryConfig::default())),
                &EngineConfig::default(),
            ),
            workload(WorkloadMode::PutRecords),
            None,
            CancellationToken::new(),
        );
        let the_payload = the_user.payload(12, 4);
        assert_eq!(the_payload.len(), 64);
        assert!(the_payload.starts_with(b"vu=3 it=12 seq=4 "));
    }
}
