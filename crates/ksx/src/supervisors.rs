//! 🎬 *[camera pans across a dimly lit server room]*
//! 🎬 *[dramatic orchestral music swells]*
//! 🎬 "In a world where virtual users hammer one stream..."
//! 🎬 "One supervisor dared to count them all."
//! 🎬 *[record scratch]* 🦆
//!
//! 📦 The Supervisor: builds one shared `Client`, releases the virtual users,
//! watches the progress table, pulls the plug when the clock runs out,
//! and prints the bill.
//!
//! ⚠️ Workers stay private to the supervisor. Like Fight Club, but for async tasks.

mod workers;
pub mod config;

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures::future::join_all;
use tokio::time::{Instant, interval, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::app_config::AppConfig;
use crate::client::Client;
use crate::progress::{LoadProgress, summary_table};
use crate::reporter::{Collectors, LoadMetrics, LoadSnapshot, MetricsCollector, TracingCollector};
use workers::{VirtualUser, Worker};

const TICK: Duration = Duration::from_millis(500);

pub(crate) struct Supervisor {
    app_config: AppConfig,
}

impl Supervisor {
    pub(crate) fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }

    /// 🏗️ Build the client from config and run the load against it.
    pub(crate) async fn run(&self) -> Result<LoadSnapshot> {
        let client = Client::from_config(&self.app_config.client, &self.app_config.engine)
            .await
            .context("💀 Supervisor could not build the stream client")?;
        self.run_with_client(client).await
    }

    /// 🧵 Unleash the virtual users on a ready-made client.
    pub(crate) async fn run_with_client(&self, client: Client) -> Result<LoadSnapshot> {
        let runtime = &self.app_config.runtime;
        if runtime.iterations.is_none() && runtime.duration_secs == 0 {
            bail!("💀 runtime has neither iterations nor duration_secs; this load test would never end");
        }
        if runtime.virtual_users == 0 {
            bail!("💀 runtime.virtual_users is 0; a load test with no load is just a test");
        }

        let metrics = Arc::new(LoadMetrics::new());
        let listeners: Vec<Arc<dyn MetricsCollector>> = vec![
            Arc::new(TracingCollector) as Arc<dyn MetricsCollector>,
            metrics.clone() as Arc<dyn MetricsCollector>,
        ];
        let client = client.with_collector(Arc::new(Collectors(listeners)));
        let workload = Arc::new(runtime.workload.clone());
        let stop = CancellationToken::new();

        info!(
            "🚀 releasing {} virtual users on '{}' ({:?} mode)",
            runtime.virtual_users, workload.stream_name, workload.mode
        );
        let started = Instant::now();
        let handles: Vec<_> = (0..runtime.virtual_users)
            .map(|id| VirtualUser::new(id, client.clone(), Arc::clone(&workload), runtime.iterations, stop.clone()).start())
            .collect();

        let mut progress = LoadProgress::new(workload.stream_name.clone(), runtime.planned_records());
        let run_deadline = (runtime.duration_secs > 0).then(|| started + Duration::from_secs(runtime.duration_secs));
        let mut ticker = interval(TICK);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    progress.update(metrics.snapshot());
                    if handles.iter().all(|handle| handle.is_finished()) {
                        break;
                    }
                }
                _ = until(run_deadline) => {
                    info!("⏰ duration reached, asking virtual users to wrap up");
                    break;
                }
            }
        }

        stop.cancel();
        let mut first_failure = None;
        for joined in join_all(handles).await {
            let outcome = joined
                .context("💀 a virtual user panicked")
                .and_then(|result| result);
            if let Err(err) = outcome {
                error!("💀 {:#}", err);
                first_failure.get_or_insert(err);
            }
        }

        let snapshot = metrics.snapshot();
        progress.update(snapshot.clone());
        progress.finish();
        println!("{}", summary_table(&snapshot, started.elapsed()));

        match first_failure {
            Some(err) => Err(err.context("💀 the load run was aborted")),
            None => Ok(snapshot),
        }
    }
}

/// ⏰ Sleep until the deadline, or forever if there isn't one.
async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{InMemoryConfig, InMemoryStreamClient, ScriptedResponse, StreamBackend};
    use crate::client::EngineConfig;
    use crate::errors::ClientError;
    use crate::supervisors::config::{RuntimeConfig, WorkloadConfig, WorkloadMode};

    fn config(runtime: RuntimeConfig) -> AppConfig {
        AppConfig {
            runtime,
            ..AppConfig::default()
        }
    }

    fn runtime(virtual_users: usize, iterations: Option<u64>, duration_secs: u64) -> RuntimeConfig {
        RuntimeConfig {
            virtual_users,
            iterations,
            duration_secs,
            workload: WorkloadConfig {
                stream_name: "orders".to_string(),
                mode: WorkloadMode::PutRecords,
                batch_size: 5,
                record_size_bytes: 32,
                partition_key_count: 4,
                think_time_ms: 0,
            },
        }
    }

    fn in_memory_client(stream: &InMemoryStreamClient) -> Client {
        Client::with_backend(StreamBackend::InMemory(stream.clone()), &EngineConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_every_virtual_user_finishes_their_homework() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default());
        let the_supervisor = Supervisor::new(config(runtime(3, Some(2), 0)));

        let snapshot = the_supervisor
            .run_with_client(in_memory_client(&the_stream))
            .await
            .expect("💀 an in-memory run should not fail");

        assert_eq!(snapshot.submissions, 6);
        assert_eq!(snapshot.records, 30);
        assert_eq!(snapshot.succeeded, 30);
        assert_eq!(the_stream.call_count().await, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_the_clock_runs_out_before_the_users_do() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default());
        let mut the_runtime = runtime(2, None, 2);
        the_runtime.workload.think_time_ms = 100;
        let the_supervisor = Supervisor::new(config(the_runtime));

        let snapshot = the_supervisor
            .run_with_client(in_memory_client(&the_stream))
            .await
            .expect("💀 a timed run should end cleanly");

        assert!(snapshot.submissions > 0);
        assert_eq!(snapshot.failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn the_one_where_bad_credentials_abort_the_whole_run() {
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default()).with_script([
            ScriptedResponse::CallError(ClientError::Auth {
                code: "UnrecognizedClientException".to_string(),
                message: "invalid token".to_string(),
            }),
        ]);
        let the_supervisor = Supervisor::new(config(runtime(1, Some(5), 0)));

        let result = the_supervisor.run_with_client(in_memory_client(&the_stream)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn the_one_where_an_endless_run_is_refused() {
        let the_supervisor = Supervisor::new(config(runtime(1, None, 0)));
        let the_stream = InMemoryStreamClient::new(&InMemoryConfig::default());
        assert!(the_supervisor.run_with_client(in_memory_client(&the_stream)).await.is_err());
        assert_eq!(the_stream.call_count().await, 0);
    }
}
