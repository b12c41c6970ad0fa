//! 🌊 ksx: a batch record-ingestion engine for Kinesis-style streams.
//!
//! Records go in through [`Client`], get validated by the [`encoder`], wait their turn
//! at the [`governor`], and are pushed at the stream by the [`coordinator`], which
//! retries only the records the stream bounced. Every submission comes back as a
//! [`Report`], one outcome per record, in the order you sent them.
//!
//! 🦆 The CLI on top of this is just a very enthusiastic caller.

pub mod app_config;
pub mod backends;
pub mod classifier;
pub mod client;
pub mod common;
pub mod coordinator;
pub mod encoder;
pub mod errors;
pub mod governor;
pub mod reporter;
pub(crate) mod progress;
mod supervisors;

use anyhow::{Context, Result};
use tracing::info;

pub use crate::app_config::AppConfig;
pub use crate::client::{Client, ClientConfig, EngineConfig, PutRecordInput, PutRecordsEntry, PutRecordsInput};
pub use crate::common::{BatchOutcome, EncodedRecord, Record, RecordOutcome, RecordStatus};
pub use crate::coordinator::SubmitContext;
pub use crate::errors::{ClientError, IngestError, ValidationError};
pub use crate::reporter::{LoadSnapshot, Report};
pub use crate::supervisors::config::{RuntimeConfig, WorkloadConfig, WorkloadMode};

use crate::supervisors::Supervisor;

/// 🚀 Run the load test described by `app_config` and return the final numbers.
pub async fn run(app_config: AppConfig) -> Result<LoadSnapshot> {
    let supervisor = Supervisor::new(app_config);
    let snapshot = supervisor.run().await.context("💀 load run failed")?;
    info!(
        "🏁 done: {} records, {} succeeded, {} failed, {} cancelled",
        snapshot.records, snapshot.succeeded, snapshot.failed, snapshot.cancelled
    );
    Ok(snapshot)
}
