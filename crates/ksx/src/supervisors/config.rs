//! 🔧 Runtime knobs for a load run: how many virtual users, for how long, doing what.
//!
//! 🧠 Knowledge graph:
//! - `RuntimeConfig` lives under `[runtime]` in the config file (alias `[load]`).
//! - `WorkloadConfig` describes the synthetic traffic each virtual user generates.
//! - `duration_secs = 0` means "no clock", which only makes sense with `iterations`. 🦆

use serde::Deserialize;

/// 🎭 Which API the virtual users hammer.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkloadMode {
    PutRecord,
    #[default]
    PutRecords,
}

/// 🧪 Synthetic traffic shape.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    #[serde(default = "default_stream_name", alias = "stream")]
    pub stream_name: String,
    #[serde(default)]
    pub mode: WorkloadMode,
    /// Records per `put_records` call. Ignored for `PutRecord`.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_record_size_bytes")]
    pub record_size_bytes: usize,
    /// How many distinct partition keys to spread records over.
    #[serde(default = "default_partition_key_count", alias = "key_count")]
    pub partition_key_count: usize,
    /// 💤 Pause between iterations, per virtual user.
    #[serde(default)]
    pub think_time_ms: u64,
}

fn default_stream_name() -> String {
    "ksx-load-test".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_record_size_bytes() -> usize {
    256
}

fn default_partition_key_count() -> usize {
    64
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            stream_name: default_stream_name(),
            mode: WorkloadMode::default(),
            batch_size: default_batch_size(),
            record_size_bytes: default_record_size_bytes(),
            partition_key_count: default_partition_key_count(),
            think_time_ms: 0,
        }
    }
}

impl WorkloadConfig {
    /// 📏 Records one iteration sends.
    pub fn records_per_iteration(&self) -> usize {
        match self.mode {
            WorkloadMode::PutRecord => 1,
            WorkloadMode::PutRecords => self.batch_size,
        }
    }
}

/// 🏃 The load run itself.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default = "default_virtual_users", alias = "vus")]
    pub virtual_users: usize,
    /// Iterations per virtual user. `None` = keep going until the clock runs out.
    #[serde(default)]
    pub iterations: Option<u64>,
    #[serde(default = "default_duration_secs", alias = "duration")]
    pub duration_secs: u64,
    #[serde(default)]
    pub workload: WorkloadConfig,
}

fn default_virtual_users() -> usize {
    10
}

fn default_duration_secs() -> u64 {
    30
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            virtual_users: default_virtual_users(),
            iterations: None,
            duration_secs: default_duration_secs(),
            workload: WorkloadConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// 🎯 Total records the run will send, when that is knowable up front.
    pub fn planned_records(&self) -> Option<u64> {
        self.iterations
            .map(|iterations| iterations * self.virtual_users as u64 * self.workload.records_per_iteration() as u64)
    }
}
