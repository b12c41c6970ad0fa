//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." (every developer at 3am) 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! 🧠 Layout, top to bottom:
//! - `[client.backend.Kinesis]` / `[client.backend.InMemory]`: where records go
//! - `[engine]`, `[engine.retry]`, `[engine.governor]`, `[engine.classifier]`: how hard we try
//! - `[runtime]` (alias `[load]`): the load run the CLI drives

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::info;

use crate::client::{ClientConfig, EngineConfig};
use crate::supervisors::config::RuntimeConfig;

/// 📦 One struct to rule them all, and in the Figment bind them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default, alias = "load")]
    pub runtime: RuntimeConfig,
}

/// 🚀 Load the config from env vars (`KSX_*`) and, if given, a TOML file on top.
///
/// Nested keys use a double underscore in the environment:
/// `KSX_ENGINE__RETRY__MAX_ATTEMPTS=7` lands in `engine.retry.max_attempts`.
///
/// - `config_file_name` is None: env vars only, everything else defaults.
/// - `config_file_name` is Some: env vars + TOML, merged. TOML wins on conflicts.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("KSX_").split("__"));
    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    // 💬 an error message that actually says where to look. none of that "error: error" energy.
    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (KSX_*).",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (KSX_*). \
                 No file was provided, so this one's all on the environment."
            .to_string(),
    };

    config.extract().context(context_msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::BackendConfig;
    use crate::supervisors::config::WorkloadMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_test_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("💀 Failed to create test config. The filesystem said 'new phone who dis'.");
        file.write_all(contents.as_bytes())
            .expect("💀 Failed to write test config.");
        file
    }

    #[test]
    fn the_one_where_every_section_finds_its_struct() {
        let the_file = write_test_config(
            r#"
            [client.backend.InMemory]
            shard_count = 2

            [engine]
            submission_timeout_ms = 1500

            [engine.retry]
            max_attempts = 3
            base_delay_ms = 20

            [engine.governor.defaults]
            records_per_second = 250.0

            [engine.governor.streams.orders]
            max_in_flight = 8

            [engine.classifier]
            retryable_codes = ["TryAgainLater"]

            [runtime]
            virtual_users = 4
            iterations = 10
            duration_secs = 0

            [runtime.workload]
            stream_name = "orders"
            mode = "PutRecord"
            "#,
        );

        let app_config = load_config(Some(the_file.path())).expect("💀 full config should parse");

        match &app_config.client.backend {
            BackendConfig::InMemory(in_mem) => assert_eq!(in_mem.shard_count, 2),
            honestly_who_knows => panic!("💀 expected InMemory backend, serde took us to {:?}", honestly_who_knows),
        }
        assert_eq!(app_config.engine.submission_timeout_ms, Some(1_500));
        assert_eq!(app_config.engine.retry.max_attempts, 3);
        assert_eq!(app_config.engine.retry.base_delay_ms, 20);
        assert_eq!(app_config.engine.retry.max_delay_ms, 5_000);
        assert_eq!(app_config.engine.governor.defaults.records_per_second, 250.0);
        assert_eq!(app_config.engine.governor.limits_for("orders").max_in_flight, 8);
        assert_eq!(app_config.engine.governor.limits_for("elsewhere").max_in_flight, 64);
        assert_eq!(app_config.engine.classifier.retryable_codes, vec!["TryAgainLater".to_string()]);
        assert_eq!(app_config.runtime.virtual_users, 4);
        assert_eq!(app_config.runtime.iterations, Some(10));
        assert_eq!(app_config.runtime.workload.mode, WorkloadMode::PutRecord);
        assert_eq!(app_config.runtime.workload.stream_name, "orders");
    }

    #[test]
    fn the_one_where_an_empty_file_still_gets_a_whole_outfit() {
        let the_file = write_test_config("");

        let app_config: AppConfig = Figment::new()
            .merge(Toml::file(the_file.path()))
            .extract()
            .expect("💀 defaults should fill every gap");

        assert!(matches!(app_config.client.backend, BackendConfig::Kinesis(_)));
        assert_eq!(app_config.engine.retry.max_attempts, 5);
        assert_eq!(app_config.engine.submission_timeout_ms, None);
        assert_eq!(app_config.runtime.virtual_users, 10);
        assert_eq!(app_config.runtime.duration_secs, 30);
        assert_eq!(app_config.runtime.workload.batch_size, 100);
    }

    #[test]
    fn the_one_where_runtime_answers_to_its_stage_names() {
        let the_file = write_test_config(
            r#"
            [load]
            vus = 3
            duration = 12

            [load.workload]
            stream = "clicks"
            key_count = 7
            "#,
        );

        let app_config: AppConfig = Figment::new()
            .merge(Toml::file(the_file.path()))
            .extract()
            .expect("💀 runtime aliases should parse");

        assert_eq!(app_config.runtime.virtual_users, 3);
        assert_eq!(app_config.runtime.duration_secs, 12);
        assert_eq!(app_config.runtime.workload.stream_name, "clicks");
        assert_eq!(app_config.runtime.workload.partition_key_count, 7);
    }

    #[test]
    fn the_one_where_a_typo_gets_a_helpful_obituary() {
        let the_file = write_test_config(
            r#"
            [engine.retry]
            max_attempts = "lots"
            "#,
        );

        let err = load_config(Some(the_file.path())).expect_err("💀 a string is not a number");
        assert!(format!("{:#}", err).contains("Failed to parse configuration"));
    }
}
