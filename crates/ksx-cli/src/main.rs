//! 🚀 ksx-cli: the front door, the bouncer, the maitre d' of ksx.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 Thin wrapper: loads config, sets up logging, then lets the library
//! flood the stream. Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// 🌊 Drive a Kinesis-style stream with concurrent virtual users.
#[derive(Debug, Parser)]
#[command(name = "ksx", version, about)]
struct Args {
    /// 🔧 TOML config file. Env vars (KSX_*, nested with `__`) are merged underneath.
    #[arg(env = "KSX_CONFIG", default_value = "ksx.toml")]
    config: PathBuf,
}

/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Load config (the moment of truth)
/// 4. Run the thing (send it and pray 🙏)
/// 5. Handle errors (cry)
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // 🔒 a missing file is fine (env vars only), an unreadable path is not
    let config_file_exists = args.config.try_exists().context(format!(
        "💀 Couldn't check whether the configuration file exists. If it's a relative path, \
         try an absolute one. Was checking here: '{}'",
        args.config.display()
    ))?;
    let config_file = config_file_exists.then_some(args.config.as_path());

    let app_config = ksx::app_config::load_config(config_file)
        .context("💀 In ksx-cli, main, we couldn't load the configuration. Take a look at the file and the KSX_* env vars")?;

    if let Err(err) = ksx::run(app_config).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        let mut smells_like_connection_trouble = false;
        let mut smells_like_credentials = false;
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
            let cause_str = cause.to_string();
            if cause_str.contains("dispatch failure")
                || cause_str.contains("connection refused")
                || cause_str.contains("Connection refused")
                || cause_str.contains("tcp connect error")
                || cause_str.contains("dns error")
                || cause_str.contains("TransportError")
            {
                smells_like_connection_trouble = true;
            }
            if cause_str.contains("credentials")
                || cause_str.contains("UnrecognizedClientException")
                || cause_str.contains("AccessDenied")
                || cause_str.contains("ExpiredToken")
            {
                smells_like_credentials = true;
            }
        }

        if smells_like_connection_trouble {
            error!(
                "🔧 hint: the stream endpoint isn't reachable. Double-check `endpoint_url` and `region` \
                under [client.backend.Kinesis]. Running against LocalStack? `docker ps` to see \
                whether it's actually up. ☕"
            );
        }
        if smells_like_credentials {
            error!(
                "🔐 hint: the stream said no to our credentials. Check AWS_PROFILE / AWS_ACCESS_KEY_ID, \
                and that the identity may call kinesis:PutRecord and kinesis:PutRecords."
            );
        }

        std::process::exit(1);
    }

    Ok(())
}
