//! Knobs console
//!
//! Interactive host for the knob store: seeds knobs from a YAML file and lets
//! you set, read, and inspect them while watching change notifications.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use knobs::{cli, KnobsConfig};

/// Knobs - grouped, debounced settings store console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML file with seed knobs
    #[arg(short, long, env = "KNOBS_CONFIG")]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Override the change notification debounce window (milliseconds)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting knobs console...");

    let mut config = match &args.config {
        Some(path) => KnobsConfig::load(path).await?,
        None => KnobsConfig::default(),
    };
    if let Some(debounce_ms) = args.debounce_ms {
        config.debounce_ms = debounce_ms;
    }

    let store = config.build_store();
    info!(
        "Knob store ready ({} groups, debounce {:?})",
        store.get_all().len(),
        store.debounce()
    );

    cli::run_repl(store).await?;

    info!("Knobs console closed");
    Ok(())
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();
    }

    Ok(())
}
