//! Command-line driver: loads a data directory and replays a scripted
//! inventory session with structured logging.
mod config;
mod host;
mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use armory_content::ContentFactory;
use armory_core::{InventoryEngine, MechanicRegistry};
use config::CliConfig;
use host::{Host, LoggedMechanics};
use session::Session;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(&config)?;

    let factory = ContentFactory::new(&config.data_dir);
    let catalog = factory
        .load_catalog()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    let mut inventory_config = factory.load_config()?;
    if let Some(limit) = config.max_carry_weight {
        inventory_config.max_carry_weight = Some(limit);
    }

    let mut mechanics = MechanicRegistry::new();
    mechanics.register(Box::new(LoggedMechanics));

    let mut engine =
        InventoryEngine::new(inventory_config, Arc::new(catalog)).with_mechanics(mechanics);
    let mut host = Host::default();

    Session::new(&mut engine, &mut host).run()
}

/// Setup logging to stderr, and to a session log file when `ARMORY_LOG_DIR`
/// is set. The returned guard flushes the file writer on drop.
fn setup_logging(config: &CliConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let mut guard = None;
    let mut log_file = None;
    let file_layer = match &config.log_dir {
        Some(log_dir) => {
            let session_id = config.session_id.clone().unwrap_or_else(default_session_id);
            let session_log_dir = log_dir.join(&session_id);
            std::fs::create_dir_all(&session_log_dir).with_context(|| {
                format!("creating log directory {}", session_log_dir.display())
            })?;

            let file_appender = tracing_appender::rolling::never(&session_log_dir, "armory.log");
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);
            log_file = Some(session_log_dir.join("armory.log"));

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        tracing::info!("Log file: {}", path.display());
    }
    Ok(guard)
}

fn default_session_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{}", timestamp)
}
