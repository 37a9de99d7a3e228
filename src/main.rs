//! Calwatch daemon — compliance scanning & alerting engine.
//!
//! Wires configuration, durable state, the scan engine, and the UI-facing
//! API together, then drives the scheduler until shutdown.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use calwatch_api::ComplianceApi;
use calwatch_core::config::AppConfig;
use calwatch_core::error::AppError;
use calwatch_engine::{EventBus, JsonFileSource, ScanScheduler, Scanner};
use calwatch_store::{FileStateStore, NotificationStore, SettingsStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Engine error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CALWATCH_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main engine run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Calwatch v{}", env!("CARGO_PKG_VERSION"));

    // Durable state
    let backend = Arc::new(FileStateStore::new(&config.data.state_dir).await?);
    let settings = Arc::new(SettingsStore::new(backend.clone(), config.engine.clone()));
    if settings.load().await? {
        tracing::info!("Engine configuration restored from durable state");
    }
    let notifications = Arc::new(NotificationStore::new(backend));
    let restored = notifications.load().await?;
    tracing::info!(restored, "Notification store ready");

    // Engine
    let bus = Arc::new(EventBus::default());
    let source = Arc::new(JsonFileSource::new(config.data.source_dir.clone()));
    let scanner = Arc::new(Scanner::new(
        source,
        notifications.clone(),
        settings.clone(),
        bus.clone(),
    ));
    let scheduler = Arc::new(ScanScheduler::new(scanner, &settings));

    let api = ComplianceApi::new(
        notifications.clone(),
        settings,
        scheduler.clone(),
        bus,
    );
    let stats = api.get_stats().await;
    tracing::info!(
        total = stats.total,
        unread = stats.unread,
        "Notification inventory at startup"
    );

    // Run the scheduler until ctrl-c
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let scheduler_task = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run(cancel_rx).await })
    };

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;
    tracing::info!("Shutdown signal received");

    let _ = cancel_tx.send(true);
    let _ = scheduler_task.await;

    // Flush anything a failed persist left pending before exiting.
    if let Err(e) = notifications.flush().await {
        tracing::warn!(error = %e, "Final state flush failed; durable state may lag memory");
    }

    tracing::info!("Calwatch stopped");
    Ok(())
}
