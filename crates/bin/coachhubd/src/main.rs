//! # coachhubd — coachhub automation daemon
//!
//! Composition root that wires all adapters together, starts the
//! automation scheduler, and serves the administrative API.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct the runner and services, injecting repositories via port traits
//! - Start the scheduler loop and the axum server
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use coachhub_adapter_email_lettre::SmtpNotificationDispatcher;
use coachhub_adapter_http_axum::router;
use coachhub_adapter_http_axum::state::AppState;
use coachhub_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteAutomationLogRepository, SqliteAutomationSettingsRepository,
    SqliteNotificationStore, SqliteRecipientSource,
};
use coachhub_app::event_bus::InProcessEventBus;
use coachhub_app::ports::SystemClock;
use coachhub_app::runner::AutomationRunner;
use coachhub_app::scheduler;
use coachhub_app::services::audit_service::AutomationAuditService;
use coachhub_app::services::settings_service::AutomationSettingsService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();
    tracing::info!(url = %config.database.url, "database connected and migrated");

    // Event bus, shared by the runner, the services, and the SSE stream
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Dispatcher: SMTP delivery + portal feed records
    let dispatcher = SmtpNotificationDispatcher::new(
        config.smtp.clone(),
        SqliteNotificationStore::new(pool.clone()),
    )?;

    // The tick core, shared between the scheduler loop and the API
    let runner = Arc::new(AutomationRunner::new(
        SqliteAutomationSettingsRepository::new(pool.clone()),
        SqliteAutomationLogRepository::new(pool.clone()),
        SqliteRecipientSource::new(pool.clone()),
        dispatcher,
        Arc::clone(&event_bus),
        SystemClock,
        config.portal.url.clone(),
    ));

    let scheduler_handle = if config.scheduler.enabled {
        Some(scheduler::start(
            Arc::clone(&runner),
            config.scheduler_config(),
        ))
    } else {
        tracing::warn!("recurring scheduler disabled by configuration");
        None
    };

    // HTTP
    let state = AppState::new(
        AutomationSettingsService::new(
            SqliteAutomationSettingsRepository::new(pool.clone()),
            Arc::clone(&event_bus),
        ),
        AutomationAuditService::new(SqliteAutomationLogRepository::new(pool.clone())),
        runner,
        Arc::new(SqliteNotificationStore::new(pool)),
        event_bus,
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "coachhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let the in-flight tick (if any) finish before the process exits.
    if let Some(handle) = scheduler_handle {
        handle.stop().await;
    }
    tracing::info!("coachhubd stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
