//! Notifications Main Entry Point
//!
//! Consumes every action event and stores the notifications derived from
//! them.

use std::env;

use action_events_stream::run_subscription;
use dotenv::dotenv;
use notifications::{Dependencies, NotificationsError};
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("notifications=info,action_events_stream=info"));

    if env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "notifications",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), NotificationsError> {
    dotenv().ok();

    init_tracing();

    info!("Starting notifications");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // keep the sender alive so the consumer is not stopped
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        }
    });

    match run_subscription(&deps.topic, &deps.subscription, shutdown_rx).await {
        Ok(()) => {
            info!("Notifications stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Notifications failed");
            Err(e.into())
        }
    }
}
