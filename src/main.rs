use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use user_service::{
    app::{self, user::repository::MySqlUserRepository, AppState},
    config::{AppConfig, LoggingConfig},
    infrastructure::{database::DatabaseManager, logger::Logger},
};

#[tokio::main]
async fn main() -> Result<()> {
    Logger::init(&LoggingConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        error!("invalid configuration: {}", e);
        e
    })?;

    let db = DatabaseManager::connect(&config.database)
        .await
        .map_err(|e| {
            error!("failed to connect to database: {}", e);
            e
        })
        .context("database connection")?;

    let state = AppState::new(Arc::new(MySqlUserRepository::new(db.clone())));
    let app = app::router(state);

    let listener = TcpListener::bind(config.http.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.http.socket_addr()))?;
    info!("server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down, closing database pool");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
