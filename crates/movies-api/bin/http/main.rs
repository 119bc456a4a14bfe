mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use movies_api::{App, AppState};
use movies_core::MoviesStore;
use movies_storage::{
    InMemoryMoviesStore, MongoMoviesStore, MySqlMoviesStore, PoolConfig, PostgresMoviesStore,
    TimeoutStore,
};
use movies_telemetry::TelemetryConfig;
use tracing::info;

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let telemetry = TelemetryConfig::builder()
        .service_name("movies-api")
        .format(config.log_format.into());
    let _telemetry = match config.otlp_endpoint.clone() {
        Some(endpoint) => movies_telemetry::init(telemetry.otlp_endpoint(endpoint).build())?,
        None => movies_telemetry::init(telemetry.build())?,
    };

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        store_timeout = ?config.store_timeout(),
        "starting movies api server"
    );

    let store = build_store(&config).await?;
    let app = App::router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown gracefully");
    Ok(())
}

async fn build_store(config: &CLI) -> anyhow::Result<Arc<dyn MoviesStore>> {
    let timeout = config.store_timeout();
    let pool = PoolConfig::builder()
        .max_connections(config.max_connections)
        .build();

    let store: Arc<dyn MoviesStore> = match config.storage {
        StorageBackendArg::InMemory => {
            Arc::new(TimeoutStore::new(InMemoryMoviesStore::new(), timeout))
        }
        StorageBackendArg::Mysql => {
            let url = database_url(config)?;
            let store = MySqlMoviesStore::connect_with(url, &pool).await?;
            Arc::new(TimeoutStore::new(store, timeout))
        }
        StorageBackendArg::Postgres => {
            let url = database_url(config)?;
            let store = PostgresMoviesStore::connect_with(url, &pool).await?;
            Arc::new(TimeoutStore::new(store, timeout))
        }
        StorageBackendArg::Mongodb => {
            let url = database_url(config)?;
            let store = MongoMoviesStore::connect_with(url, &pool).await?;
            Arc::new(TimeoutStore::new(store, timeout))
        }
    };

    Ok(store)
}

fn database_url(config: &CLI) -> anyhow::Result<&str> {
    config.database_url.as_deref().with_context(|| {
        format!(
            "database url is required when storage backend is {}",
            config.storage
        )
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
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
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
