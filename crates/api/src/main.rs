use anyhow::{Context, Result};
use camera_manager_api::{
    app, config,
    jobs::{JobScheduler, RecordingJob, RecordingSettings},
    middleware,
};
use persistence::repositories::PgProductRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init_logging(&config.logging);

    info!("Starting Camera Manager API v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = middleware::init_metrics() {
        warn!(error = %e, "Metrics disabled");
    }

    let db_config = persistence::db::DatabaseConfig::from(&config.database);
    let pool = persistence::db::create_pool(&db_config)
        .await
        .context("connecting to the database")?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool)
        .await
        .context("running migrations")?;
    info!("Migrations completed");

    let mut scheduler = JobScheduler::new();
    if config.recording.enabled {
        scheduler.register(RecordingJob::new(
            Arc::new(PgProductRepository::new(pool.clone())),
            RecordingSettings::from(&config.recording),
        ));
    }
    scheduler.start();

    let addr = config.socket_addr().context("invalid server address")?;
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
