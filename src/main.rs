use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_system::config::Config;
use event_system::database::Database;
use event_system::services::sweeper::Sweeper;
use event_system::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Event System API ({})", config.app.environment);

    // Connect to the database
    let db = Database::new(&config.database.url, config.database.pool_size)
        .await
        .context("failed to connect to database")?;
    info!("Database connected");

    // Run migrations
    db.run_migrations()
        .await
        .context("failed to run migrations")?;

    // Create the shared application state
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // --- Start background tasks ---

    // Maintenance sweep: expire tasks, send reminders, purge old notifications
    let sweeper = Sweeper::new(state.clone());
    let interval = Duration::from_secs(config.sweeper.interval_seconds);
    task::spawn(async move {
        loop {
            sweeper.run_sweep().await;
            tokio::time::sleep(interval).await;
        }
    });

    // --- Start the web server ---

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("invalid HOST/PORT configuration")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listen address")?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
