//! # OrgTask API Server
//!
//! The main API server for OrgTask, a multi-tenant task tracker where users
//! belong to organizations and manage projects and todos within them.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Registration and login (JWT bearer auth)
//! - Organization and membership management with role gates
//! - Org-scoped project and todo CRUD
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p orgtask-api
//! ```

use orgtask_api::{
    app::{build_router, AppState},
    config::Config,
};
use orgtask_shared::db::{create_pool, run_migrations, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orgtask_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "OrgTask API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    // Initialize database pool and apply pending migrations
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let pool = create_pool(db_config).await?;
    run_migrations(&pool).await?;

    // Build Axum application
    let state = AppState::new(pool, config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");

    Ok(())
}

/// Resolves when Ctrl-C is received
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
