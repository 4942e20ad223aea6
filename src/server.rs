//! Router assembly and process bootstrap.
//!
//! The route table is fixed; paths mirror the public API exactly, including
//! the trailing slash on the get-by-id route. Middleware is limited to
//! request tracing and permissive CORS.

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum::routing::{delete, get, post, put};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database, bson::doc};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::timeout;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::handlers::{
    AppState, create_order, delete_order, get_order, list_orders, list_orders_by_server,
    update_order, update_server,
};
use crate::storage::MongoOrderStore;

/// Deadline for the initial store handshake. Failure here is fatal to the
/// process; there is no degraded mode.
pub const CONNECT_DEADLINE: Duration = Duration::from_secs(10);

/// Build the application router with the full order route table.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/order/create", post(create_order))
        .route("/orders", get(list_orders))
        .route("/waiter/{server}", get(list_orders_by_server))
        .route("/order/{id}/", get(get_order))
        .route("/waiter/update/{id}", put(update_server))
        .route("/order/update/{id}", put(update_order))
        .route("/order/delete/{id}", delete(delete_order))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Connect to MongoDB and return the configured database handle.
///
/// Both the option parsing and the initial round trip are bounded by
/// [`CONNECT_DEADLINE`].
pub async fn connect_database(config: &Config) -> Result<Database> {
    let mut options = timeout(CONNECT_DEADLINE, ClientOptions::parse(&config.mongodb_url))
        .await
        .map_err(|_| anyhow!("timed out resolving MongoDB options after {CONNECT_DEADLINE:?}"))?
        .context("invalid MongoDB connection string")?;
    options.connect_timeout = Some(CONNECT_DEADLINE);
    options.server_selection_timeout = Some(CONNECT_DEADLINE);

    let client = Client::with_options(options).context("failed to build MongoDB client")?;
    let database = client.database(&config.database);

    // Round trip now so an unreachable store fails the process at startup
    // instead of on the first request.
    timeout(CONNECT_DEADLINE, database.run_command(doc! { "ping": 1 }))
        .await
        .map_err(|_| anyhow!("timed out connecting to MongoDB after {CONNECT_DEADLINE:?}"))?
        .context("MongoDB ping failed")?;

    info!(database = %config.database, "connected to MongoDB");
    Ok(database)
}

/// Initialize logging, connect to the store, and serve until shutdown.
pub async fn serve() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;
    let database = connect_database(&config).await?;
    let state = AppState {
        store: Arc::new(MongoOrderStore::new(database)),
    };

    let app = build_router(state);
    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
