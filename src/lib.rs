//! A small multi-user todo-list service and its command-line client.
//!
//! The server exposes `users`, `sessions` and `todos` over JSON/HTTP, keeps
//! everything in SQLite, and scopes every todo operation to the user behind
//! the request's bearer token.

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use ring::rand::SystemRandom;
use sqlx::{Pool, Sqlite};
use tokio::signal;
use tower_http::cors::CorsLayer;

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;
pub mod store;
pub mod token;

use config::ServerConfig;
use store::Store;

// Struct representing the application state
pub struct AppState {
    pub store: Store,
    pub rng: SystemRandom,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self {
            store: Store::new(db),
            rng: SystemRandom::new(),
        }
    }
}

/// Connects to the database and serves the API until Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let pool = db::connect(&config.database_url, config.max_connections).await?;
    let app_state = Arc::new(AppState::new(pool));

    // Configure CORS settings for the application
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    let app = route::create_router(app_state).layer(cors);

    tracing::info!("Listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {e}");
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

    tracing::info!("Shutting down...");
}
