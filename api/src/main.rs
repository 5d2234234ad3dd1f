//! Content API Server
//!
//! A small CRUD service for text content records.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;



use adapters::SqlContentRepository;
use app::ContentService;
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<ContentService<SqlContentRepository>>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let content_repo = Arc::new(SqlContentRepository::new(db));

        Self {
            content_service: Arc::new(ContentService::new(content_repo)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router
///
/// Rate limiting keys on the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` when it is enabled.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let content_routes = Router::new()
        .route(
            "/content",
            get(handlers::list_content).post(handlers::create_content),
        )
        .route(
            "/content/:id",
            get(handlers::get_content)
                .head(handlers::content_exists)
                .put(handlers::update_content)
                .delete(handlers::delete_content),
        );

    let content_routes = match state.config.rate_limit {
        Some(limit) => {
            let governor_config = Arc::new(
                GovernorConfigBuilder::default()
                    .key_extractor(PeerIpKeyExtractor)
                    .per_second(limit.per_second)
                    .burst_size(limit.burst_size)
                    .finish()
                    .context("Invalid rate limit configuration")?,
            );
            content_routes.layer(GovernorLayer {
                config: governor_config,
            })
        }
        None => content_routes,
    };

    let app = Router::new()
        // Health check
        .route("/health", get(health))
        .merge(content_routes)
        // Middleware
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state);

    Ok(app)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,content_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Content API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to the database
    tracing::info!("Connecting to database...");
    let db = adapters::sql::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    adapters::sql::ensure_schema(&db)
        .await
        .context("Failed to prepare database schema")?;
    tracing::info!(backend = ?db.get_database_backend(), "Database connected");

    let port = config.port;
    let rate_limited = config.rate_limit.is_some();
    let app = create_router(AppState::new(db, config))?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(rate_limited, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}
