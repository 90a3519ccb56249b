//! Codeguard - Application Entry Point
//!
//! This is the main entry point for the Codeguard server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeguard::{
    backend::Judge0Client,
    config::Config,
    db::{self, repositories::{InMemorySubmissionStore, PgSubmissionStore, SubmissionStore}},
    handlers,
    security::SanitizerRules,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing backend credential stops startup here
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Codeguard server...");

    // Submission history store
    let store: Arc<dyn SubmissionStore> = match &config.database.url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(url, config.database.max_connections).await?;
            db::test_connection(&pool).await?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            Arc::new(PgSubmissionStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; submission history is kept in memory");
            Arc::new(InMemorySubmissionStore::new())
        }
    };

    // Sanitizer rules
    let rules = match &config.sanitizer.rules_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading sanitizer rules");
            SanitizerRules::from_path(path)?
        }
        None => SanitizerRules::default(),
    };

    // Execution backend
    let backend = Arc::new(Judge0Client::new(&config.judge0)?);
    tracing::info!(
        base_url = %config.judge0.base_url,
        languages = config.judge0.language_ids.len(),
        "Execution backend configured"
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    // Create application state
    let state = AppState::new(config, &rules, backend, store)?;

    // Build the router
    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        );

    // Start the server
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
