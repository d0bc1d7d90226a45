//! reportgen API server entry point.

use std::sync::Arc;

use reportgen_api::config::ServerConfig;
use reportgen_api::error::AppError;
use reportgen_api::namespace::NamespaceResolver;
use reportgen_api::state::AppState;
use reportgen_core::clock::SystemClock;
use reportgen_core::ids::RandomIdGenerator;
use reportgen_ledger::pg_report_ledger::PgLedgerDirectory;
use reportgen_tasks::redis_publisher::RedisStreamPublisher;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting reportgen API server");

    let config = ServerConfig::from_env()?;

    // Ledger database.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Task bus.
    let task_publisher =
        RedisStreamPublisher::connect(&config.redis_url, config.stream_max_len).await?;

    let app_state = AppState::new(
        Arc::new(RandomIdGenerator),
        Arc::new(PgLedgerDirectory::new(pool, Arc::new(SystemClock))),
        Arc::new(task_publisher),
        NamespaceResolver::new(config.namespace_header.clone()),
        &config.report_topic,
    );

    let app = reportgen_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
