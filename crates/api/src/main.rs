use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopseo_api::config::{ServerConfig, StorageBackend};
use shopseo_api::router::build_app_router;
use shopseo_api::state::AppState;
use shopseo_core::options::OptionsCatalog;
use shopseo_db::{DbPool, MemoryShopRepository, PgShopRepository, ShopRepository};
use shopseo_gemini::{GeminiClient, GeminiConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage_backend = ?config.storage_backend,
        "Loaded server configuration"
    );

    let gemini_config = GeminiConfig::from_env();
    if !gemini_config.has_api_key() {
        tracing::warn!("GEMINI_API_KEY is not set; optimize requests will be rejected");
    }
    let generation_timeout = gemini_config.timeout;

    // --- Options catalog ---
    let catalog = match config.options_catalog_path {
        Some(ref path) => {
            let catalog = OptionsCatalog::from_json_file(path)
                .unwrap_or_else(|e| panic!("Failed to load options catalog: {e}"));
            tracing::info!(path = %path.display(), "Options catalog loaded");
            catalog
        }
        None => OptionsCatalog::default(),
    };

    // --- Storage ---
    let (repo, pool): (Arc<dyn ShopRepository>, Option<DbPool>) = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_postgres(config.database_url.as_deref().unwrap_or_default()).await;
            (
                Arc::new(PgShopRepository::new(pool.clone())) as Arc<dyn ShopRepository>,
                Some(pool),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all data is lost on restart");
            (Arc::new(MemoryShopRepository::new()) as Arc<dyn ShopRepository>, None)
        }
    };

    // --- Generator ---
    let generator = GeminiClient::new(gemini_config).expect("Failed to build Gemini HTTP client");
    tracing::info!(model = %generator.config().model, "Gemini client ready");

    // --- App state ---
    let state = AppState::new(
        repo,
        Arc::new(generator),
        catalog,
        config.clone(),
        generation_timeout,
    );

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(pool) = pool {
        let limit = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(limit, pool.close()).await.is_err() {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Timed out closing database pool"
            );
        } else {
            tracing::info!("Database pool closed");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopseo_api=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Connect, verify and migrate the Postgres database.
async fn connect_postgres(database_url: &str) -> DbPool {
    let pool = shopseo_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    shopseo_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    shopseo_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    pool
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
