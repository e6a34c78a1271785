//! RawanMap HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use infrastructure::{AppConfig, Environment, create_pool};
use presentation_http::{
    BasicAuthLayer, RateLimiterConfig, RateLimiterLayer, error::set_expose_internal_errors, routes,
    state::AppState,
};
use tokio::{net::TcpListener, signal};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log format can honor it
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rawanmap_server=debug,tower_http=debug".into());
    if config.server.json_logs() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!("RawanMap v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.path,
        environment = ?config.environment,
        "Configuration loaded"
    );

    // Error responses carry internals only outside production
    set_expose_internal_errors(config.environment.expose_errors());

    if config.environment == Environment::Production && config.security.uses_default_credentials()
    {
        warn!("Default admin credentials in production, set RAWANMAP_SECURITY__ADMIN_PASSWORD");
    }

    // Open the database, run migrations, and seed sample data
    let pool = create_pool(&config.database)
        .map_err(|e| anyhow::anyhow!("Failed to open database: {e}"))?;

    let config = Arc::new(config);
    let state = AppState::from_pool(Arc::new(pool), Arc::clone(&config));

    // Build router
    let app = routes::create_router(state);

    // Configure rate limiter
    let rate_limiter = RateLimiterLayer::new(&RateLimiterConfig {
        enabled: config.security.rate_limit_enabled,
        requests_per_minute: config.security.rate_limit_rpm,
        admin_requests_per_minute: config.security.admin_rate_limit_rpm,
        admin_path_prefix: config.security.admin_path_prefix.clone(),
    });

    // Configure Basic auth for admin and mutating routes
    let auth_layer = BasicAuthLayer::from_config(&config.security);

    // Add middleware (order matters: first added = outermost)
    let app = app.layer(TraceLayer::new_for_http());
    let app = match routes::cors_layer(&config.server) {
        Some(cors) => app.layer(cors),
        None => app,
    };
    let app = app
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size_bytes))
        .layer(rate_limiter)
        .layer(auth_layer);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    info!("API docs: http://{}/docs", addr);

    // Graceful shutdown configuration
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    // Connection draining is handled by axum's graceful_shutdown
}
