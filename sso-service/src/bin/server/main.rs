use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sso_service::config::Config;
use sso_service::domain::auth::models::App;
use sso_service::domain::auth::ports::AuthServicePort;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::http::router::create_router;
use sso_service::outbound::repositories::PostgresRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sso_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "sso-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_secs = config.auth.token_ttl_secs,
        hash_cost = config.auth.hash_cost,
        storage_timeout_ms = config.auth.storage_timeout_ms,
        apps = config.apps.len(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let repository = Arc::new(PostgresRepository::new(pg_pool));

    for app_config in &config.apps {
        repository.upsert_app(&App::from(app_config)).await?;
        tracing::info!(app_id = app_config.id, name = %app_config.name, "App registered");
    }

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        Arc::clone(&repository),
        repository,
        config.auth.settings(),
    )?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
