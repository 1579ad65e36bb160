#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use sso_service::domain::auth::models::App;
use sso_service::domain::auth::models::AppId;
use sso_service::domain::auth::service::AuthService;
use sso_service::domain::auth::service::AuthSettings;
use sso_service::inbound::http::router::create_router;
use sso_service::outbound::repositories::InMemoryRepository;

pub const APP_ID: i32 = 5;
pub const APP_SECRET: &str = "s3cr3t";
pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

pub type TestService = AuthService<InMemoryRepository, InMemoryRepository>;

/// Auth service over a fresh in-memory store seeded with App{5, "App", "s3cr3t"}.
pub async fn test_service() -> (Arc<TestService>, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::new());
    repository
        .insert_app(App::new(AppId(APP_ID), "App", APP_SECRET))
        .await;

    let service = AuthService::new(
        Arc::clone(&repository),
        Arc::clone(&repository),
        AuthSettings::new(TOKEN_TTL).with_hash_cost(1),
    )
    .expect("Failed to build auth service");

    (Arc::new(service), repository)
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryRepository>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let (service, repository) = test_service().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    postgres_url: String,
}

/// Server URL for the throwaway databases, if one is configured.
fn postgres_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE__URL"))
        .ok()
}

impl TestDb {
    /// Create a migrated database with a unique name.
    ///
    /// Returns `None` when neither `DATABASE_URL` nor `DATABASE__URL` is set.
    pub async fn new() -> Option<Self> {
        let Some(postgres_url) = postgres_url() else {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
            return None;
        };

        let db_name = format!(
            "test_sso_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            postgres_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let postgres_url = self.postgres_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
