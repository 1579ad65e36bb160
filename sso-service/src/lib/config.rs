use std::env;
use std::fmt;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::service::AuthSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    /// Applications upserted at start-up
    #[serde(default)]
    pub apps: Vec<AppConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub token_ttl_secs: u64,
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
    #[serde(default = "default_storage_timeout_ms")]
    pub storage_timeout_ms: u64,
}

fn default_hash_cost() -> u32 {
    auth::PasswordHasher::DEFAULT_COST
}

fn default_storage_timeout_ms() -> u64 {
    5_000
}

impl AuthConfig {
    /// Domain settings for the auth service; validated by `AuthService::new`.
    pub fn settings(&self) -> AuthSettings {
        AuthSettings::new(Duration::from_secs(self.token_ttl_secs))
            .with_hash_cost(self.hash_cost)
            .with_storage_timeout(Duration::from_millis(self.storage_timeout_ms))
    }
}

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl From<&AppConfig> for App {
    fn from(app: &AppConfig) -> Self {
        App::new(AppId(app.id), app.name.clone(), app.secret.clone())
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__TOKEN_TTL_SECS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__TOKEN_TTL_SECS=600 overrides auth.token_ttl_secs
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
