use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::Account;
use crate::domain::auth::models::AccountId;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::ports::AccountRepository;
use crate::domain::auth::ports::AppRepository;

pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update an application, keyed by id.
    pub async fn upsert_app(&self, app: &App) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO apps (id, name, secret)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, secret = EXCLUDED.secret
            "#,
        )
        .bind(app.id.0)
        .bind(&app.name)
        .bind(&app.secret)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PostgresRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            r#"
            SELECT id, email, pass_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(row.map(|(id, email, password_hash)| Account {
            id: AccountId(id),
            email,
            password_hash,
        }))
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<AccountId, StorageError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StorageError::Conflict(email.to_string());
                }
            }
            StorageError::Database(e.to_string())
        })?;

        Ok(AccountId(id))
    }

    async fn is_admin(&self, id: AccountId) -> Result<Option<bool>, StorageError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_admin
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))
    }
}

#[async_trait]
impl AppRepository for PostgresRepository {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, StorageError> {
        let row: Option<(i32, String, String)> = sqlx::query_as(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(row.map(|(id, name, secret)| App {
            id: AppId(id),
            name,
            secret,
        }))
    }
}
