mod common;

use std::sync::Arc;

use common::TestDb;
use common::APP_ID;
use common::APP_SECRET;
use common::TOKEN_TTL;
use sso_service::domain::auth::errors::AuthErrorKind;
use sso_service::domain::auth::errors::StorageError;
use sso_service::domain::auth::models::AccountId;
use sso_service::domain::auth::models::App;
use sso_service::domain::auth::models::AppId;
use sso_service::domain::auth::ports::AccountRepository;
use sso_service::domain::auth::ports::AppRepository;
use sso_service::domain::auth::ports::AuthServicePort;
use sso_service::domain::auth::service::AuthService;
use sso_service::domain::auth::service::AuthSettings;
use sso_service::outbound::repositories::PostgresRepository;

#[tokio::test]
async fn test_create_and_find_account() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresRepository::new(db.pool.clone());

    let id = repository.create("a@b.com", "hash-1").await.unwrap();

    let account = repository
        .find_by_email("a@b.com")
        .await
        .unwrap()
        .expect("Account should exist");
    assert_eq!(account.id, id);
    assert_eq!(account.email, "a@b.com");
    assert_eq!(account.password_hash, "hash-1");

    assert!(repository
        .find_by_email("nobody@b.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresRepository::new(db.pool.clone());

    let id = repository.create("a@b.com", "hash-1").await.unwrap();

    let err = repository.create("a@b.com", "hash-2").await.unwrap_err();
    assert_eq!(err, StorageError::Conflict("a@b.com".to_string()));

    let account = repository
        .find_by_email("a@b.com")
        .await
        .unwrap()
        .expect("Account should exist");
    assert_eq!(account.id, id);
    assert_eq!(account.password_hash, "hash-1");
}

#[tokio::test]
async fn test_is_admin_flag() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresRepository::new(db.pool.clone());

    let id = repository.create("a@b.com", "hash-1").await.unwrap();
    assert_eq!(repository.is_admin(id).await.unwrap(), Some(false));

    sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
        .bind(id.0)
        .execute(&db.pool)
        .await
        .unwrap();
    assert_eq!(repository.is_admin(id).await.unwrap(), Some(true));

    assert_eq!(repository.is_admin(AccountId(id.0 + 1000)).await.unwrap(), None);
}

#[tokio::test]
async fn test_upsert_and_find_app() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = PostgresRepository::new(db.pool.clone());

    assert!(repository.find_by_id(AppId(APP_ID)).await.unwrap().is_none());

    repository
        .upsert_app(&App::new(AppId(APP_ID), "App", "old-secret"))
        .await
        .unwrap();
    repository
        .upsert_app(&App::new(AppId(APP_ID), "App", APP_SECRET))
        .await
        .unwrap();

    let app = repository
        .find_by_id(AppId(APP_ID))
        .await
        .unwrap()
        .expect("App should exist");
    assert_eq!(app.id, AppId(APP_ID));
    assert_eq!(app.name, "App");
    assert_eq!(app.secret, APP_SECRET);
}

#[tokio::test]
async fn test_register_and_login_against_postgres() {
    let Some(db) = TestDb::new().await else {
        return;
    };
    let repository = Arc::new(PostgresRepository::new(db.pool.clone()));
    repository
        .upsert_app(&App::new(AppId(APP_ID), "App", APP_SECRET))
        .await
        .unwrap();

    let service = AuthService::new(
        Arc::clone(&repository),
        Arc::clone(&repository),
        AuthSettings::new(TOKEN_TTL).with_hash_cost(1),
    )
    .unwrap();

    let account_id = service.register("a@b.com", "pw1").await.unwrap();

    let err = service.register("a@b.com", "pw2").await.unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::AccountExists);

    let token = service.login("a@b.com", "pw1", AppId(APP_ID)).await.unwrap();
    let claims = auth::TokenIssuer::new()
        .verify(&token, APP_SECRET.as_bytes())
        .unwrap();
    assert_eq!(claims.uid, account_id.0);

    let err = service
        .login("a@b.com", "pw2", AppId(APP_ID))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);

    assert!(!service.is_admin(account_id).await.unwrap());
}
