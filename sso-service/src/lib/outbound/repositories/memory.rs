use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::Account;
use crate::domain::auth::models::AccountId;
use crate::domain::auth::models::App;
use crate::domain::auth::models::AppId;
use crate::domain::auth::ports::AccountRepository;
use crate::domain::auth::ports::AppRepository;

#[derive(Debug)]
struct StoredAccount {
    account: Account,
    is_admin: bool,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, StoredAccount>,
    /// email -> account id, for uniqueness and lookup
    emails: HashMap<String, AccountId>,
    apps: HashMap<AppId, App>,
    last_account_id: i64,
}

/// Process-local store for accounts and apps.
///
/// Used by tests and local development. Account ids start at 1.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an application.
    pub async fn insert_app(&self, app: App) {
        self.state.write().await.apps.insert(app.id, app);
    }

    /// Set the admin flag of an account.
    ///
    /// # Returns
    /// False if the account does not exist
    pub async fn set_admin(&self, id: AccountId, is_admin: bool) -> bool {
        match self.state.write().await.accounts.get_mut(&id) {
            Some(stored) => {
                stored.is_admin = is_admin;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        let state = self.state.read().await;

        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.accounts.get(id))
            .map(|stored| stored.account.clone()))
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<AccountId, StorageError> {
        let mut state = self.state.write().await;

        if state.emails.contains_key(email) {
            return Err(StorageError::Conflict(email.to_string()));
        }

        state.last_account_id += 1;
        let id = AccountId(state.last_account_id);

        state.emails.insert(email.to_string(), id);
        state.accounts.insert(
            id,
            StoredAccount {
                account: Account {
                    id,
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                },
                is_admin: false,
            },
        );

        Ok(id)
    }

    async fn is_admin(&self, id: AccountId) -> Result<Option<bool>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .get(&id)
            .map(|stored| stored.is_admin))
    }
}

#[async_trait]
impl AppRepository for InMemoryRepository {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, StorageError> {
        Ok(self.state.read().await.apps.get(&id).cloned())
    }
}
