// src/application/auth.rs
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::domain::account::LoginResponse;
use crate::domain::{Credentials, DomainError, Registration, Tokens};

/// Account endpoints of the notes service
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Returns whatever the server sends back for a new account
    async fn register(&self, registration: &Registration)
        -> Result<serde_json::Value, DomainError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, DomainError>;
}

/// Small persistent key/value store holding the session tokens
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
    fn remove(&self, key: &str) -> Result<(), DomainError>;

    fn access_token(&self) -> Result<Option<String>, DomainError> {
        Ok(self.get(ACCESS_TOKEN_KEY)?.filter(|token| !token.is_empty()))
    }
}

pub struct Authenticator<A: AccountService, S: SessionStore> {
    accounts: A,
    store: Arc<S>,
}

impl<A: AccountService, S: SessionStore> Authenticator<A, S> {
    pub fn new(accounts: A, store: Arc<S>) -> Self {
        Self { accounts, store }
    }

    #[instrument(level = "debug", skip(self, registration), fields(email = %registration.email))]
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<serde_json::Value, DomainError> {
        let account = self.accounts.register(registration).await?;
        info!(email = %registration.email, "Registered account");
        Ok(account)
    }

    /// Log in and persist both tokens
    #[instrument(level = "debug", skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Tokens, DomainError> {
        let tokens = self
            .accounts
            .login(credentials)
            .await?
            .into_tokens()
            .ok_or(DomainError::Unauthorized)?;

        self.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh)?;
        info!(email = %credentials.email, "Logged in");
        Ok(tokens)
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        debug!("Cleared session tokens");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool, DomainError> {
        Ok(self.store.access_token()?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{MemorySessionStore, MockAccountService};

    fn credentials() -> Credentials {
        Credentials {
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn given_valid_login_when_logging_in_then_stores_both_tokens() {
        let store = Arc::new(MemorySessionStore::default());
        let auth = Authenticator::new(MockAccountService::accepting("a1", "r1"), store.clone());

        let tokens = auth.login(&credentials()).await.unwrap();

        assert_eq!(tokens.access, "a1");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("a1"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r1"));
        assert!(auth.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn given_rejected_login_when_logging_in_then_stores_nothing() {
        let store = Arc::new(MemorySessionStore::default());
        let auth = Authenticator::new(MockAccountService::rejecting(), store.clone());

        let result = auth.login(&credentials()).await;

        assert!(matches!(result, Err(DomainError::Unauthorized)));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert!(!auth.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn given_logged_in_when_logging_out_then_clears_both_tokens() {
        let store = Arc::new(MemorySessionStore::default());
        let auth = Authenticator::new(MockAccountService::accepting("a1", "r1"), store.clone());
        auth.login(&credentials()).await.unwrap();

        auth.logout().unwrap();

        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap(), None);
        assert!(!auth.is_authenticated().unwrap());
    }
}
