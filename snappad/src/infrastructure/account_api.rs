// src/infrastructure/account_api.rs
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use crate::application::{AccountService, SessionStore};
use crate::domain::account::LoginResponse;
use crate::domain::{Credentials, DomainError, Registration};
use crate::infrastructure::http::{ApiClient, Auth};

const REGISTER_PATH: &str = "account/register/";
const LOGIN_PATH: &str = "account/login/";

/// `AccountService` backed by the `/account/` REST endpoints
pub struct HttpAccountService<S: SessionStore> {
    client: Arc<ApiClient<S>>,
}

impl<S: SessionStore> HttpAccountService<S> {
    pub fn new(client: Arc<ApiClient<S>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<S: SessionStore> AccountService for HttpAccountService<S> {
    #[instrument(level = "debug", skip_all)]
    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<serde_json::Value, DomainError> {
        self.client
            .post_json(REGISTER_PATH, registration, Auth::Anonymous)
            .await
    }

    #[instrument(level = "debug", skip_all)]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, DomainError> {
        self.client
            .post_json(LOGIN_PATH, credentials, Auth::Anonymous)
            .await
    }
}
