// src/infrastructure/http.rs
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace};

use crate::application::SessionStore;
use crate::domain::DomainError;

/// Longest slice of an error body kept in `DomainError::Api`
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach the stored access token; refuse to send without one
    Bearer,
    Anonymous,
}

/// JSON-over-HTTP client for the notes service.
pub struct ApiClient<S: SessionStore> {
    http: Client,
    base_url: Url,
    session: Arc<S>,
}

impl<S: SessionStore> ApiClient<S> {
    pub fn new(base_url: &str, timeout: Duration, session: Arc<S>) -> Result<Self, DomainError> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to create HTTP client: {e}")))?;
        debug!(%base_url, "Created API client");
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the API root.
    ///
    /// Leading slashes are ignored so `/notes/` and `notes/` hit the same URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, DomainError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DomainError::Validation(format!("Invalid endpoint {path:?}: {e}")))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let request = self.http.get(self.endpoint(path)?).query(query);
        let response = self.execute(request, Auth::Bearer).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B, auth: Auth) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.endpoint(path)?).json(body);
        let response = self.execute(request, auth).await?;
        decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.endpoint(path)?).json(body);
        let response = self.execute(request, Auth::Bearer).await?;
        decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), DomainError> {
        let request = self.http.delete(self.endpoint(path)?);
        self.execute(request, Auth::Bearer).await?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self, request))]
    async fn execute(&self, request: RequestBuilder, auth: Auth) -> Result<Response, DomainError> {
        let request = match auth {
            Auth::Bearer => {
                let token = self
                    .session
                    .access_token()?
                    .ok_or(DomainError::NotAuthenticated)?;
                request.bearer_auth(token)
            }
            Auth::Anonymous => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        let status = response.status();
        trace!(%status, url = %response.url(), "Received response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
    response
        .json::<T>()
        .await
        .map_err(|e| DomainError::Transport(format!("Malformed response body: {e}")))
}

fn parse_base_url(raw: &str) -> Result<Url, DomainError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| DomainError::Validation(format!("Invalid API url {raw:?}: {e}")))
}

/// Map a non-success status to the error the caller sees
pub fn status_error(status: StatusCode, body: &str) -> DomainError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::Unauthorized,
        _ => DomainError::Api {
            status: status.as_u16(),
            message: body.chars().take(ERROR_BODY_LIMIT).collect(),
        },
    }
}

pub fn is_not_found(error: &DomainError) -> bool {
    matches!(error, DomainError::Api { status: 404, .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::MemorySessionStore;
    use rstest::rstest;

    fn client(base: &str) -> ApiClient<MemorySessionStore> {
        ApiClient::new(
            base,
            Duration::from_secs(1),
            Arc::new(MemorySessionStore::default()),
        )
        .unwrap()
    }

    #[rstest]
    #[case("http://localhost:8000/api", "/notes/", "http://localhost:8000/api/notes/")]
    #[case("http://localhost:8000/api/", "notes/3/", "http://localhost:8000/api/notes/3/")]
    #[case(
        "http://localhost:8000/api/",
        "account/login/",
        "http://localhost:8000/api/account/login/"
    )]
    fn given_base_and_path_when_resolving_endpoint_then_joins_under_base(
        #[case] base: &str,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(client(base).endpoint(path).unwrap().as_str(), expected);
    }

    #[test]
    fn given_garbage_base_url_when_creating_client_then_fails() {
        let result = ApiClient::new(
            "not a url",
            Duration::from_secs(1),
            Arc::new(MemorySessionStore::default()),
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::FORBIDDEN)]
    fn given_auth_status_when_mapping_then_returns_unauthorized(#[case] status: StatusCode) {
        assert_eq!(status_error(status, "nope"), DomainError::Unauthorized);
    }

    #[test]
    fn given_not_found_status_when_mapping_then_is_not_found() {
        let error = status_error(StatusCode::NOT_FOUND, "{\"detail\":\"Not found.\"}");
        assert!(is_not_found(&error));
    }

    #[tokio::test]
    async fn given_no_token_when_calling_authenticated_endpoint_then_fails_without_sending() {
        // Port 9 (discard) is never contacted: the request must be refused first.
        let client = client("http://127.0.0.1:9/api/");

        let result: Result<serde_json::Value, _> = client.get_json("notes/", &[]).await;

        assert_eq!(result.unwrap_err(), DomainError::NotAuthenticated);
    }
}
