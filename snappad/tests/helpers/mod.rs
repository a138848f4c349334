use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};
use snappad::application::SessionStore;
use snappad::infrastructure::ApiClient;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Password the mock login endpoint accepts
#[allow(dead_code)]
pub const GOOD_PASSWORD: &str = "correct horse";

/// Email the mock register endpoint refuses as already taken
#[allow(dead_code)]
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// One request as seen by the mock notes service
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the notes backend, bound to an ephemeral port.
///
/// Notes 1 ("Groceries") and 2 ("Rust tips", pinned) exist; every other id
/// answers 404. Creating a note always yields id 3.
#[allow(dead_code)]
pub struct TestServer {
    pub base_url: String,
    state: MockState,
    _server: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start() -> Result<Self> {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind mock server")?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api/"),
            state,
            _server: server,
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn client<S: SessionStore>(&self, store: Arc<S>) -> Arc<ApiClient<S>> {
        Arc::new(ApiClient::new(&self.base_url, Duration::from_secs(5), store).unwrap())
    }
}

#[allow(dead_code)]
pub fn note_json(id: i64) -> Value {
    let (title, pinned) = match id {
        1 => ("Groceries", false),
        2 => ("Rust tips", true),
        _ => ("", false),
    };
    json!({
        "id": id,
        "slug": format!("note-{id}"),
        "user": "ada@example.com",
        "title": title,
        "content": if id == 3 { Value::Null } else { json!(format!("<p>{title}</p>")) },
        "font_color": "#000000",
        "background_color": "#FFFFFF",
        "is_pinned": pinned,
        "created_at": "2025-01-02T03:04:05Z",
        "updated_at": "2025-01-02T03:04:05Z"
    })
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let path = uri.path().trim_start_matches("/api/").to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    match (method.as_str(), path.as_str()) {
        ("POST", "account/login/") => {
            if request["password"] == GOOD_PASSWORD {
                reply(StatusCode::OK, json!({"access": "access-1", "refresh": "refresh-1"}))
            } else {
                reply(
                    StatusCode::UNAUTHORIZED,
                    json!({"detail": "No active account found with the given credentials"}),
                )
            }
        }
        ("POST", "account/register/") => {
            if request["email"] == TAKEN_EMAIL {
                reply(
                    StatusCode::BAD_REQUEST,
                    json!({"email": ["user with this email already exists."]}),
                )
            } else {
                reply(
                    StatusCode::CREATED,
                    json!({"email": request["email"], "display_name": request["display_name"]}),
                )
            }
        }
        ("GET", "notes/") => reply(StatusCode::OK, json!([note_json(1), note_json(2)])),
        ("POST", "notes/") => reply(StatusCode::CREATED, note_json(3)),
        (_, note_path) if note_path.starts_with("notes/") => {
            let id: i64 = note_path
                .trim_start_matches("notes/")
                .trim_end_matches('/')
                .parse()
                .unwrap_or(0);
            if id != 1 && id != 2 {
                return reply(StatusCode::NOT_FOUND, json!({"detail": "Not found."}));
            }
            match method.as_str() {
                "GET" => reply(StatusCode::OK, note_json(id)),
                "PUT" => {
                    let mut note = note_json(id);
                    if let (Some(note), Some(patch)) = (note.as_object_mut(), request.as_object()) {
                        for (key, value) in patch {
                            note.insert(key.clone(), value.clone());
                        }
                    }
                    reply(StatusCode::OK, note)
                }
                "DELETE" => (StatusCode::NO_CONTENT, String::new()),
                _ => reply(StatusCode::METHOD_NOT_ALLOWED, json!({"detail": "Method not allowed."})),
            }
        }
        _ => reply(StatusCode::NOT_FOUND, json!({"detail": "Not found."})),
    }
}

fn reply(status: StatusCode, body: Value) -> (StatusCode, String) {
    (status, body.to_string())
}
