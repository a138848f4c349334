// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{AccountService, NoteRepository, SessionStore};
use crate::domain::account::LoginResponse;
use crate::domain::note::ListQuery;
use crate::domain::{Credentials, DomainError, NewNote, Note, NotePatch, Registration};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed timestamp so fixtures compare equal across runs
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// Note fixture with a predictable title and body
pub fn note(id: i64, is_pinned: bool) -> Note {
    Note {
        id,
        slug: None,
        user: Some("ada@example.com".to_string()),
        title: format!("Note {id}"),
        content: format!("<p>Body {id}</p>"),
        font_color: "#000000".to_string(),
        background_color: "#FFFFFF".to_string(),
        is_pinned,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

/// A call observed by `MockNoteRepository`
#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    List(ListQuery),
    Get(i64),
    Create(NewNote),
    Update(i64, NotePatch),
    Delete(i64),
}

/// Shared in-memory repository for testing use cases that depend on NoteRepository
///
/// Notes are kept in insertion order, which stands in for server order.
/// Every call is recorded so tests can assert on exactly what was sent.
///
/// # Examples
///
/// ```
/// use snappad::util::testing::{note, MockNoteRepository};
///
/// let mock = MockNoteRepository::builder()
///     .with_note(note(1, true))
///     .with_note(note(2, false))
///     .build();
/// assert!(mock.calls().is_empty());
/// ```
pub struct MockNoteRepository {
    notes: Mutex<Vec<Note>>,
    calls: Mutex<Vec<RepoCall>>,
    fail_lists: bool,
    reject_titles: bool,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        locked(&self.calls).clone()
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RepoCall::List(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn update_calls(&self) -> Vec<(i64, NotePatch)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RepoCall::Update(id, patch) => Some((id, patch)),
                _ => None,
            })
            .collect()
    }

    /// Current server-side copy of a note
    pub fn stored(&self, id: i64) -> Option<Note> {
        locked(&self.notes).iter().find(|n| n.id == id).cloned()
    }

    fn record(&self, call: RepoCall) {
        locked(&self.calls).push(call);
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, DomainError> {
        self.record(RepoCall::List(query.clone()));
        if self.fail_lists {
            return Err(DomainError::Transport("connection refused".to_string()));
        }
        let needle = query.search.trim().to_lowercase();
        Ok(locked(&self.notes)
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn get_note(&self, id: i64) -> Result<Note, DomainError> {
        self.record(RepoCall::Get(id));
        self.stored(id).ok_or(DomainError::NoteNotFound(id))
    }

    async fn create_note(&self, new_note: &NewNote) -> Result<Note, DomainError> {
        self.record(RepoCall::Create(new_note.clone()));
        let mut notes = locked(&self.notes);
        let id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        let created = Note {
            title: new_note.title.clone(),
            content: new_note.content.clone(),
            ..note(id, false)
        };
        notes.push(created.clone());
        Ok(created)
    }

    async fn update_note(&self, id: i64, patch: &NotePatch) -> Result<Note, DomainError> {
        self.record(RepoCall::Update(id, patch.clone()));
        patch.validate()?;
        if self.reject_titles && patch.title.is_some() {
            return Err(DomainError::Api {
                status: 400,
                message: "title: Ensure this field has no more than 255 characters.".to_string(),
            });
        }
        let mut notes = locked(&self.notes);
        let stored = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(DomainError::NoteNotFound(id))?;
        if let Some(title) = &patch.title {
            stored.title.clone_from(title);
        }
        if let Some(content) = &patch.content {
            stored.content.clone_from(content);
        }
        if let Some(is_pinned) = patch.is_pinned {
            stored.is_pinned = is_pinned;
        }
        if let Some(color) = &patch.font_color {
            stored.font_color.clone_from(color);
        }
        if let Some(color) = &patch.background_color {
            stored.background_color.clone_from(color);
        }
        Ok(stored.clone())
    }

    async fn delete_note(&self, id: i64) -> Result<(), DomainError> {
        self.record(RepoCall::Delete(id));
        let mut notes = locked(&self.notes);
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(DomainError::NoteNotFound(id));
        }
        Ok(())
    }
}

/// Builder for MockNoteRepository
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteRepositoryBuilder {
    notes: Vec<Note>,
    fail_lists: bool,
    reject_titles: bool,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            fail_lists: false,
            reject_titles: false,
        }
    }

    /// Add a note; list order follows insertion order
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Make every list call fail with a transport error
    pub fn with_list_failure(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    /// Make every update that carries a title fail with a 400
    pub fn with_title_rejection(mut self) -> Self {
        self.reject_titles = true;
        self
    }

    pub fn build(self) -> MockNoteRepository {
        MockNoteRepository {
            notes: Mutex::new(self.notes),
            calls: Mutex::new(vec![]),
            fail_lists: self.fail_lists,
            reject_titles: self.reject_titles,
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Session store that lives only as long as the test
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn with_access_token(token: &str) -> Self {
        let store = Self::default();
        locked(&store.values).insert(crate::constants::ACCESS_TOKEN_KEY.to_string(), token.to_string());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(locked(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        locked(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        locked(&self.values).remove(key);
        Ok(())
    }
}

/// Account service that either hands out fixed tokens or rejects every login
pub struct MockAccountService {
    tokens: Option<(String, String)>,
}

impl MockAccountService {
    pub fn accepting(access: &str, refresh: &str) -> Self {
        Self {
            tokens: Some((access.to_string(), refresh.to_string())),
        }
    }

    pub fn rejecting() -> Self {
        Self { tokens: None }
    }
}

#[async_trait]
impl AccountService for MockAccountService {
    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<serde_json::Value, DomainError> {
        Ok(serde_json::json!({
            "email": registration.email,
            "display_name": registration.display_name,
        }))
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, DomainError> {
        Ok(match &self.tokens {
            Some((access, refresh)) => LoginResponse {
                access: Some(access.clone()),
                refresh: Some(refresh.clone()),
            },
            None => LoginResponse::default(),
        })
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "hyper_util", "reqwest", "mio", "h2"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
