// src/infrastructure/notes_api.rs
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::application::{NoteRepository, SessionStore};
use crate::domain::note::ListQuery;
use crate::domain::{DomainError, NewNote, Note, NotePatch};
use crate::infrastructure::http::{is_not_found, ApiClient, Auth};

const NOTES_PATH: &str = "notes/";

fn note_path(id: i64) -> String {
    format!("{NOTES_PATH}{id}/")
}

/// `NoteRepository` backed by the `/notes/` REST endpoints
pub struct HttpNoteRepository<S: SessionStore> {
    client: Arc<ApiClient<S>>,
}

impl<S: SessionStore> HttpNoteRepository<S> {
    pub fn new(client: Arc<ApiClient<S>>) -> Self {
        Self { client }
    }
}

/// 404 from a note endpoint means the id does not exist for this user
fn for_note(id: i64) -> impl FnOnce(DomainError) -> DomainError {
    move |error| {
        if is_not_found(&error) {
            DomainError::NoteNotFound(id)
        } else {
            error
        }
    }
}

#[async_trait]
impl<S: SessionStore> NoteRepository for HttpNoteRepository<S> {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, DomainError> {
        let notes: Vec<Note> = self.client.get_json(NOTES_PATH, &query.to_params()).await?;
        debug!(count = notes.len(), "Fetched notes");
        Ok(notes)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_note(&self, id: i64) -> Result<Note, DomainError> {
        self.client
            .get_json(&note_path(id), &[])
            .await
            .map_err(for_note(id))
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_note(&self, note: &NewNote) -> Result<Note, DomainError> {
        self.client
            .post_json(NOTES_PATH, note, Auth::Bearer)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn update_note(&self, id: i64, patch: &NotePatch) -> Result<Note, DomainError> {
        patch.validate()?;
        self.client
            .put_json(&note_path(id), patch)
            .await
            .map_err(for_note(id))
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: i64) -> Result<(), DomainError> {
        self.client
            .delete(&note_path(id))
            .await
            .map_err(for_note(id))
    }
}
