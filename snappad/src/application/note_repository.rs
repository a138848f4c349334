// src/application/note_repository.rs
use async_trait::async_trait;

use crate::domain::note::ListQuery;
use crate::domain::{DomainError, NewNote, Note, NotePatch};

/// Remote collection of the signed-in user's notes
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List notes matching `query`, in server order
    async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, DomainError>;

    async fn get_note(&self, id: i64) -> Result<Note, DomainError>;

    async fn create_note(&self, note: &NewNote) -> Result<Note, DomainError>;

    /// Apply a partial update and return the server's copy of the note
    async fn update_note(&self, id: i64, patch: &NotePatch) -> Result<Note, DomainError>;

    async fn delete_note(&self, id: i64) -> Result<(), DomainError>;
}
