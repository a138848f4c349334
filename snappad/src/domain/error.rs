// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Note not found: {0}")]
    NoteNotFound(i64),
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("Unauthorized: the server rejected the stored credentials")]
    Unauthorized,
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
