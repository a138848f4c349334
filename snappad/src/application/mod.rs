// src/application/mod.rs
pub mod auth;
pub mod dashboard;
pub mod note_editor;
pub mod note_lister;
pub mod note_repository;
pub mod query_cache;

pub use auth::{AccountService, Authenticator, SessionStore};
pub use dashboard::Dashboard;
pub use note_editor::{EditorSettings, NoteEditor, SaveStatus};
pub use note_lister::{NoteLister, NoteSections};
pub use note_repository::NoteRepository;
pub use query_cache::{NoteCache, QueryCache};
