// src/infrastructure/mod.rs
pub mod account_api;
pub mod config;
pub mod http;
pub mod notes_api;
pub mod renderer;
pub mod session;

pub use account_api::HttpAccountService;
pub use config::Config;
pub use http::ApiClient;
pub use notes_api::HttpNoteRepository;
pub use renderer::ContentRenderer;
pub use session::FileSessionStore;
