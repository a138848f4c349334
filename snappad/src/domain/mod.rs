// src/domain/mod.rs
pub mod account;
pub mod error;
pub mod note;
pub mod route;

pub use account::{Credentials, Registration, Tokens};
pub use error::DomainError;
pub use note::{NewNote, Note, NotePatch};
pub use route::Route;
