// src/domain/route.rs
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Where the client currently "is"; mirrors the web client's paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    Login,
    #[default]
    Dashboard,
    Note(i64),
}

impl Route {
    pub fn active_note(self) -> Option<i64> {
        match self {
            Route::Note(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/login"),
            Route::Dashboard => f.write_str("/dashboard"),
            Route::Note(id) => write!(f, "/dashboard/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_end_matches('/');
        match path {
            "/login" => Ok(Route::Login),
            "/dashboard" | "" => Ok(Route::Dashboard),
            _ => path
                .strip_prefix("/dashboard/")
                .and_then(|id| id.parse::<i64>().ok())
                .map(Route::Note)
                .ok_or_else(|| DomainError::Validation(format!("Unknown route: {s}"))),
        }
    }
}
