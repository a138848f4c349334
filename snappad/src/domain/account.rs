// src/domain/account.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// Raw login response; the server may omit tokens on soft failures
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl LoginResponse {
    pub fn into_tokens(self) -> Option<Tokens> {
        match self.access {
            Some(access) if !access.is_empty() => Some(Tokens {
                access,
                refresh: self.refresh.unwrap_or_default(),
            }),
            _ => None,
        }
    }
}
