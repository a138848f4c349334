// src/domain/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::domain::DomainError;

pub const DEFAULT_FONT_COLOR: &str = "#000000";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Owner email, filled in by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default = "default_font_color")]
    pub font_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default)]
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_font_color() -> String {
    DEFAULT_FONT_COLOR.to_string()
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Note {
    /// Title as shown in lists; blank titles fall back to a placeholder
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Note"
        } else {
            &self.title
        }
    }
}

/// Body of the "New Note" action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Partial update sent with `PUT /notes/<id>/`.
///
/// Only the fields that are set end up in the request body, so a pin toggle
/// never overwrites a title or content written by a concurrent save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn pinned(is_pinned: bool) -> Self {
        Self {
            is_pinned: Some(is_pinned),
            ..Self::default()
        }
    }

    pub fn colors(font_color: Option<String>, background_color: Option<String>) -> Self {
        Self {
            font_color,
            background_color,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject colour values the server would refuse anyway
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(color) = &self.font_color {
            validate_hex_color("Font color", color)?;
        }
        if let Some(color) = &self.background_color {
            validate_hex_color("Background color", color)?;
        }
        Ok(())
    }
}

fn validate_hex_color(label: &str, value: &str) -> Result<(), DomainError> {
    let is_hex = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "{label} must be a valid hex code, got {value:?}"
        )))
    }
}

/// Server-side sort fields accepted by `?ordering=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl OrderField {
    fn as_str(self) -> &'static str {
        match self {
            OrderField::CreatedAt => "created_at",
            OrderField::UpdatedAt => "updated_at",
            OrderField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ordering {
    pub field: OrderField,
    pub descending: bool,
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field.as_str())
        } else {
            f.write_str(self.field.as_str())
        }
    }
}

/// Parameters of a list request; also the key of the list cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub search: String,
    pub ordering: Option<Ordering>,
}

impl ListQuery {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ordering: None,
        }
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// Query-string pairs; an empty search is not sent at all
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if let Some(ordering) = self.ordering {
            params.push(("ordering", ordering.to_string()));
        }
        params
    }
}
