// src/application/note_lister.rs
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::{NoteCache, NoteRepository};
use crate::domain::note::ListQuery;
use crate::domain::{DomainError, Note};

/// Dashboard list split by the pin flag.
///
/// Each group keeps the order the server returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteSections {
    pub pinned: Vec<Note>,
    pub unpinned: Vec<Note>,
}

impl NoteSections {
    pub fn partition(notes: Vec<Note>) -> Self {
        let (pinned, unpinned) = notes.into_iter().partition(|note| note.is_pinned);
        Self { pinned, unpinned }
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.unpinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pinned notes first, then the rest
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.pinned.iter().chain(self.unpinned.iter())
    }
}

pub struct NoteLister<R: NoteRepository> {
    repository: Arc<R>,
    cache: Arc<NoteCache>,
}

impl<R: NoteRepository> NoteLister<R> {
    pub fn new(repository: Arc<R>, cache: Arc<NoteCache>) -> Self {
        Self { repository, cache }
    }

    /// List notes matching the query, served from cache when fresh
    pub async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, DomainError> {
        let repository = &self.repository;
        self.cache
            .lists
            .fetch(query.clone(), || async move { repository.list_notes(query).await })
            .await
    }

    /// Partitioned list; a failed fetch shows up as an empty dashboard
    pub async fn sections(&self, query: &ListQuery) -> NoteSections {
        match self.list_notes(query).await {
            Ok(notes) => {
                let sections = NoteSections::partition(notes);
                debug!(
                    pinned = sections.pinned.len(),
                    unpinned = sections.unpinned.len(),
                    "Listed notes"
                );
                sections
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch notes, showing empty list");
                NoteSections::default()
            }
        }
    }
}
