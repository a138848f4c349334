// src/application/dashboard.rs
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::application::{
    AccountService, Authenticator, EditorSettings, NoteCache, NoteEditor, NoteLister,
    NoteRepository, NoteSections, SessionStore,
};
use crate::domain::note::ListQuery;
use crate::domain::{DomainError, NewNote, Note, Route};

/// The signed-in shell: note list, current route, create/delete/select.
pub struct Dashboard<R: NoteRepository + 'static> {
    repository: Arc<R>,
    cache: Arc<NoteCache>,
    lister: NoteLister<R>,
    route: Route,
}

impl<R: NoteRepository + 'static> Dashboard<R> {
    pub fn new(repository: Arc<R>, cache: Arc<NoteCache>) -> Self {
        let lister = NoteLister::new(repository.clone(), cache.clone());
        Self {
            repository,
            cache,
            lister,
            route: Route::Dashboard,
        }
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn cache(&self) -> &Arc<NoteCache> {
        &self.cache
    }

    pub fn is_active(&self, id: i64) -> bool {
        self.route == Route::Note(id)
    }

    pub async fn notes(&self, query: &ListQuery) -> NoteSections {
        self.lister.sections(query).await
    }

    pub fn navigate(&mut self, route: Route) {
        debug!(%route, "Navigating");
        self.route = route;
    }

    pub fn select_note(&mut self, id: i64) {
        debug!(note_id = id, "Selecting note");
        self.route = Route::Note(id);
    }

    /// Create an empty note and navigate to it
    #[instrument(level = "debug", skip(self))]
    pub async fn create_note(&mut self) -> Result<Note, DomainError> {
        let note = self.repository.create_note(&NewNote::empty()).await?;
        self.cache.note_created(&note);
        self.route = Route::Note(note.id);
        info!(note_id = note.id, "Created note");
        Ok(note)
    }

    /// Delete a note; leaves the note view only if it was the one deleted
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_note(&mut self, id: i64) -> Result<(), DomainError> {
        self.repository.delete_note(id).await?;
        self.cache.note_deleted(id);
        if self.is_active(id) {
            debug!(note_id = id, "Deleted the open note, returning to dashboard");
            self.route = Route::Dashboard;
        }
        info!(note_id = id, "Deleted note");
        Ok(())
    }

    /// Load a note for display; any failure reads as "not found"
    pub async fn load_note(&self, id: i64) -> Option<Note> {
        let repository = &self.repository;
        match self
            .cache
            .notes
            .fetch(id, || async move { repository.get_note(id).await })
            .await
        {
            Ok(note) => Some(note),
            Err(e) => {
                warn!(note_id = id, error = %e, "Failed to load note");
                None
            }
        }
    }

    /// Navigate to a note and open it for editing
    pub async fn open_editor(
        &mut self,
        id: i64,
        settings: EditorSettings,
    ) -> Result<NoteEditor, DomainError> {
        let note = self
            .load_note(id)
            .await
            .ok_or(DomainError::NoteNotFound(id))?;
        self.route = Route::Note(id);
        Ok(NoteEditor::new(
            note,
            self.repository.clone(),
            self.cache.clone(),
            settings,
        ))
    }

    pub fn logout<A, S>(&mut self, auth: &Authenticator<A, S>) -> Result<(), DomainError>
    where
        A: AccountService,
        S: SessionStore,
    {
        auth.logout()?;
        self.cache.clear();
        self.route = Route::Login;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{note, MockNoteRepository, RepoCall};

    fn dashboard(
        repo: MockNoteRepository,
    ) -> (Arc<MockNoteRepository>, Dashboard<MockNoteRepository>) {
        let repo = Arc::new(repo);
        let dashboard = Dashboard::new(repo.clone(), Arc::new(NoteCache::new()));
        (repo, dashboard)
    }

    #[tokio::test]
    async fn given_dashboard_when_creating_note_then_navigates_to_empty_note() {
        let (repo, mut dashboard) = dashboard(MockNoteRepository::builder().build());

        let created = dashboard.create_note().await.unwrap();

        assert_eq!(dashboard.route(), Route::Note(created.id));
        assert_eq!(created.title, "");
        assert_eq!(created.content, "");
        assert_eq!(repo.calls(), vec![RepoCall::Create(NewNote::empty())]);
    }

    #[tokio::test]
    async fn given_cached_list_when_creating_note_then_list_is_refetched() {
        let (repo, mut dashboard) =
            dashboard(MockNoteRepository::builder().with_note(note(1, false)).build());
        assert_eq!(dashboard.notes(&ListQuery::default()).await.len(), 1);

        dashboard.create_note().await.unwrap();
        let sections = dashboard.notes(&ListQuery::default()).await;

        assert_eq!(sections.len(), 2);
        assert_eq!(repo.list_calls().len(), 2);
    }

    #[tokio::test]
    async fn given_open_note_when_deleting_it_then_redirects_to_dashboard() {
        let (_, dashboard) = dashboard(MockNoteRepository::builder().with_note(note(7, false)).build());
        let mut dashboard = dashboard.with_route(Route::Note(7));

        dashboard.delete_note(7).await.unwrap();

        assert_eq!(dashboard.route(), Route::Dashboard);
    }

    #[tokio::test]
    async fn given_open_note_when_deleting_other_note_then_route_is_unchanged() {
        let (_, dashboard) = dashboard(
            MockNoteRepository::builder()
                .with_note(note(7, false))
                .with_note(note(8, false))
                .build(),
        );
        let mut dashboard = dashboard.with_route(Route::Note(7));

        dashboard.delete_note(8).await.unwrap();

        assert_eq!(dashboard.route(), Route::Note(7));
    }

    #[tokio::test]
    async fn given_failed_delete_when_deleting_open_note_then_route_is_unchanged() {
        let (_, dashboard) = dashboard(MockNoteRepository::builder().build());
        let mut dashboard = dashboard.with_route(Route::Note(9));

        let result = dashboard.delete_note(9).await;

        assert!(matches!(result, Err(DomainError::NoteNotFound(9))));
        assert_eq!(dashboard.route(), Route::Note(9));
    }

    #[tokio::test]
    async fn given_missing_note_when_opening_editor_then_returns_not_found() {
        let (_, mut dashboard) = dashboard(MockNoteRepository::builder().build());

        let result = dashboard.open_editor(42, EditorSettings::default()).await;

        assert!(matches!(result, Err(DomainError::NoteNotFound(42))));
        assert_eq!(dashboard.route(), Route::Dashboard);
    }
}
