// src/application/note_editor.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, trace, warn};

use crate::application::{NoteCache, NoteRepository};
use crate::constants::AUTOSAVE_DELAY_MS;
use crate::domain::{DomainError, Note, NotePatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    /// Quiet period after the last content change before it is saved
    pub autosave_delay: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            autosave_delay: Duration::from_millis(AUTOSAVE_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    /// A content edit is waiting for the debounce window to close
    Pending,
    Saving,
    Saved,
    Failed(String),
}

enum EditorCommand {
    Content(String),
    /// Immediate save; `previous` holds the values the patch replaces
    Save {
        patch: NotePatch,
        previous: NotePatch,
    },
    /// Acked with the first failure since the last flush
    Flush(oneshot::Sender<Option<String>>),
}

/// A patch the server refused, with the values to restore locally
type Rejection = (NotePatch, NotePatch);

/// An open note.
///
/// Content edits are debounced; title, pin and colour changes are saved
/// right away. All saves for one editor go through a single worker task and
/// reach the server in the order they were issued.
pub struct NoteEditor {
    note: Note,
    commands: mpsc::UnboundedSender<EditorCommand>,
    rejections: mpsc::UnboundedReceiver<Rejection>,
    status: watch::Receiver<SaveStatus>,
    worker: JoinHandle<Option<String>>,
}

impl NoteEditor {
    pub fn new<R: NoteRepository + 'static>(
        note: Note,
        repository: Arc<R>,
        cache: Arc<NoteCache>,
        settings: EditorSettings,
    ) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (rejected, rejections) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::Idle);

        let worker = AutosaveWorker {
            note_id: note.id,
            repository,
            cache,
            delay: settings.autosave_delay,
            commands: receiver,
            rejected,
            status: status_tx,
            failure: None,
        };

        Self {
            note,
            commands,
            rejections,
            status,
            worker: tokio::spawn(worker.run()),
        }
    }

    /// The note as last loaded, with local title/pin edits applied
    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Editor reported new content; restarts the autosave timer
    pub fn content_changed(&mut self, html: impl Into<String>) {
        let html = html.into();
        self.note.content.clone_from(&html);
        self.send(EditorCommand::Content(html));
    }

    /// Title field lost focus
    pub fn title_blurred(&mut self, title: impl Into<String>) {
        self.apply_rejections();
        let title = title.into();
        if title == self.note.title {
            trace!(note_id = self.note.id, "Title unchanged, not saving");
            return;
        }
        let previous = NotePatch::title(std::mem::replace(&mut self.note.title, title.clone()));
        self.save(NotePatch::title(title), previous);
    }

    /// Flip the pin flag and save only that field; returns the new state
    pub fn toggle_pin(&mut self) -> bool {
        self.apply_rejections();
        let previous = NotePatch::pinned(self.note.is_pinned);
        self.note.is_pinned = !self.note.is_pinned;
        self.save(NotePatch::pinned(self.note.is_pinned), previous);
        self.note.is_pinned
    }

    pub fn set_colors(
        &mut self,
        font_color: Option<String>,
        background_color: Option<String>,
    ) -> Result<(), DomainError> {
        let patch = NotePatch::colors(font_color, background_color);
        patch.validate()?;
        if patch.is_empty() {
            return Ok(());
        }
        self.apply_rejections();
        let mut previous = NotePatch::default();
        if let Some(color) = &patch.font_color {
            previous.font_color = Some(std::mem::replace(&mut self.note.font_color, color.clone()));
        }
        if let Some(color) = &patch.background_color {
            previous.background_color =
                Some(std::mem::replace(&mut self.note.background_color, color.clone()));
        }
        self.save(patch, previous);
        Ok(())
    }

    /// Save any pending edit now and wait until every queued save has finished.
    ///
    /// Returns the first save error since the previous flush, if any. Local
    /// title, pin and colour edits the server refused are rolled back.
    pub async fn flush(&mut self) -> Option<String> {
        let (done, wait) = oneshot::channel();
        self.send(EditorCommand::Flush(done));
        let failure = wait.await.unwrap_or_else(|_| Some("Autosave worker is gone".to_string()));
        self.apply_rejections();
        failure
    }

    /// Flush and stop the worker.
    ///
    /// A save that failed since the last flush wins over later successes.
    pub async fn close(self) -> SaveStatus {
        let Self {
            commands,
            status,
            worker,
            ..
        } = self;
        drop(commands);
        match worker.await {
            Ok(Some(message)) => SaveStatus::Failed(message),
            Ok(None) => {
                let last = status.borrow().clone();
                last
            }
            Err(e) => {
                warn!(error = %e, "Autosave worker ended abnormally");
                SaveStatus::Failed(e.to_string())
            }
        }
    }

    fn save(&self, patch: NotePatch, previous: NotePatch) {
        self.send(EditorCommand::Save { patch, previous });
    }

    /// Undo local edits the server refused, unless a newer edit replaced them
    fn apply_rejections(&mut self) {
        while let Ok((patch, previous)) = self.rejections.try_recv() {
            debug!(note_id = self.note.id, "Rolling back rejected edit");
            let note = &mut self.note;
            if let (Some(sent), Some(old)) = (patch.title, previous.title) {
                if note.title == sent {
                    note.title = old;
                }
            }
            if let (Some(sent), Some(old)) = (patch.is_pinned, previous.is_pinned) {
                if note.is_pinned == sent {
                    note.is_pinned = old;
                }
            }
            if let (Some(sent), Some(old)) = (patch.font_color, previous.font_color) {
                if note.font_color == sent {
                    note.font_color = old;
                }
            }
            if let (Some(sent), Some(old)) = (patch.background_color, previous.background_color) {
                if note.background_color == sent {
                    note.background_color = old;
                }
            }
        }
    }

    fn send(&self, command: EditorCommand) {
        if self.commands.send(command).is_err() {
            warn!(note_id = self.note.id, "Autosave worker is gone, edit dropped");
        }
    }
}

struct AutosaveWorker<R: NoteRepository> {
    note_id: i64,
    repository: Arc<R>,
    cache: Arc<NoteCache>,
    delay: Duration,
    commands: mpsc::UnboundedReceiver<EditorCommand>,
    rejected: mpsc::UnboundedSender<Rejection>,
    status: watch::Sender<SaveStatus>,
    /// First error since the last flush ack
    failure: Option<String>,
}

impl<R: NoteRepository> AutosaveWorker<R> {
    /// Runs until the editor is dropped; yields any failure not yet reported
    async fn run(mut self) -> Option<String> {
        let mut pending: Option<(String, Instant)> = None;

        loop {
            let deadline = pending.as_ref().map(|(_, at)| *at);
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(EditorCommand::Content(html)) => {
                        trace!(note_id = self.note_id, "Content changed, restarting timer");
                        pending = Some((html, Instant::now() + self.delay));
                        self.status.send_replace(SaveStatus::Pending);
                    }
                    Some(EditorCommand::Save { patch, previous }) => {
                        if self.persist(patch.clone()).await.is_err() {
                            let _ = self.rejected.send((patch, previous));
                        }
                    }
                    Some(EditorCommand::Flush(done)) => {
                        if let Some((html, _)) = pending.take() {
                            let _ = self.persist(NotePatch::content(html)).await;
                        }
                        let _ = done.send(self.failure.take());
                    }
                    None => {
                        if let Some((html, _)) = pending.take() {
                            debug!(note_id = self.note_id, "Editor closed, saving pending edit");
                            let _ = self.persist(NotePatch::content(html)).await;
                        }
                        break;
                    }
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some((html, _)) = pending.take() {
                        let _ = self.persist(NotePatch::content(html)).await;
                    }
                }
            }
        }
        self.failure
    }

    async fn persist(&mut self, patch: NotePatch) -> Result<(), DomainError> {
        self.status.send_replace(SaveStatus::Saving);
        match self.repository.update_note(self.note_id, &patch).await {
            Ok(_) => {
                self.cache.note_updated(self.note_id);
                info!(note_id = self.note_id, "Saved note");
                self.status.send_replace(SaveStatus::Saved);
                Ok(())
            }
            Err(e) => {
                warn!(note_id = self.note_id, error = %e, "Failed to save note");
                let message = e.to_string();
                self.failure.get_or_insert_with(|| message.clone());
                self.status.send_replace(SaveStatus::Failed(message));
                Err(e)
            }
        }
    }
}
