// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::application::{
    AccountService, Authenticator, Dashboard, EditorSettings, NoteCache, NoteEditor,
    NoteRepository, SaveStatus, SessionStore,
};
use crate::cli::args::{Args, Command};
use crate::constants::ACTIVE_ROUTE_KEY;
use crate::domain::note::ListQuery;
use crate::domain::{Credentials, DomainError, Note, Registration, Route};
use crate::infrastructure::renderer::ContentRenderer;
use crate::infrastructure::{
    ApiClient, Config, FileSessionStore, HttpAccountService, HttpNoteRepository,
};
use crate::ports::{HtmlPresenter, TerminalPresenter};
use crate::util::text::{password_strength, plain_text_to_html};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting snappad with arguments");

    let config = Config::discover(args.config.as_deref())?;
    let base_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| config.api.base_url.clone());
    let session_path = session_path(&args, &config)?;
    debug!(%base_url, session = %session_path.display(), "Resolved settings");

    // Initialize infrastructure
    let store = Arc::new(FileSessionStore::new(session_path));
    let client = Arc::new(
        ApiClient::new(&base_url, config.timeout(), store.clone())
            .context("Failed to set up API client")?,
    );
    let repository = Arc::new(HttpNoteRepository::new(client.clone()));
    let auth = Authenticator::new(HttpAccountService::new(client), store.clone());

    // Initialize application
    let mut app = App::new(repository, auth, store, config.editor_settings());

    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    app.execute(args.command, &mut input, &mut out).await
}

fn session_path(args: &Args, config: &Config) -> Result<PathBuf> {
    match args.session.clone().or_else(|| config.session_file()) {
        Some(path) => Ok(path),
        None => FileSessionStore::default_path(),
    }
}

/// One CLI invocation: dashboard state restored from the session store,
/// a command applied, and the resulting route written back.
pub struct App<R, A, S>
where
    R: NoteRepository + 'static,
    A: AccountService,
    S: SessionStore,
{
    dashboard: Dashboard<R>,
    auth: Authenticator<A, S>,
    store: Arc<S>,
    settings: EditorSettings,
    presenter: TerminalPresenter,
}

impl<R, A, S> App<R, A, S>
where
    R: NoteRepository + 'static,
    A: AccountService,
    S: SessionStore,
{
    pub fn new(
        repository: Arc<R>,
        auth: Authenticator<A, S>,
        store: Arc<S>,
        settings: EditorSettings,
    ) -> Self {
        let route = load_route(store.as_ref());
        debug!(%route, "Restored route");
        Self {
            dashboard: Dashboard::new(repository, Arc::new(NoteCache::new())).with_route(route),
            auth,
            store,
            settings,
            presenter: TerminalPresenter::new(),
        }
    }

    pub fn route(&self) -> Route {
        self.dashboard.route()
    }

    pub async fn execute<I, W>(&mut self, command: Command, input: &mut I, out: &mut W) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
    {
        let result = self.dispatch(command, input, out).await;
        self.store
            .set(ACTIVE_ROUTE_KEY, &self.dashboard.route().to_string())
            .context("Failed to save active route")?;
        result
    }

    async fn dispatch<I, W>(&mut self, command: Command, input: &mut I, out: &mut W) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
    {
        if command.needs_session() {
            self.require_session()?;
        }
        match command {
            Command::Register {
                email,
                display_name,
                password,
            } => {
                writeln!(out, "Password strength: {}/4", password_strength(&password))?;
                let registration = Registration {
                    email,
                    password,
                    display_name,
                };
                if let Err(e) = self.auth.register(&registration).await {
                    warn!(error = %e, "Registration rejected");
                    bail!("Registration failed");
                }
                writeln!(out, "Registered {}. You can now log in.", registration.email)?;
                self.dashboard.navigate(Route::Login);
            }
            Command::Login { email, password } => {
                let credentials = Credentials { email, password };
                if let Err(e) = self.auth.login(&credentials).await {
                    warn!(error = %e, "Login rejected");
                    bail!("Invalid credentials");
                }
                self.dashboard.navigate(Route::Dashboard);
                writeln!(out, "Logged in as {}", credentials.email)?;
            }
            Command::Logout => {
                self.dashboard.logout(&self.auth)?;
                writeln!(out, "Logged out")?;
            }
            Command::List {
                search,
                order,
                desc,
                json,
            } => {
                let mut query = ListQuery::search(search.unwrap_or_default());
                if let Some(order) = order {
                    query = query.with_ordering(order.ordering(desc));
                }
                let sections = self.dashboard.notes(&query).await;
                if json {
                    let notes: Vec<&Note> = sections.iter().collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&notes)?)?;
                } else {
                    let active = self.dashboard.route().active_note();
                    write!(out, "{}", self.presenter.render_sections(&sections, active))?;
                }
            }
            Command::New => {
                let note = self
                    .dashboard
                    .create_note()
                    .await
                    .context("Failed to create note")?;
                writeln!(out, "Created note {}", note.id)?;
            }
            Command::Show { note_id, json } => {
                let note = self.load(note_id).await?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&note)?)?;
                } else {
                    write!(out, "{}", self.presenter.render_note(&note))?;
                }
            }
            Command::Open { note_id } => {
                let note = self.load(note_id).await?;
                let html = HtmlPresenter::new().render(&note);
                let mut renderer = ContentRenderer::new();
                let path = renderer.create_temp_file(note.id, &html)?;
                info!(note_id = note.id, "Opening note in browser");
                renderer.open_in_browser(&path).await?;
            }
            Command::Edit { note_id, title } => {
                let id = self.target(note_id)?;
                let mut editor = self.open_editor(id).await?;
                if let Some(title) = title {
                    editor.title_blurred(title);
                }
                let mut buffer = String::new();
                let mut line = String::new();
                while input.read_line(&mut line).await? > 0 {
                    buffer.push_str(&line);
                    line.clear();
                    editor.content_changed(plain_text_to_html(&buffer));
                }
                finish(editor, out).await?;
            }
            Command::Rename { note_id, title } => {
                let mut editor = self.open_editor(note_id).await?;
                editor.title_blurred(title);
                finish(editor, out).await?;
            }
            Command::Pin { note_id } => {
                let mut editor = self.open_editor(note_id).await?;
                let pinned = editor.toggle_pin();
                finish(editor, out).await?;
                writeln!(out, "{}", if pinned { "Pinned" } else { "Unpinned" })?;
            }
            Command::Color {
                note_id,
                font,
                background,
            } => {
                if font.is_none() && background.is_none() {
                    bail!("Nothing to change, pass --font and/or --background");
                }
                let mut editor = self.open_editor(note_id).await?;
                if let Err(e) = editor.set_colors(font, background) {
                    editor.close().await;
                    return Err(e.into());
                }
                finish(editor, out).await?;
            }
            Command::Delete { note_id, yes } => {
                if !yes && !confirm("Are you sure you want to delete this note?", input, out).await? {
                    writeln!(out, "Cancelled")?;
                    return Ok(());
                }
                self.dashboard
                    .delete_note(note_id)
                    .await
                    .with_context(|| format!("Failed to delete note {note_id}"))?;
                writeln!(out, "Deleted note {note_id}")?;
            }
        }
        Ok(())
    }

    /// Unauthenticated users are sent to the login route
    fn require_session(&mut self) -> Result<()> {
        if self.auth.is_authenticated()? {
            return Ok(());
        }
        self.dashboard.navigate(Route::Login);
        Err(anyhow!(DomainError::NotAuthenticated)).context("Run `snappad login` first")
    }

    fn target(&self, note_id: Option<i64>) -> Result<i64> {
        note_id
            .or_else(|| self.dashboard.route().active_note())
            .context("No active note, pass a NOTE_ID")
    }

    async fn load(&mut self, note_id: Option<i64>) -> Result<Note> {
        let id = self.target(note_id)?;
        let note = self
            .dashboard
            .load_note(id)
            .await
            .context("Note not found.")?;
        self.dashboard.select_note(id);
        Ok(note)
    }

    async fn open_editor(&mut self, id: i64) -> Result<NoteEditor> {
        match self.dashboard.open_editor(id, self.settings).await {
            Ok(editor) => Ok(editor),
            Err(DomainError::NoteNotFound(_)) => bail!("Note not found."),
            Err(e) => Err(e.into()),
        }
    }
}

fn load_route<S: SessionStore>(store: &S) -> Route {
    match store.get(ACTIVE_ROUTE_KEY) {
        Ok(Some(path)) => path.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring stored route");
            Route::default()
        }),
        Ok(None) => Route::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored route");
            Route::default()
        }
    }
}

/// Close the editor; any failed save since it opened fails the command
async fn finish<W: Write>(editor: NoteEditor, out: &mut W) -> Result<()> {
    match editor.close().await {
        SaveStatus::Failed(message) => bail!("Failed to save note: {message}"),
        SaveStatus::Saved => writeln!(out, "Saved").map_err(Into::into),
        _ => Ok(()),
    }
}

async fn confirm<I, W>(prompt: &str, input: &mut I, out: &mut W) -> Result<bool>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer).await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
