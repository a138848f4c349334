// src/constants.rs
//
// Application-wide constants shared by the client layers.

/// Quiet period in milliseconds after the last content edit before it is saved.
///
/// Used in: `application/note_editor.rs`, `infrastructure/config.rs`
pub const AUTOSAVE_DELAY_MS: u64 = 1000;

/// Session-store key of the bearer token attached to note requests.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Session-store key of the refresh token handed out at login.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Session-store key remembering the route between CLI invocations.
///
/// Used in: `lib.rs`
pub const ACTIVE_ROUTE_KEY: &str = "active_route";

/// Number of characters of note text shown in list previews.
///
/// Used in: `util/text.rs`
pub const PREVIEW_MAX_CHARS: usize = 50;

/// API root used when neither the config file nor the command line sets one.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/";

/// Request timeout in seconds for calls to the notes service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Milliseconds to wait after launching the browser so it can read the temp file.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;
